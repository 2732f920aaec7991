use super::{DirEntry, FileSystem, FileType, PRUNED_DIRS};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            // DirEntry::file_type does not traverse symlinks
            let file_type = match entry.file_type() {
                Ok(ft) if ft.is_dir() => FileType::Directory,
                Ok(ft) if ft.is_file() => FileType::File,
                _ => FileType::Symlink,
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && PRUNED_DIRS
                        .iter()
                        .any(|pruned| entry.file_name() == std::ffi::OsStr::new(pruned)))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        files
    }
}

/// Absolute form of `path` with `..` and symlinks resolved.
///
/// Paths that cannot be canonicalized (missing, unreadable) are only made
/// absolute.
pub fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path_collapses_parent_components() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("shop/sub")).unwrap();

        let resolved = resolve_path(&temp.path().join("shop/sub/.."));
        assert!(resolved.is_absolute());
        assert_eq!(resolved.file_name().unwrap(), "shop");
    }

    #[test]
    fn test_resolve_path_missing_is_made_absolute() {
        let resolved = resolve_path(Path::new("does-not-exist/app"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("does-not-exist/app"));
    }

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("subdir")).unwrap();
        fs::File::create(base.join("test.txt"))
            .unwrap()
            .write_all(b"hello world")
            .unwrap();
        fs::File::create(base.join("subdir/nested.txt"))
            .unwrap()
            .write_all(b"nested content")
            .unwrap();

        dir
    }

    #[test]
    fn test_exists() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(temp.path()));
        assert!(fs.exists(&temp.path().join("test.txt")));
        assert!(!fs.exists(&temp.path().join("nonexistent")));
    }

    #[test]
    fn test_is_dir_and_is_file() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.is_dir(&temp.path().join("subdir")));
        assert!(!fs.is_dir(&temp.path().join("test.txt")));
        assert!(fs.is_file(&temp.path().join("test.txt")));
        assert!(!fs.is_file(temp.path()));
    }

    #[test]
    fn test_read_to_string() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let content = fs.read_to_string(&temp.path().join("test.txt")).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_read_to_string_rejects_non_utf8() {
        let temp = create_test_dir();
        fs::write(temp.path().join("binary.dat"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let fs = RealFileSystem::new();

        assert!(fs.read_to_string(&temp.path().join("binary.dat")).is_err());
    }

    #[test]
    fn test_read_dir() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();

        assert!(names.contains(&"test.txt"));
        assert!(names.contains(&"subdir"));
    }

    #[test]
    fn test_walk_files_is_sorted_and_relative() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let files = fs.walk_files(temp.path());
        assert_eq!(
            files,
            vec![PathBuf::from("subdir/nested.txt"), PathBuf::from("test.txt")]
        );
    }

    #[test]
    fn test_walk_files_prunes_dependency_dirs() {
        let temp = create_test_dir();
        fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();
        fs::write(temp.path().join("node_modules/pkg/index.js"), "").unwrap();
        fs::create_dir_all(temp.path().join(".hidden")).unwrap();
        fs::write(temp.path().join(".hidden/kept.py"), "").unwrap();
        let fs = RealFileSystem::new();

        let files = fs.walk_files(temp.path());
        assert!(files.iter().all(|f| !f.starts_with("node_modules")));
        assert!(files.contains(&PathBuf::from(".hidden/kept.py")));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_survives_symlink_loop() {
        let temp = create_test_dir();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("subdir/loop")).unwrap();
        let fs = RealFileSystem::new();

        let files = fs.walk_files(temp.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_walk_files_missing_root_is_empty() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.walk_files(&temp.path().join("missing")).is_empty());
    }
}
