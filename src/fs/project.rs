//! Best-effort evidence readers over a project root.
//!
//! Every accessor is total: missing files, permission problems, non-UTF8
//! content and unreadable directories all read as "absent" so that
//! classification never fails half way through a tree.

use super::{FileSystem, RealFileSystem};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::trace;

#[derive(Clone)]
pub struct ProjectFiles {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    listing: Arc<OnceLock<Vec<PathBuf>>>,
}

impl ProjectFiles {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            listing: Arc::new(OnceLock::new()),
        }
    }

    /// Readers over the real file system.
    pub fn on_disk(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(RealFileSystem::new()), root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_exists(&self, relative: &str) -> bool {
        self.fs.exists(&self.root.join(relative))
    }

    pub fn is_dir(&self, relative: &str) -> bool {
        self.fs.is_dir(&self.root.join(relative))
    }

    /// File content, or an empty string when it cannot be read for any reason.
    pub fn read_file(&self, relative: impl AsRef<Path>) -> String {
        let path = self.root.join(relative);
        match self.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "Treating file as absent");
                String::new()
            }
        }
    }

    /// Every file in the tree relative to the root, sorted. Computed once.
    pub fn all_files(&self) -> &[PathBuf] {
        self.listing.get_or_init(|| self.fs.walk_files(&self.root))
    }

    pub fn files_matching<F>(&self, predicate: F) -> Vec<PathBuf>
    where
        F: Fn(&Path) -> bool,
    {
        self.all_files()
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }

    /// Files with the given extension (with or without the leading dot), sorted.
    pub fn files_with_extension(&self, extension: &str) -> Vec<PathBuf> {
        let extension = extension.trim_start_matches('.');
        self.files_matching(|p| p.extension().is_some_and(|e| e == extension))
    }

    pub fn has_file_with_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.all_files()
            .iter()
            .any(|p| p.extension().is_some_and(|e| e == extension))
    }

    /// Names of the direct subdirectories of `relative`, sorted.
    pub fn subdirectories(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .fs
            .read_dir(&self.root.join(relative))
            .map(|entries| {
                entries
                    .into_iter()
                    .filter(|e| e.is_dir())
                    .map(|e| e.name)
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ProjectFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectFiles")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn project(setup: impl FnOnce(&MockFileSystem)) -> ProjectFiles {
        let fs = MockFileSystem::new();
        setup(&fs);
        ProjectFiles::new(Arc::new(fs), "/mock")
    }

    #[test]
    fn test_read_file_missing_is_empty() {
        let files = project(|_| {});
        assert_eq!(files.read_file("requirements.txt"), "");
        assert!(!files.file_exists("requirements.txt"));
    }

    #[test]
    fn test_read_file_unreadable_is_empty() {
        let files = project(|fs| fs.add_unreadable("pom.xml"));
        assert!(files.file_exists("pom.xml"));
        assert_eq!(files.read_file("pom.xml"), "");
    }

    #[test]
    fn test_extension_lookup_accepts_leading_dot() {
        let files = project(|fs| {
            fs.add_file("src/Main.java", "class Main {}");
            fs.add_file("lib/Util.java", "class Util {}");
        });

        assert!(files.has_file_with_extension("java"));
        assert!(files.has_file_with_extension(".java"));
        assert!(!files.has_file_with_extension("py"));
        assert_eq!(
            files.files_with_extension("java"),
            vec![PathBuf::from("lib/Util.java"), PathBuf::from("src/Main.java")]
        );
    }

    #[test]
    fn test_subdirectories_sorted() {
        let files = project(|fs| {
            fs.add_dir("zeta");
            fs.add_dir("alpha");
            fs.add_file("file.txt", "");
        });
        assert_eq!(files.subdirectories(""), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_subdirectories_of_missing_dir_is_empty() {
        let files = project(|_| {});
        assert!(files.subdirectories("nope").is_empty());
    }
}
