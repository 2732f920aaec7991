use super::{DirEntry, FileSystem, FileType, PRUNED_DIRS};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
}

/// In-memory file system used by classifier tests.
///
/// Relative paths are resolved against the mock root (`/mock` by default).
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let fs = Self {
            files: RwLock::new(BTreeMap::new()),
            root: root.into(),
        };
        fs.add_dir(fs.root.clone());
        fs
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        Self::ensure_parents(&mut files, &path);
    }

    /// Registers a file that exists but cannot be read, like a permission error on disk.
    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: None,
                file_type: FileType::File,
            },
        );
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn entry(&self, path: &Path) -> Option<MockEntry> {
        let path = self.normalize_path(path);
        self.files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&path)
            .cloned()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entry(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entry(path)
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.entry(path)
            .map(|e| e.file_type == FileType::File)
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entry = self
            .entry(path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        if entry.file_type != FileType::File {
            return Err(anyhow!("Not a file: {:?}", path));
        }

        entry
            .content
            .ok_or_else(|| anyhow!("Permission denied: {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        if !self.is_dir(&path) {
            return Err(anyhow!("Directory not found: {:?}", path));
        }

        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let entries = files
            .iter()
            .filter(|(p, _)| p.parent() == Some(path.as_path()))
            .map(|(p, e)| DirEntry {
                path: p.clone(),
                name: p
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                file_type: e.file_type,
            })
            .collect();

        Ok(entries)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let root = self.normalize_path(root);
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());

        files
            .iter()
            .filter(|(_, e)| e.file_type == FileType::File)
            .filter_map(|(p, _)| p.strip_prefix(&root).ok().map(Path::to_path_buf))
            .filter(|relative| {
                let mut dirs = relative.components().rev().skip(1);
                !dirs.any(|c| PRUNED_DIRS.iter().any(|pruned| c.as_os_str() == *pruned))
            })
            .collect()
    }
}
