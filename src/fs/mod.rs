//! FileSystem abstraction and project evidence readers

mod mock;
mod project;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use project::ProjectFiles;
pub use r#trait::{DirEntry, FileSystem, FileType, PRUNED_DIRS};
pub use real::{resolve_path, RealFileSystem};
