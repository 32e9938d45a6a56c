//! File access for edit sessions.
//!
//! Sessions never touch `std::fs` directly; they go through [`FileSystem`],
//! which resolves caller-relative paths against a workspace boundary and
//! performs the reads and writes.

pub mod guard;
pub mod local;
pub mod memory;

pub use guard::WorkspaceGuard;
pub use local::LocalFs;
pub use memory::MemoryFs;

use crate::error::EditError;
use std::path::{Component, Path, PathBuf};

pub trait FileSystem {
    /// Turn a caller-supplied relative path into the path to read and write.
    ///
    /// Fails with [`EditError::InvalidPath`] for absolute paths and paths
    /// that escape the workspace.
    fn resolve_path(&self, relative: &str) -> Result<PathBuf, EditError>;

    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8. A missing file is [`EditError::NotFound`].
    fn read(&self, path: &Path) -> Result<String, EditError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), EditError>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn resolve_path(&self, relative: &str) -> Result<PathBuf, EditError> {
        (**self).resolve_path(relative)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<String, EditError> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), EditError> {
        (**self).write(path, content)
    }
}

/// Lexically normalize a relative path, refusing anything absolute or
/// anything whose `..` components climb above the starting directory.
pub fn normalize_relative(relative: &str) -> Result<PathBuf, EditError> {
    let invalid = |reason: &str| EditError::InvalidPath {
        path: PathBuf::from(relative),
        reason: reason.to_string(),
    };

    if relative.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    let path = Path::new(relative);
    if path.has_root() {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(invalid("path escapes the workspace root"));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(invalid("path does not name a file"));
    }
    Ok(normalized)
}
