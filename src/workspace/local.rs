use crate::error::EditError;
use crate::workspace::{FileSystem, WorkspaceGuard};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The real filesystem, confined to one workspace root.
#[derive(Debug, Clone)]
pub struct LocalFs {
    guard: WorkspaceGuard,
}

impl LocalFs {
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, EditError> {
        Ok(Self {
            guard: WorkspaceGuard::new(workspace_root)?,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        self.guard.workspace_root()
    }
}

impl FileSystem for LocalFs {
    fn resolve_path(&self, relative: &str) -> Result<PathBuf, EditError> {
        self.guard.resolve(relative)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String, EditError> {
        fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => EditError::NotFound(path.to_path_buf()),
            _ => EditError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), EditError> {
        let path = self.guard.revalidate(path)?;
        let io_error = |source| EditError::Io {
            path: path.clone(),
            source,
        };

        atomic_write(&path, content.as_bytes()).map_err(io_error)?;

        // Bump mtime so watchers and incremental builds notice the change.
        filetime::set_file_mtime(&path, filetime::FileTime::now()).map_err(io_error)?;
        Ok(())
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// This ensures crash safety - either the full write succeeds or nothing changes.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory")
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Keep the original file's permissions across the rename.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
