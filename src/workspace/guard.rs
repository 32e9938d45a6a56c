use crate::error::EditError;
use crate::workspace::normalize_relative;
use std::io;
use std::path::{Path, PathBuf};

/// Workspace safety checks to prevent editing files outside the target workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Absolute, canonical path to workspace root
    workspace_root: PathBuf,
}

impl WorkspaceGuard {
    /// Create a new workspace guard with the given root.
    ///
    /// The workspace root will be canonicalized to handle symlinks correctly.
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, EditError> {
        let root = workspace_root.as_ref();
        let workspace_root = root.canonicalize().map_err(|source| EditError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { workspace_root })
    }

    /// Resolve a caller-relative path inside the workspace.
    ///
    /// Absolute paths and `..` escapes are rejected lexically. If the target
    /// (or its nearest existing ancestor) exists it is canonicalized, so a
    /// symlink pointing outside the workspace is rejected too. A target that
    /// does not exist yet resolves to its joined path; reading it then
    /// reports not-found.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, EditError> {
        let normalized = normalize_relative(relative)?;
        let joined = self.workspace_root.join(&normalized);

        match joined.canonicalize() {
            Ok(canonical) => {
                self.check_canonical(relative, &canonical)?;
                Ok(canonical)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Some(ancestor) = joined.ancestors().skip(1).find(|a| a.exists()) {
                    let canonical = ancestor.canonicalize().map_err(|source| EditError::Io {
                        path: ancestor.to_path_buf(),
                        source,
                    })?;
                    self.check_canonical(relative, &canonical)?;
                }
                Ok(joined)
            }
            Err(source) => Err(EditError::Io {
                path: joined,
                source,
            }),
        }
    }

    /// Re-validate a previously-resolved path.
    ///
    /// Call this immediately before write to close the TOCTOU window:
    /// the path is re-canonicalized and re-checked against the workspace
    /// boundary.
    pub fn revalidate(&self, path: &Path) -> Result<PathBuf, EditError> {
        let canonical = path.canonicalize().map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.check_canonical(&path.display().to_string(), &canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, requested: &str, canonical: &Path) -> Result<(), EditError> {
        if !canonical.starts_with(&self.workspace_root) {
            return Err(EditError::InvalidPath {
                path: PathBuf::from(requested),
                reason: format!(
                    "resolves to {} outside workspace {}",
                    canonical.display(),
                    self.workspace_root.display()
                ),
            });
        }
        Ok(())
    }

    /// Get the workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}
