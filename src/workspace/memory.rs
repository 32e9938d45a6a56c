use crate::error::EditError;
use crate::workspace::{normalize_relative, FileSystem};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

/// An in-memory [`FileSystem`], for embedding and tests.
///
/// Paths are stored in their normalized relative form. Read failures other
/// than not-found can be injected per path, as can a change made by someone
/// else right after the first read.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, String>>,
    read_errors: HashMap<PathBuf, io::ErrorKind>,
    /// Content a path takes on after its next read; `None` removes it.
    after_read: RefCell<HashMap<PathBuf, Option<String>>>,
    writes: Cell<usize>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), content.into());
        self
    }

    /// Make reads of `path` fail with `kind`.
    pub fn with_read_error(mut self, path: impl AsRef<Path>, kind: io::ErrorKind) -> Self {
        self.read_errors.insert(path.as_ref().to_path_buf(), kind);
        self
    }

    /// Replace `path` with `content` right after it is next read.
    pub fn with_change_after_read(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.after_read
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), Some(content.into()));
        self
    }

    /// Remove `path` right after it is next read.
    pub fn with_removal_after_read(self, path: impl AsRef<Path>) -> Self {
        self.after_read
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), None);
        self
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl FileSystem for MemoryFs {
    fn resolve_path(&self, relative: &str) -> Result<PathBuf, EditError> {
        normalize_relative(relative)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, EditError> {
        if let Some(kind) = self.read_errors.get(path) {
            return Err(EditError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(*kind, "injected read failure"),
            });
        }
        let content = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| EditError::NotFound(path.to_path_buf()))?;

        if let Some(change) = self.after_read.borrow_mut().remove(path) {
            let mut files = self.files.borrow_mut();
            match change {
                Some(changed) => files.insert(path.to_path_buf(), changed),
                None => files.remove(path),
            };
        }
        Ok(content)
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), EditError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
