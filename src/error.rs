use crate::request::ValidationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a batch, a file session or a single change can fail.
///
/// Which layer absorbs the error depends on the variant:
/// - [`EditError::InvalidInput`] is fatal to the whole batch call.
/// - [`EditError::InvalidPath`], [`EditError::NotFound`], [`EditError::Io`],
///   [`EditError::MalformedPattern`] and [`EditError::ChangedOnDisk`] fail a
///   single file.
/// - Everything else skips a single change.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("Invalid arguments for edit request: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid regex pattern \"{pattern}\": {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Empty search pattern with no replacement content; nothing to do")]
    EmptyPattern,

    #[error("Search pattern not found (occurrence {occurrence}) starting near line {start_line}")]
    NoMatch {
        occurrence: usize,
        start_line: usize,
        hint: Option<String>,
    },

    #[error("Matched span [{byte_start}, {byte_end}) overlaps a region written by an earlier change")]
    Overlap { byte_start: usize, byte_end: usize },

    #[error("Invalid byte range: [{byte_start}, {byte_end}) in buffer of length {len}")]
    InvalidRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("{} changed on disk while it was being edited", .0.display())]
    ChangedOnDisk(PathBuf),

    #[error("Filesystem error ({kind:?}) on {path}: {source}", kind = .source.kind())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditError {
    /// Whether this error ends the session for the whole file rather than
    /// skipping the change that raised it.
    pub fn is_file_fatal(&self) -> bool {
        matches!(
            self,
            EditError::InvalidInput(_)
                | EditError::InvalidPath { .. }
                | EditError::NotFound(_)
                | EditError::MalformedPattern { .. }
                | EditError::ChangedOnDisk(_)
                | EditError::Io { .. }
        )
    }

    /// The message recorded on a failed file result, keyed by the caller's
    /// relative path rather than the resolved one.
    pub fn file_message(&self, relative_path: &str) -> String {
        match self {
            EditError::NotFound(_) => format!("File not found: {relative_path}"),
            EditError::InvalidPath { reason, .. } => {
                format!("Invalid path {relative_path}: {reason}")
            }
            EditError::MalformedPattern { pattern, source } => {
                format!("Invalid regex pattern \"{pattern}\" in {relative_path}: {source}")
            }
            EditError::ChangedOnDisk(_) => {
                format!("File {relative_path} changed on disk while it was being edited; not written.")
            }
            EditError::Io { source, .. } => format!(
                "Filesystem error ({:?}) processing {relative_path}: {source}",
                source.kind()
            ),
            other => format!("Unexpected error processing {relative_path}: {other}"),
        }
    }

    /// A short note describing a skipped change, used in result messages.
    pub fn change_note(&self) -> String {
        match self {
            EditError::NoMatch {
                hint: Some(hint), ..
            } => format!("{self} ({hint})"),
            other => other.to_string(),
        }
    }
}
