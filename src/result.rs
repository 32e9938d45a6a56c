use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of one file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Failed,
    Skipped,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileStatus::Success => "success",
            FileStatus::Failed => "failed",
            FileStatus::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// Outcome of every change requested for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "FileResult should be checked for success/failure"]
pub struct FileResult {
    pub path: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileResult {
    pub fn success(path: impl Into<String>, message: String, diff: Option<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Success,
            message: Some(message),
            diff,
        }
    }

    pub fn skipped(path: impl Into<String>, message: Option<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Skipped,
            message,
            diff: None,
        }
    }

    pub fn failed(path: impl Into<String>, message: String) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Failed,
            message: Some(message),
            diff: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({}): {}", self.path, self.status, message),
            None => write!(f, "{} ({})", self.path, self.status),
        }
    }
}

/// The document returned for a batch: one result per distinct file, in the
/// order the files first appeared in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<FileResult>,
}

impl BatchResult {
    pub fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(FileResult::is_failed)
    }
}

impl From<Vec<FileResult>> for BatchResult {
    fn from(results: Vec<FileResult>) -> Self {
        Self { results }
    }
}
