use serde::{Deserialize, Serialize};
use std::fmt;

/// A batch of changes across one or more files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub changes: Vec<ChangeRequest>,
    /// Match and diff everything but write nothing.
    #[serde(default)]
    pub dry_run: bool,
    /// Include a unified diff in each successful file result.
    #[serde(default = "default_true")]
    pub output_diff: bool,
}

/// One line-anchored change to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Path relative to the workspace root.
    pub path: String,
    /// Multi-line text or regex locating the block to replace or delete.
    /// Omitted or empty means insertion at `start_line`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_pattern: Option<String>,
    /// 1-based line where the search starts, or where insertion happens.
    pub start_line: usize,
    /// Replacement text. Omitted with a search pattern means delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_content: Option<String>,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default = "default_true")]
    pub ignore_leading_whitespace: bool,
    #[serde(default = "default_true")]
    pub preserve_indentation: bool,
    /// Which match to act on, 1-based.
    #[serde(default = "default_occurrence")]
    pub match_occurrence: usize,
}

fn default_true() -> bool {
    true
}

fn default_occurrence() -> usize {
    1
}

/// What a change does, derived from which fields are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind<'a> {
    Insert { text: &'a str },
    Replace { pattern: &'a str, text: &'a str },
    Delete { pattern: &'a str },
}

impl ChangeRequest {
    fn base(path: impl Into<String>, start_line: usize) -> Self {
        Self {
            path: path.into(),
            search_pattern: None,
            start_line,
            replace_content: None,
            use_regex: false,
            ignore_leading_whitespace: true,
            preserve_indentation: true,
            match_occurrence: 1,
        }
    }

    /// Insert `text` before `start_line`.
    pub fn insert(path: impl Into<String>, start_line: usize, text: impl Into<String>) -> Self {
        Self {
            replace_content: Some(text.into()),
            ..Self::base(path, start_line)
        }
    }

    /// Replace the block matching `pattern` at or after `start_line`.
    pub fn replace(
        path: impl Into<String>,
        start_line: usize,
        pattern: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            search_pattern: Some(pattern.into()),
            replace_content: Some(text.into()),
            ..Self::base(path, start_line)
        }
    }

    /// Delete the block matching `pattern` at or after `start_line`.
    pub fn delete(path: impl Into<String>, start_line: usize, pattern: impl Into<String>) -> Self {
        Self {
            search_pattern: Some(pattern.into()),
            ..Self::base(path, start_line)
        }
    }

    pub fn regex(mut self) -> Self {
        self.use_regex = true;
        self
    }

    pub fn occurrence(mut self, occurrence: usize) -> Self {
        self.match_occurrence = occurrence;
        self
    }

    pub fn exact_whitespace(mut self) -> Self {
        self.ignore_leading_whitespace = false;
        self
    }

    /// Insert or substitute the text exactly as given.
    pub fn verbatim(mut self) -> Self {
        self.preserve_indentation = false;
        self
    }

    /// The search pattern, treating an empty pattern as absent.
    pub fn pattern(&self) -> Option<&str> {
        self.search_pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Classify the change. `None` when there is neither a non-empty pattern
    /// nor replacement content.
    pub fn kind(&self) -> Option<ChangeKind<'_>> {
        match (self.pattern(), self.replace_content.as_deref()) {
            (None, Some(text)) => Some(ChangeKind::Insert { text }),
            (Some(pattern), Some(text)) => Some(ChangeKind::Replace { pattern, text }),
            (Some(pattern), None) => Some(ChangeKind::Delete { pattern }),
            (None, None) => None,
        }
    }
}

impl EditRequest {
    pub fn new(changes: Vec<ChangeRequest>) -> Self {
        Self {
            changes,
            dry_run: false,
            output_diff: true,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_diff(mut self, output_diff: bool) -> Self {
        self.output_diff = output_diff;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.changes.is_empty() {
            issues.push(ValidationIssue::EmptyChangeList);
        }

        for (index, change) in self.changes.iter().enumerate() {
            if change.path.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    change: index,
                    field: "path",
                });
            }
            if change.start_line < 1 {
                issues.push(ValidationIssue::OutOfRange {
                    change: index,
                    field: "start_line",
                    message: "must be at least 1".to_string(),
                });
            }
            if change.match_occurrence < 1 {
                issues.push(ValidationIssue::OutOfRange {
                    change: index,
                    field: "match_occurrence",
                    message: "must be at least 1".to_string(),
                });
            }
            // An empty pattern counts as provided; applying it is a no-op skip.
            if change.search_pattern.is_none() && change.replace_content.is_none() {
                issues.push(ValidationIssue::missing_operation(index));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationIssue> for ValidationError {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyChangeList,
    MissingField {
        change: usize,
        field: &'static str,
    },
    OutOfRange {
        change: usize,
        field: &'static str,
        message: String,
    },
    InvalidCombo {
        change: usize,
        message: String,
    },
}

impl ValidationIssue {
    pub fn missing_operation(change: usize) -> Self {
        ValidationIssue::InvalidCombo {
            change,
            message: "either 'search_pattern' or 'replace_content' must be provided".to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyChangeList => write!(f, "changes: must contain at least 1 change"),
            ValidationIssue::MissingField { change, field } => {
                write!(f, "changes.{change}.{field}: required field is empty")
            }
            ValidationIssue::OutOfRange {
                change,
                field,
                message,
            } => write!(f, "changes.{change}.{field}: {message}"),
            ValidationIssue::InvalidCombo { change, message } => {
                write!(f, "changes.{change}: {message}")
            }
        }
    }
}
