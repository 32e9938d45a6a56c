//! One file's lifecycle across an ordered list of changes.
//!
//! ```text
//! Pending -> Reading -> Applying -> Finalizing -> Succeeded | Skipped
//!               |           |
//!               +-----------+-----------------> Failed
//! ```
//!
//! The file is read once. Changes are applied from the highest anchor line
//! to the lowest, so an edit never shifts the lines a still-pending edit
//! above it refers to. A change that finds no match (or overlaps an earlier
//! change) is skipped and noted; a malformed regex fails the whole file and
//! nothing is written. A live run writes only if the file on disk still
//! matches what was read.

use crate::diff::unified_diff;
use crate::edit::EditVerification;
use crate::error::EditError;
use crate::patch::{Applied, PatchApplier};
use crate::request::ChangeRequest;
use crate::result::FileResult;
use crate::workspace::FileSystem;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Reading,
    Applying,
    Finalizing,
    Succeeded,
    Skipped,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Succeeded | SessionState::Skipped | SessionState::Failed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Batch-wide flags that shape how a session finalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub dry_run: bool,
    pub output_diff: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            output_diff: true,
        }
    }
}

/// Result of running a file's changes against its content in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChanges {
    pub content: String,
    pub attempted: usize,
    pub applied: usize,
    /// One entry per skipped change, in application order.
    pub notes: Vec<String>,
}

/// Apply `changes` to `original`, highest anchor line first.
///
/// The sort is stable, so changes sharing an anchor keep their request
/// order. Only a file-fatal error (a malformed regex) is returned as `Err`;
/// per-change failures become notes.
pub fn apply_changes(original: &str, changes: &[ChangeRequest]) -> Result<AppliedChanges, EditError> {
    let mut ordered: Vec<(usize, &ChangeRequest)> = changes.iter().enumerate().collect();
    ordered.sort_by(|(_, a), (_, b)| b.start_line.cmp(&a.start_line));

    let mut applier = PatchApplier::new(original);
    let mut applied = 0;
    let mut notes = Vec::new();

    for (index, change) in &ordered {
        match applier.apply(*index, change) {
            Ok(outcome) => {
                applied += 1;
                match outcome {
                    Applied::Inserted { line, lines } => tracing::debug!(
                        path = %change.path,
                        start_line = change.start_line,
                        "inserted {lines} line(s) before line {}",
                        line + 1
                    ),
                    Applied::Replaced { span } => {
                        tracing::debug!(path = %change.path, ?span, "replaced matched block")
                    }
                    Applied::Deleted { span } => {
                        tracing::debug!(path = %change.path, ?span, "deleted matched block")
                    }
                }
            }
            Err(err) if err.is_file_fatal() => return Err(err),
            Err(err) => {
                tracing::warn!(
                    path = %change.path,
                    start_line = change.start_line,
                    "skipping change: {}",
                    err.change_note()
                );
                notes.push(format!(
                    "change at line {} skipped: {}",
                    change.start_line,
                    err.change_note()
                ));
            }
        }
    }

    Ok(AppliedChanges {
        content: applier.into_content(),
        attempted: ordered.len(),
        applied,
        notes,
    })
}

pub struct EditSession<'a, F: FileSystem + ?Sized> {
    path: String,
    changes: Vec<ChangeRequest>,
    options: SessionOptions,
    fs: &'a F,
    state: SessionState,
}

impl<'a, F: FileSystem + ?Sized> EditSession<'a, F> {
    pub fn new(
        path: impl Into<String>,
        changes: Vec<ChangeRequest>,
        options: SessionOptions,
        fs: &'a F,
    ) -> Self {
        Self {
            path: path.into(),
            changes,
            options,
            fs,
            state: SessionState::Pending,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            !self.state.is_terminal(),
            "session for {} already finished as {}",
            self.path,
            self.state
        );
        tracing::trace!(path = %self.path, from = %self.state, to = %next, "session transition");
        self.state = next;
    }

    /// Run the session to a terminal state.
    ///
    /// Errors that end the file (invalid path, missing file, I/O failure,
    /// malformed regex, a change on disk since reading) are returned as `Err` after moving the session to
    /// [`SessionState::Failed`]; the caller turns them into a failed result.
    pub fn run(&mut self) -> Result<FileResult, EditError> {
        let result = self.execute();
        if result.is_err() {
            self.transition(SessionState::Failed);
        }
        result
    }

    /// Fail if the file was removed or rewritten since it was read.
    fn ensure_unchanged(&self, path: &Path, snapshot: &EditVerification) -> Result<(), EditError> {
        if !self.fs.exists(path) || !snapshot.matches(&self.fs.read(path)?) {
            tracing::warn!(path = %self.path, "file changed on disk, not writing");
            return Err(EditError::ChangedOnDisk(path.to_path_buf()));
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<FileResult, EditError> {
        self.transition(SessionState::Reading);
        let absolute = self.fs.resolve_path(&self.path)?;
        let original = self.fs.read(&absolute)?;
        let snapshot = EditVerification::from_text(&original);

        self.transition(SessionState::Applying);
        let outcome = apply_changes(&original, &self.changes)?;

        self.transition(SessionState::Finalizing);
        if outcome.applied == 0 {
            self.transition(SessionState::Skipped);
            let message = (outcome.attempted > 0).then(|| {
                with_notes(
                    format!("No applicable changes found or made for {}.", self.path),
                    &outcome.notes,
                )
            });
            return Ok(FileResult::skipped(self.path.clone(), message));
        }

        let diff = self
            .options
            .output_diff
            .then(|| unified_diff(&self.path, &original, &outcome.content));

        let headline = if self.options.dry_run {
            format!("File {} changes calculated (dry run).", self.path)
        } else {
            self.ensure_unchanged(&absolute, &snapshot)?;
            self.fs.write(&absolute, &outcome.content)?;
            format!("File {} modified successfully.", self.path)
        };

        self.transition(SessionState::Succeeded);
        Ok(FileResult::success(
            self.path.clone(),
            with_notes(headline, &outcome.notes),
            diff,
        ))
    }
}

fn with_notes(headline: String, notes: &[String]) -> String {
    if notes.is_empty() {
        headline
    } else {
        format!("{headline} {}", notes.join("; "))
    }
}
