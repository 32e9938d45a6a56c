//! Entry point for a whole edit request.

use crate::error::EditError;
use crate::request::{ChangeRequest, EditRequest};
use crate::result::FileResult;
use crate::session::{EditSession, SessionOptions};
use crate::workspace::FileSystem;
use std::collections::HashMap;

/// Changes for one file, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub path: String,
    pub changes: Vec<ChangeRequest>,
}

/// Group changes by path, keeping request order within each group and
/// first-appearance order across groups.
pub fn group_by_path(changes: &[ChangeRequest]) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for change in changes {
        let slot = *index.entry(change.path.as_str()).or_insert_with(|| {
            groups.push(FileGroup {
                path: change.path.clone(),
                changes: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].changes.push(change.clone());
    }

    groups
}

/// Apply every change in `request`, one file at a time.
///
/// The request is validated first; an invalid request is the only way this
/// returns `Err`, and in that case nothing is read or written. Otherwise
/// every distinct path gets exactly one result, and a failure in one file
/// never stops the others.
pub fn apply_request<F: FileSystem + ?Sized>(
    request: &EditRequest,
    fs: &F,
) -> Result<Vec<FileResult>, EditError> {
    request.validate()?;

    let options = SessionOptions {
        dry_run: request.dry_run,
        output_diff: request.output_diff,
    };
    let groups = group_by_path(&request.changes);
    tracing::debug!(
        files = groups.len(),
        changes = request.changes.len(),
        dry_run = options.dry_run,
        "applying edit request"
    );

    let results = groups
        .into_iter()
        .map(|group| {
            let mut session = EditSession::new(group.path.clone(), group.changes, options, fs);
            session.run().unwrap_or_else(|err| {
                tracing::error!(path = %group.path, error = %err, "file failed");
                FileResult::failed(group.path.clone(), err.file_message(&group.path))
            })
        })
        .collect();

    Ok(results)
}
