//! Linepatch: batch line-anchored text patching.
//!
//! A request carries changes for one or more files. Each change is an
//! insertion before a line, or a replacement or deletion of a block located
//! by plain text (anchored at a starting line) or by regex. Changes for the
//! same file are applied in memory from the bottom of the file up, then the
//! file is written once and a unified diff is reported.
//!
//! # Architecture
//!
//! Every change compiles down to a single primitive: [`Splice`], a range-checked
//! byte-span replacement on a [`TextBuffer`]. Intelligence lives in span
//! acquisition ([`matcher`]) and indentation handling ([`indent`]), not in
//! the application logic.
//!
//! # Safety
//!
//! - Splices are range-checked before applying; a live run refuses to write
//!   a file that changed on disk since it was read
//! - Atomic file writes (tempfile + fsync + rename)
//! - Workspace boundary enforcement, including symlink escapes
//! - Dry runs compute everything but the write
//!
//! # Example
//!
//! ```no_run
//! use linepatch::{apply_request, ChangeRequest, EditRequest, LocalFs};
//!
//! let fs = LocalFs::new(".")?;
//! let request = EditRequest::new(vec![
//!     ChangeRequest::replace("src/config.rs", 10, "debug: false", "debug: true"),
//! ]);
//!
//! for result in apply_request(&request, &fs)? {
//!     println!("{result}");
//! }
//! # Ok::<(), linepatch::EditError>(())
//! ```

pub mod batch;
pub mod buffer;
pub mod diff;
pub mod edit;
pub mod error;
pub mod indent;
pub mod logging;
pub mod matcher;
pub mod patch;
pub mod request;
pub mod result;
pub mod session;
pub mod workspace;

// Re-exports
pub use batch::{apply_request, group_by_path, FileGroup};
pub use buffer::TextBuffer;
pub use diff::unified_diff;
pub use edit::{EditVerification, Splice};
pub use error::EditError;
pub use patch::{Applied, PatchApplier};
pub use request::{
    load_from_path, load_from_str, ChangeKind, ChangeRequest, EditRequest, RequestError,
    RequestFormat, ValidationError, ValidationIssue,
};
pub use result::{BatchResult, FileResult, FileStatus};
pub use session::{apply_changes, AppliedChanges, EditSession, SessionOptions, SessionState};
pub use workspace::{FileSystem, LocalFs, MemoryFs, WorkspaceGuard};
