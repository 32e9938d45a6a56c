pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, RequestError, RequestFormat};
pub use schema::{ChangeKind, ChangeRequest, EditRequest, ValidationError, ValidationIssue};
