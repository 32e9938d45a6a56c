use crate::request::schema::{EditRequest, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk encodings accepted for an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Toml,
}

impl RequestFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RequestFormat::Json,
            _ => RequestFormat::Toml,
        }
    }
}

#[derive(Debug)]
pub enum RequestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl RequestError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            RequestError::Io { .. } => self,
            RequestError::Json { path: None, source } => RequestError::Json {
                path: Some(path),
                source,
            },
            RequestError::Toml { path: None, source } => RequestError::Toml {
                path: Some(path),
                source,
            },
            RequestError::Validation { path: None, source } => RequestError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Io { path, source } => {
                write!(
                    f,
                    "failed to read edit request from {}: {}",
                    path.display(),
                    source
                )
            }
            RequestError::Json { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse edit request JSON ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse edit request JSON: {}", source),
            },
            RequestError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse edit request TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse edit request TOML: {}", source),
            },
            RequestError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid edit request ({}): {}", path.display(), source),
                None => write!(f, "invalid edit request: {}", source),
            },
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Io { source, .. } => Some(source),
            RequestError::Json { source, .. } => Some(source),
            RequestError::Toml { source, .. } => Some(source),
            RequestError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str, format: RequestFormat) -> Result<EditRequest, RequestError> {
    let request: EditRequest = match format {
        RequestFormat::Json => serde_json::from_str(input)
            .map_err(|source| RequestError::Json { path: None, source })?,
        RequestFormat::Toml => toml_edit::de::from_str(input)
            .map_err(|source| RequestError::Toml { path: None, source })?,
    };
    request
        .validate()
        .map_err(|source| RequestError::Validation { path: None, source })?;
    Ok(request)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<EditRequest, RequestError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| RequestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, RequestFormat::from_path(path)).map_err(|error| error.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ChangeKind;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RequestFormat::from_path(Path::new("edits.json")),
            RequestFormat::Json
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("edits.JSON")),
            RequestFormat::Json
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("edits.toml")),
            RequestFormat::Toml
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("edits")),
            RequestFormat::Toml
        );
    }

    #[test]
    fn test_load_toml_request() {
        let toml = r#"
dry_run = true

[[changes]]
path = "src/lib.rs"
start_line = 3
search_pattern = "let x = 1;"
replace_content = "let x = 2;"

[[changes]]
path = "src/lib.rs"
start_line = 1
search_pattern = '^use .*;$'
use_regex = true
match_occurrence = 2
"#;
        let request = load_from_str(toml, RequestFormat::Toml).unwrap();
        assert!(request.dry_run);
        assert!(request.output_diff);
        assert_eq!(request.changes.len(), 2);
        assert!(request.changes[1].use_regex);
        assert_eq!(request.changes[1].match_occurrence, 2);
        assert_eq!(
            request.changes[1].kind(),
            Some(ChangeKind::Delete {
                pattern: "^use .*;$"
            })
        );
    }

    #[test]
    fn test_load_json_request() {
        let json = r#"{
            "changes": [
                {"path": "a.txt", "start_line": 2, "replace_content": "x"}
            ],
            "output_diff": false
        }"#;
        let request = load_from_str(json, RequestFormat::Json).unwrap();
        assert!(!request.output_diff);
        assert_eq!(
            request.changes[0].kind(),
            Some(ChangeKind::Insert { text: "x" })
        );
    }

    #[test]
    fn test_load_rejects_invalid_request() {
        let json = r#"{"changes": [{"path": "a.txt", "start_line": 0}]}"#;
        let err = load_from_str(json, RequestFormat::Json).unwrap_err();
        assert!(matches!(err, RequestError::Validation { .. }));
        assert!(err.to_string().contains("start_line"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let err = load_from_str("{not json", RequestFormat::Json).unwrap_err();
        assert!(matches!(err, RequestError::Json { path: None, .. }));
    }

    #[test]
    fn test_load_from_path_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("request.toml");
        fs::write(&file, "changes = []\n").unwrap();

        let err = load_from_path(&file).unwrap_err();
        match err {
            RequestError::Validation { path, .. } => assert_eq!(path, Some(file)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RequestError::Io { .. }));
    }
}
