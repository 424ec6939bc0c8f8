use crate::scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YamlStructError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Unsupported file type {extension:?} for {path}, expected .{expected}")]
    UnsupportedExtension {
        path: PathBuf,
        extension: String,
        expected: String,
    },

    #[error("Failed to convert {file}: {source}")]
    Scan {
        file: PathBuf,
        #[source]
        source: ScanError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("{failed} of {total} schema files failed to convert")]
    BatchFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, YamlStructError>;

impl YamlStructError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        YamlStructError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        YamlStructError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn scan(file: impl Into<PathBuf>, source: ScanError) -> Self {
        YamlStructError::Scan {
            file: file.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        YamlStructError::Config(message.into())
    }

    /// Whether the failure came from the schema text rather than the filesystem.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, YamlStructError::Scan { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::ExtractError;

    #[test]
    fn test_scan_error_display_carries_file_and_position() {
        let err = YamlStructError::scan(
            "schemas/user.yaml",
            ScanError::Extract {
                line: 4,
                text: "typeNumber".to_string(),
                source: ExtractError::MalformedLine,
            },
        );
        let message = err.to_string();
        assert!(message.contains("schemas/user.yaml"));
        assert!(message.contains("line 4"));
        assert!(message.contains("typeNumber"));
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_io_error_is_not_parse_failure() {
        let err = YamlStructError::file_access(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(!err.is_parse_failure());
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_batch_failed_display() {
        let err = YamlStructError::BatchFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 schema files failed to convert");
    }
}
