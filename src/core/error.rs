//! Error types for Treepack

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Treepack operations
#[derive(Error, Debug)]
pub enum TreepackError {
    /// Scan root errors
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Package document errors
    #[error("Invalid package document {path}: {reason}")]
    InvalidPackage { path: PathBuf, reason: String },

    #[error("Unsafe entry name '{name}' in {parent}")]
    UnsafeEntryName { name: String, parent: PathBuf },

    /// Content block errors
    #[error("Unsupported {kind} encoding '{encoding}' for {path}")]
    UnsupportedEncoding {
        kind: String,
        encoding: String,
        path: PathBuf,
    },

    #[error("Text for {path} cannot be encoded as {encoding}")]
    UnencodableText { encoding: String, path: PathBuf },

    #[error("Invalid base64 data for {path}: {reason}")]
    InvalidBase64 { path: PathBuf, reason: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    /// I/O errors with the path that caused them
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors without path context
    #[error("I/O error: {0}")]
    RawIo(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl TreepackError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid package error
    pub fn invalid_package(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPackage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Errors that abort an extraction instead of being counted and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidPackage { .. } | Self::UnsupportedEncoding { .. }
        )
    }
}

/// Result type alias for Treepack operations
pub type Result<T> = std::result::Result<T, TreepackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_tier() {
        let fatal = TreepackError::UnsupportedEncoding {
            kind: "binary".to_string(),
            encoding: "hex".to_string(),
            path: PathBuf::from("a.bin"),
        };
        assert!(fatal.is_fatal());

        let recorded = TreepackError::io(
            "a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!recorded.is_fatal());
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = TreepackError::io(
            "/tmp/x/a.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/x/a.txt"));
        assert!(message.contains("gone"));

        let err = TreepackError::invalid_package("pkg.json", "top-level type is 'file'");
        assert!(err.to_string().contains("pkg.json"));
    }
}
