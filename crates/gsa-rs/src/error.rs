//! Error types for the gsa-rs library.
//!
//! All fallible operations return a [`Result<T>`], an alias for
//! `Result<T, UsageError>`.
//!
//! # Error Categories
//!
//! - **Configuration**: [`ConfigNotFound`], [`ConfigRead`], [`ConfigParse`]
//! - **Startup**: [`BinaryNotFound`]
//! - **Store access**: [`StoreNotFound`], [`VolumeNotFound`],
//!   [`ManifestNotFound`], [`InvalidStore`], [`Io`]
//! - **Store records**: [`Parse`]
//! - **External tool**: [`ExternalTool`], [`MangledStats`]
//!
//! Store access and record errors are recoverable at the aggregation layer,
//! where they zero out a single figure of the report. External tool errors
//! are not; see [`UsageError::is_protocol_failure`].
//!
//! [`ConfigNotFound`]: UsageError::ConfigNotFound
//! [`ConfigRead`]: UsageError::ConfigRead
//! [`ConfigParse`]: UsageError::ConfigParse
//! [`BinaryNotFound`]: UsageError::BinaryNotFound
//! [`StoreNotFound`]: UsageError::StoreNotFound
//! [`VolumeNotFound`]: UsageError::VolumeNotFound
//! [`ManifestNotFound`]: UsageError::ManifestNotFound
//! [`InvalidStore`]: UsageError::InvalidStore
//! [`Io`]: UsageError::Io
//! [`Parse`]: UsageError::Parse
//! [`ExternalTool`]: UsageError::ExternalTool
//! [`MangledStats`]: UsageError::MangledStats

use std::path::PathBuf;

/// Result type alias for operations that may return a UsageError.
pub type Result<T> = std::result::Result<T, UsageError>;

/// Error types for store usage computation.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// The grootfs configuration file does not exist.
    #[error("grootfs config not found at {0}")]
    ConfigNotFound(PathBuf),

    /// The grootfs configuration exists but could not be read.
    #[error("failed to read grootfs config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grootfs configuration could not be parsed.
    #[error("failed to parse grootfs config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The grootfs executable does not exist.
    #[error("grootfs not found at {0}")]
    BinaryNotFound(PathBuf),

    /// Store root directory was not found.
    #[error("store root not found at {0}")]
    StoreNotFound(PathBuf),

    /// A referenced volume has no metadata record.
    #[error("volume metadata not found: {0}")]
    VolumeNotFound(String),

    /// A container has no dependency manifest.
    #[error("dependency manifest not found: {0}")]
    ManifestNotFound(String),

    /// The store layout is not what grootfs writes.
    #[error("invalid store: {0}")]
    InvalidStore(String),

    /// A store record is not in the expected JSON shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stats tool could not be run or exited non-zero.
    #[error("could not execute grootfs: {reason} : {output:?}")]
    ExternalTool { reason: String, output: String },

    /// The stats tool ran but its output is not a stats record.
    #[error("mangled response from grootfs: {source} : {output:?}")]
    MangledStats {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UsageError {
    /// Whether the error means the stats tool's responses cannot be trusted.
    ///
    /// These abort a usage computation instead of degrading one figure.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(
            self,
            UsageError::ExternalTool { .. } | UsageError::MangledStats { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_failure_classification() {
        let tool = UsageError::ExternalTool {
            reason: "exit status: 1".to_string(),
            output: "boom".to_string(),
        };
        assert!(tool.is_protocol_failure());

        let mangled = UsageError::MangledStats {
            source: serde_json::from_str::<u64>("nope").unwrap_err(),
            output: "nope".to_string(),
        };
        assert!(mangled.is_protocol_failure());

        assert!(!UsageError::VolumeNotFound("volume-x".to_string()).is_protocol_failure());
        assert!(!UsageError::Io(std::io::Error::other("eio")).is_protocol_failure());
    }

    #[test]
    fn test_not_found_messages() {
        let err = UsageError::BinaryNotFound(PathBuf::from("/not/found"));
        assert_eq!(err.to_string(), "grootfs not found at /not/found");

        let err = UsageError::ConfigNotFound(PathBuf::from("/not/found"));
        assert_eq!(err.to_string(), "grootfs config not found at /not/found");
    }

    #[test]
    fn test_external_tool_message_includes_output() {
        let err = UsageError::ExternalTool {
            reason: "exit status: 2".to_string(),
            output: "no such image".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status: 2"));
        assert!(msg.contains("no such image"));
    }
}
