//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur during snapshot capture and restore.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed.
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot format version is not supported by this build.
    #[error("unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The stored state name is not in the definition's declared set.
    #[error("snapshot state '{state}' is not declared by the definition")]
    UnknownState { state: String },

    /// The rehydrated instance failed validation.
    #[error("snapshot validation failed: {0}")]
    ValidationFailed(String),
}
