//! Error types for the provider core

use crate::duration::DurationError;

/// Errors surfaced to the host by the provider core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resource handle was not a NopResource
    #[error("managed resource was not a {expected} (got {found})")]
    UnexpectedKind { expected: String, found: String },

    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] DurationError),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resource not found: {0}")]
    NotFound(String),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, Error>;
