//! Platform error types

use thiserror::Error;

/// Platform-related errors
///
/// None of these reach application code through the theme controller: they
/// are logged and the affected feature is treated as disabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Durable storage is disabled or inaccessible
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Storage refused the write
    #[error("Storage quota exceeded while writing `{0}`")]
    QuotaExceeded(String),

    /// The color-scheme media query is not supported
    #[error("Color scheme query unavailable: {0}")]
    MediaQueryUnavailable(String),

    /// No document to inject styles into
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    /// Filesystem failure in a file-backed store
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
