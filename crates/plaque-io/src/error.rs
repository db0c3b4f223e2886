//! I/O error types
//!
//! Each reader and writer maps its underlying library errors into
//! `IoError` variants so that callers only need to handle one error type.

use thiserror::Error;

/// Error type for stack and report I/O
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The page layout is not one this library reads
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The data is structurally invalid
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The TIFF decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The TIFF encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// The classification and intensity stacks do not line up
    #[error("stack mismatch: {0}")]
    StackMismatch(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error from the core library (e.g. buffer length)
    #[error("core error: {0}")]
    Core(#[from] plaque_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
