//! Error types for plaque-core
//!
//! Provides a unified error type for the data model. Every variant in this
//! enum belongs to the "invalid input" family: the caller handed in a field
//! whose shape or contents cannot be processed.

use thiserror::Error;

/// Plaque core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A grid with zero width or height
    #[error("invalid field dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Two fields of the same frame disagree in size
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Backing buffer does not hold exactly width * height samples
    #[error("buffer length {len} does not match {width}x{height}")]
    BufferLength { len: usize, width: u32, height: u32 },

    /// Coordinates outside the grid
    #[error("index out of bounds: ({x}, {y}) in {width}x{height}")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Category name that does not name a tissue class
    #[error("unknown tissue category: {0}")]
    UnknownCategory(String),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for plaque-core operations
pub type Result<T> = std::result::Result<T, Error>;
