//! Error types for plaque-stats

use plaque_core::SeriesKey;
use thiserror::Error;

/// Errors that can occur while aggregating or clustering histograms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Intensity outside the histogram domain
    #[error("intensity {value} in series {series} is outside 0..={max}")]
    OutOfRange {
        series: SeriesKey,
        value: u16,
        max: u16,
    },

    /// Count vector of the wrong length
    #[error("expected {expected} bins, got {actual}")]
    BinCount { expected: usize, actual: usize },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
