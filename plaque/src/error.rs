//! Pipeline error types
//!
//! A frame that fails is skipped and recorded as a [`FrameFailure`]; the
//! rest of the stack still runs. [`PipelineError::Aggregation`] is the
//! one whole-stack failure: it means the intensity data is corrupt.

use plaque_stats::StatsError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from configuring or running a stack analysis
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error (dimension mismatch, overlapping categories, ...)
    #[error("core error: {0}")]
    Core(#[from] plaque_core::Error),

    /// Region analysis error
    #[error("region error: {0}")]
    Region(#[from] plaque_region::RegionError),

    /// Color classification error
    #[error("color error: {0}")]
    Color(#[from] plaque_color::ColorError),

    /// Stack or report I/O error
    #[error("I/O error: {0}")]
    Io(#[from] plaque_io::IoError),

    /// Histogram aggregation or clustering failed for the whole stack
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] StatsError),

    /// An adjacency series measured more area than its base category has
    #[error("{series} area {area} exceeds base area {base}")]
    AdjacencyArea {
        series: plaque_core::SeriesKey,
        area: u64,
        base: u64,
    },

    /// A configuration value is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read
    #[error("cannot read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::AnalysisConfig`]
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A frame that was skipped, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameFailure {
    /// Frame index within the stack
    pub frame: usize,
    /// Rendered error
    pub reason: String,
}

impl FrameFailure {
    /// Record the error that stopped a frame.
    pub fn new(frame: usize, error: &PipelineError) -> Self {
        Self {
            frame,
            reason: error.to_string(),
        }
    }
}
