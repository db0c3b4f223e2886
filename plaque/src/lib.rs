//! Plaque - Tissue-composition analysis of vessel-imaging stacks
//!
//! Each frame of a stack is classified into six tissue categories. The
//! library then measures per-category areas, detects where one category
//! touches another, samples gray intensities from the pure interior of
//! each region, and clusters the categories by how alike their intensity
//! distributions are.
//!
//! # Example
//!
//! ```
//! use plaque::{AnalysisConfig, StackRunner};
//!
//! let runner = StackRunner::new(AnalysisConfig::default()).unwrap();
//! let report = runner.run(&[]).unwrap();
//! assert_eq!(report.frames_total, 0);
//! assert!(report.dendrogram.is_none());
//! ```
//!
//! The building blocks are re-exported as modules: [`morph`] (erosion and
//! dilation), [`region`] (labeling, adjacency, interior sampling),
//! [`stats`] (histograms and clustering), [`color`] and [`io`].

pub mod accumulator;
pub mod classify;
pub mod config;
mod error;
pub mod export;
pub mod frame;
pub mod logger;
pub mod report;
pub mod runner;

// Re-export core types (primary data structures used everywhere)
pub use plaque_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use plaque_color as color;
pub use plaque_io as io;
pub use plaque_morph as morph;
pub use plaque_region as region;
pub use plaque_stats as stats;

pub use accumulator::{AreaTable, StackAccumulator, StackTotals};
pub use classify::{ClassificationSummary, PlaqueType, RiskLevel, classify_plaque};
pub use config::{AnalysisConfig, MAX_MARGIN};
pub use error::{FrameFailure, PipelineError, PipelineResult};
pub use export::{export_category_masks, mask_file_name};
pub use frame::{FrameAreas, FrameOutcome, analyze_frame};
pub use report::{AnalysisReport, FrameRow, RANKED_PAIRS, SeriesRow};
pub use runner::{StackRunner, classify_input};
