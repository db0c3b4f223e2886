//! plaque-region - Region analysis for tissue fields
//!
//! This crate provides:
//!
//! - Connected component labeling (two-pass Union-Find, 4- or 8-way)
//! - Component summaries and size filtering
//! - Adjacency detection between a labeled category and another category
//! - Interior sampling of gray intensities from eroded regions

pub mod adjacency;
pub mod conncomp;
mod error;
pub mod interior;
pub mod label;

pub use adjacency::{
    AdjacencyOptions, AdjacencyResult, adjacency_area, adjacency_mask, detect_adjacency,
    touching_mask,
};
pub use conncomp::{ConnectivityType, Labeling, UnionFind, label_components};
pub use error::{RegionError, RegionResult};
pub use interior::{InteriorOptions, collect_interior_intensities, interior_mask};
pub use label::{ComponentSummary, component_sizes, count_components, filter_regions_by_size};
