//! plaque-stats - Intensity histograms and similarity clustering
//!
//! - [`HistogramAggregator`] bins per-series intensity samples from many
//!   frames into 256-bin [`Histogram`]s
//! - [`cluster_histograms`] normalizes them, computes a [`DistanceMatrix`]
//!   and builds a Ward-linkage [`Dendrogram`]

pub mod cluster;
mod error;
pub mod histogram;

pub use cluster::{
    ClusterInput, ClusterResult, Dendrogram, DendrogramNode, DistanceMatrix, Merge,
    NormalizedHistogram, PairDistance, TIE_EPSILON, cluster_histograms, ward_linkage,
};
pub use error::{StatsError, StatsResult};
pub use histogram::{
    HISTOGRAM_BINS, Histogram, HistogramAggregator, HistogramSet, IntensitySample, MAX_INTENSITY,
};
