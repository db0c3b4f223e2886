//! Analysis report
//!
//! The report collects everything downstream tools need: per-frame areas
//! with plaque types, per-series histograms, the distance matrix and the
//! dendrogram. Series without any interior sample are listed under
//! `no_data` instead of getting an all-zero histogram. Skipped frames are
//! listed with the reason they failed.

use crate::accumulator::StackTotals;
use crate::classify::{ClassificationSummary, PlaqueType, classify_plaque};
use crate::config::AnalysisConfig;
use crate::error::{FrameFailure, PipelineResult};
use crate::frame::FrameAreas;
use plaque_core::SeriesKey;
use plaque_stats::{ClusterResult, Dendrogram, DistanceMatrix, HistogramSet, PairDistance};
use serde::Serialize;
use std::path::Path;

/// Number of pairs listed in the similar / distinct rankings
pub const RANKED_PAIRS: usize = 5;

/// One analyzed frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    #[serde(flatten)]
    pub areas: FrameAreas,
    pub plaque_type: PlaqueType,
}

/// Summary of one histogram series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub series: SeriesKey,
    /// Number of binned samples
    pub samples: u64,
    pub mean: Option<f64>,
    pub mode: Option<usize>,
}

/// Complete result of a stack analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    /// Frames submitted, analyzed or not
    pub frames_total: usize,
    pub frames: Vec<FrameRow>,
    pub classification: ClassificationSummary,
    pub series: Vec<SeriesRow>,
    pub histograms: HistogramSet,
    /// Series with no samples; left out of clustering
    pub no_data: Vec<SeriesKey>,
    pub distances: DistanceMatrix,
    pub most_similar: Vec<PairDistance>,
    pub most_distinct: Vec<PairDistance>,
    pub dendrogram: Option<Dendrogram>,
    /// Leaves left to right, for plotting
    pub leaf_order: Vec<SeriesKey>,
    pub skipped: Vec<FrameFailure>,
}

impl AnalysisReport {
    /// Assemble the report of a finished stack.
    pub fn new(
        config: &AnalysisConfig,
        frames_total: usize,
        totals: StackTotals,
        clusters: ClusterResult,
    ) -> Self {
        let frames: Vec<FrameRow> = totals
            .areas
            .rows()
            .iter()
            .map(|areas| FrameRow {
                plaque_type: classify_plaque(areas),
                areas: areas.clone(),
            })
            .collect();
        let classification = ClassificationSummary::from_types(frames.iter().map(|r| r.plaque_type));

        let series = totals
            .histograms
            .iter()
            .map(|(key, h)| SeriesRow {
                series: key,
                samples: h.total(),
                mean: h.mean(),
                mode: h.mode(),
            })
            .collect();

        let leaf_order = clusters
            .dendrogram
            .as_ref()
            .map(|d| d.leaf_order().into_iter().map(|i| d.leaves[i]).collect())
            .unwrap_or_default();

        Self {
            config: config.clone(),
            frames_total,
            frames,
            classification,
            series,
            histograms: totals.histograms,
            no_data: clusters.input.excluded,
            most_similar: clusters.distances.most_similar_pairs(RANKED_PAIRS),
            most_distinct: clusters.distances.most_distinct_pairs(RANKED_PAIRS),
            distances: clusters.distances,
            dendrogram: clusters.dendrogram,
            leaf_order,
            skipped: totals.skipped,
        }
    }

    /// Row of one frame, if it was analyzed.
    pub fn frame(&self, frame: usize) -> Option<&FrameRow> {
        self.frames.iter().find(|r| r.areas.frame == frame)
    }

    /// Area of a series summed over analyzed frames.
    pub fn total_area(&self, key: SeriesKey) -> u64 {
        self.frames.iter().map(|r| r.areas.area(key)).sum()
    }

    /// Write the report as JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> PipelineResult<()> {
        plaque_io::write_report_json(path, self)?;
        Ok(())
    }
}
