//! Whole-stack accumulation
//!
//! Frame outcomes are folded into a [`StackAccumulator`]. Accumulators are
//! merged by addition, so the result does not depend on which thread ran
//! which frame or in what order they finished.

use crate::error::{FrameFailure, PipelineResult};
use crate::frame::{FrameAreas, FrameOutcome};
use plaque_core::SeriesKey;
use plaque_stats::{HistogramAggregator, HistogramSet};
use serde::Serialize;

/// Per-frame areas of a stack, in frame order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AreaTable {
    rows: Vec<FrameAreas>,
}

impl AreaTable {
    /// Rows in frame order.
    pub fn rows(&self) -> &[FrameAreas] {
        &self.rows
    }

    /// Row of one frame, if it was analyzed.
    pub fn frame(&self, frame: usize) -> Option<&FrameAreas> {
        self.rows
            .binary_search_by_key(&frame, |r| r.frame)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Area of a series in one frame.
    pub fn get(&self, frame: usize, key: SeriesKey) -> Option<u64> {
        self.frame(frame).map(|r| r.area(key))
    }

    /// Area of a series summed over all frames.
    pub fn total(&self, key: SeriesKey) -> u64 {
        self.rows.iter().map(|r| r.area(key)).sum()
    }

    /// Number of analyzed frames.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Running totals of a stack analysis
#[derive(Debug, Clone, Default)]
pub struct StackAccumulator {
    areas: Vec<FrameAreas>,
    histograms: HistogramAggregator,
    skipped: Vec<FrameFailure>,
}

impl StackAccumulator {
    /// Create an accumulator that reports every series in `series`.
    pub fn new<I: IntoIterator<Item = SeriesKey>>(series: I) -> Self {
        Self {
            histograms: HistogramAggregator::with_series(series),
            ..Self::default()
        }
    }

    /// Fold in one analyzed frame.
    pub fn add_outcome(&mut self, outcome: FrameOutcome) {
        for (key, sample) in &outcome.samples {
            self.histograms.add_sample(*key, sample);
        }
        self.areas.push(outcome.areas);
    }

    /// Record a skipped frame.
    pub fn add_failure(&mut self, failure: FrameFailure) {
        self.skipped.push(failure);
    }

    /// Fold in another accumulator.
    pub fn merge(&mut self, other: StackAccumulator) {
        self.areas.extend(other.areas);
        self.histograms.merge(other.histograms);
        self.skipped.extend(other.skipped);
    }

    /// Frames analyzed so far.
    pub fn frames_analyzed(&self) -> usize {
        self.areas.len()
    }

    /// Frames skipped so far.
    pub fn frames_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Close the stack.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::Aggregation`] if any series received
    /// an intensity above 255.
    pub fn finish(mut self) -> PipelineResult<StackTotals> {
        self.areas.sort_by_key(|r| r.frame);
        self.skipped.sort_by_key(|f| f.frame);
        Ok(StackTotals {
            areas: AreaTable { rows: self.areas },
            histograms: self.histograms.finish()?,
            skipped: self.skipped,
        })
    }
}

/// Final totals of a stack, before clustering
#[derive(Debug, Clone, PartialEq)]
pub struct StackTotals {
    pub areas: AreaTable,
    pub histograms: HistogramSet,
    /// Skipped frames in frame order
    pub skipped: Vec<FrameFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use plaque_core::TissueCategory;
    use plaque_stats::IntensitySample;
    use std::collections::BTreeMap;

    const NC: SeriesKey = SeriesKey::Tissue(TissueCategory::NecroticCore);

    fn outcome(frame: usize, area: u64, values: Vec<u16>) -> FrameOutcome {
        let mut areas = FrameAreas {
            frame,
            ..FrameAreas::default()
        };
        areas.tissue.insert(TissueCategory::NecroticCore, area);
        let mut samples = BTreeMap::new();
        samples.insert(NC, IntensitySample::from_values(values));
        FrameOutcome {
            areas,
            components: BTreeMap::new(),
            samples,
        }
    }

    #[test]
    fn test_merge_is_order_free() {
        let mut a = StackAccumulator::new([NC]);
        a.add_outcome(outcome(2, 5, vec![1, 1]));
        let mut b = StackAccumulator::new([NC]);
        b.add_outcome(outcome(0, 7, vec![3]));
        b.add_failure(FrameFailure {
            frame: 1,
            reason: "bad".to_string(),
        });

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        let ab = ab.finish().unwrap();
        let ba = ba.finish().unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.areas.len(), 2);
        assert_eq!(ab.areas.rows()[0].frame, 0);
        assert_eq!(ab.areas.total(NC), 12);
        assert_eq!(ab.areas.get(2, NC), Some(5));
        assert_eq!(ab.areas.get(1, NC), None);
        assert_eq!(ab.histograms.get(NC).unwrap().get(1), 2);
        assert_eq!(ab.skipped.len(), 1);
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let mut acc = StackAccumulator::new([NC]);
        acc.add_outcome(outcome(0, 1, vec![256]));
        assert!(matches!(acc.finish(), Err(PipelineError::Aggregation(_))));
    }
}
