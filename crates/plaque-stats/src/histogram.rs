//! Intensity histograms
//!
//! Per-series gray-level histograms over the fixed domain `0..=255`.
//! Samples from independent frames are accumulated by addition, so the
//! final histograms do not depend on the order frames finish in.
//!
//! An intensity above 255 is a data-integrity violation. It is never
//! clamped: the aggregator remembers it and [`HistogramAggregator::finish`]
//! fails with [`StatsError::OutOfRange`].

use crate::error::{StatsError, StatsResult};
use plaque_core::SeriesKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of histogram bins
pub const HISTOGRAM_BINS: usize = 256;

/// Largest valid intensity
pub const MAX_INTENSITY: u16 = (HISTOGRAM_BINS - 1) as u16;

/// Unordered multiset of intensity values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntensitySample {
    values: Vec<u16>,
}

impl IntensitySample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap collected values.
    pub fn from_values(values: Vec<u16>) -> Self {
        Self { values }
    }

    /// Add more values.
    pub fn extend_from_slice(&mut self, values: &[u16]) {
        self.values.extend_from_slice(values);
    }

    /// Move all values of `other` into this sample.
    pub fn merge(&mut self, mut other: IntensitySample) {
        self.values.append(&mut other.values);
    }

    /// The values, in no particular order.
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sample holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 256-bin count histogram indexed by intensity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Create an all-zero histogram.
    pub fn new() -> Self {
        Self {
            counts: vec![0; HISTOGRAM_BINS],
        }
    }

    /// Wrap an existing count vector.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::BinCount`] unless `counts` has 256 entries.
    pub fn from_counts(counts: Vec<u64>) -> StatsResult<Self> {
        if counts.len() != HISTOGRAM_BINS {
            return Err(StatsError::BinCount {
                expected: HISTOGRAM_BINS,
                actual: counts.len(),
            });
        }
        Ok(Self { counts })
    }

    /// Bin every value of a sample.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::OutOfRange`] for the first value above 255.
    pub fn from_sample(series: SeriesKey, sample: &IntensitySample) -> StatsResult<Self> {
        let mut hist = Self::new();
        if let Some(value) = hist.add_values(sample.values()) {
            return Err(StatsError::OutOfRange {
                series,
                value,
                max: MAX_INTENSITY,
            });
        }
        Ok(hist)
    }

    /// Bin values; returns the largest out-of-range value, if any.
    ///
    /// In-range values are counted even when some are rejected.
    pub fn add_values(&mut self, values: &[u16]) -> Option<u16> {
        let mut rejected: Option<u16> = None;
        for &v in values {
            match self.counts.get_mut(v as usize) {
                Some(c) => *c += 1,
                None => rejected = Some(rejected.map_or(v, |r| r.max(v))),
            }
        }
        rejected
    }

    /// Add another histogram bin by bin.
    pub fn merge(&mut self, other: &Histogram) {
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
    }

    /// Count in one bin; 0 outside the domain.
    pub fn get(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// All 256 counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all counts, equal to the size of the binned sample.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Whether no value has been binned.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Mean intensity, or `None` for an empty histogram.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let sum: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| i as f64 * c as f64)
            .sum();
        Some(sum / total as f64)
    }

    /// Most frequent intensity (lowest on ties), or `None` if empty.
    pub fn mode(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        Some(best)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Final per-series histograms of a stack, in series order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistogramSet {
    series: BTreeMap<SeriesKey, Histogram>,
}

impl HistogramSet {
    /// Histogram of one series.
    pub fn get(&self, key: SeriesKey) -> Option<&Histogram> {
        self.series.get(&key)
    }

    /// Iterate `(series, histogram)` in series order.
    pub fn iter(&self) -> impl Iterator<Item = (SeriesKey, &Histogram)> {
        self.series.iter().map(|(k, h)| (*k, h))
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether there are no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series with no samples at all.
    pub fn empty_series(&self) -> Vec<SeriesKey> {
        self.iter()
            .filter(|(_, h)| h.is_empty())
            .map(|(k, _)| k)
            .collect()
    }
}

impl FromIterator<(SeriesKey, Histogram)> for HistogramSet {
    fn from_iter<I: IntoIterator<Item = (SeriesKey, Histogram)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// Accumulates intensity samples per series across frames
///
/// Aggregators built on different threads are combined with
/// [`HistogramAggregator::merge`]; merging is commutative and associative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramAggregator {
    series: BTreeMap<SeriesKey, Histogram>,
    out_of_range: BTreeMap<SeriesKey, u16>,
}

impl HistogramAggregator {
    /// Create an aggregator with no series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator that reports every series in `keys`, even
    /// those that never receive a sample.
    pub fn with_series<I: IntoIterator<Item = SeriesKey>>(keys: I) -> Self {
        let mut agg = Self::new();
        for key in keys {
            agg.series.entry(key).or_default();
        }
        agg
    }

    /// Add one frame's values for a series.
    pub fn add_values(&mut self, key: SeriesKey, values: &[u16]) {
        let hist = self.series.entry(key).or_default();
        if let Some(bad) = hist.add_values(values) {
            let worst = self.out_of_range.entry(key).or_insert(bad);
            *worst = (*worst).max(bad);
        }
    }

    /// Add one frame's sample for a series.
    pub fn add_sample(&mut self, key: SeriesKey, sample: &IntensitySample) {
        self.add_values(key, sample.values());
    }

    /// Fold another aggregator into this one.
    pub fn merge(&mut self, other: HistogramAggregator) {
        for (key, hist) in other.series {
            self.series.entry(key).or_default().merge(&hist);
        }
        for (key, bad) in other.out_of_range {
            let worst = self.out_of_range.entry(key).or_insert(bad);
            *worst = (*worst).max(bad);
        }
    }

    /// Number of values binned so far for a series.
    pub fn total(&self, key: SeriesKey) -> u64 {
        self.series.get(&key).map_or(0, Histogram::total)
    }

    /// Produce the final histograms.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::OutOfRange`] if any series ever received an
    /// intensity above 255; the lowest such series is reported.
    pub fn finish(self) -> StatsResult<HistogramSet> {
        if let Some((&series, &value)) = self.out_of_range.iter().next() {
            return Err(StatsError::OutOfRange {
                series,
                value,
                max: MAX_INTENSITY,
            });
        }
        Ok(HistogramSet {
            series: self.series,
        })
    }
}
