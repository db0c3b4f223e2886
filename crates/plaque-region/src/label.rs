//! Component summaries and size filtering
//!
//! Helpers that read a [`Labeling`] without relabeling the field.

use crate::conncomp::{ConnectivityType, Labeling, label_components};
use crate::error::RegionResult;
use plaque_core::{BinaryField, Region};
use serde::Serialize;

/// Aggregate statistics over the regions of one labeling
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComponentSummary {
    /// Sum of region areas
    pub total_area: u64,
    /// Number of regions
    pub region_count: usize,
    /// Area of the largest region (0 if none)
    pub largest: u64,
    /// Area of the smallest region (0 if none)
    pub smallest: u64,
    /// Mean region area (0 if none)
    pub mean_area: f64,
}

impl ComponentSummary {
    /// Summarize a list of regions.
    pub fn from_regions(regions: &[Region]) -> Self {
        if regions.is_empty() {
            return Self::default();
        }
        let total_area: u64 = regions.iter().map(|r| r.area).sum();
        Self {
            total_area,
            region_count: regions.len(),
            largest: regions.iter().map(|r| r.area).max().unwrap_or(0),
            smallest: regions.iter().map(|r| r.area).min().unwrap_or(0),
            mean_area: total_area as f64 / regions.len() as f64,
        }
    }
}

/// Count the number of connected components
pub fn count_components(field: &BinaryField, connectivity: ConnectivityType) -> RegionResult<u32> {
    Ok(label_components(field, connectivity)?.label_map.num_labels())
}

/// Get pixel count for each component
///
/// The index corresponds to (label - 1).
pub fn component_sizes(labeling: &Labeling) -> Vec<u64> {
    labeling.regions.iter().map(|r| r.area).collect()
}

/// Keep only the regions with at least `min_size` pixels
///
/// Returns a binary field holding the full pixels of every surviving region.
pub fn filter_regions_by_size(labeling: &Labeling, min_size: u64) -> BinaryField {
    let keep = label_lookup(labeling, |r| r.area >= min_size);
    labeling.label_map.field().map(|l| keep[l as usize])
}

/// Boolean table indexed by label; entry 0 (background) is always false.
pub(crate) fn label_lookup<F>(labeling: &Labeling, pred: F) -> Vec<bool>
where
    F: Fn(&Region) -> bool,
{
    let mut keep = vec![false; labeling.num_regions() + 1];
    for r in &labeling.regions {
        keep[r.label as usize] = pred(r);
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(pixels: &[(u32, u32)]) -> Labeling {
        let f = BinaryField::from_points(8, 6, pixels).unwrap();
        label_components(&f, ConnectivityType::EightWay).unwrap()
    }

    #[test]
    fn test_summary() {
        let labeling = labeled(&[(0, 0), (1, 0), (2, 0), (5, 5), (7, 0), (7, 1)]);
        let s = ComponentSummary::from_regions(&labeling.regions);
        assert_eq!(s.region_count, 3);
        assert_eq!(s.total_area, 6);
        assert_eq!(s.largest, 3);
        assert_eq!(s.smallest, 1);
        assert!((s.mean_area - 2.0).abs() < 1e-12);
        assert_eq!(component_sizes(&labeling), vec![3, 2, 1]);
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(ComponentSummary::from_regions(&[]), ComponentSummary::default());
    }

    #[test]
    fn test_filter_by_size() {
        let labeling = labeled(&[(0, 0), (1, 0), (2, 0), (5, 5)]);
        let kept = filter_regions_by_size(&labeling, 2);
        assert_eq!(kept.count_foreground(), 3);
        assert_eq!(kept.get(5, 5), Some(false));
        assert_eq!(filter_regions_by_size(&labeling, 1).count_foreground(), 4);
        assert_eq!(filter_regions_by_size(&labeling, 4).count_foreground(), 0);
    }

    #[test]
    fn test_count_components() {
        let f = BinaryField::from_points(4, 4, &[(0, 0), (1, 1), (3, 3)]).unwrap();
        assert_eq!(count_components(&f, ConnectivityType::EightWay).unwrap(), 2);
        assert_eq!(count_components(&f, ConnectivityType::FourWay).unwrap(), 3);
    }
}
