//! Adjacency detection between labeled regions and another category
//!
//! A region of class A is "touching" class B when its own dilation meets
//! B's field anywhere. The test is per region: a touching region counts
//! with its full original area, a non-touching one not at all. The total
//! is therefore never larger than A's area.
//!
//! Each region is dilated inside its bounding box grown by the margin and
//! clipped to the frame. That window holds the region's whole dilation, so
//! the result equals dilating the region's full-frame mask.

use crate::conncomp::Labeling;
use crate::error::RegionResult;
use crate::label::label_lookup;
use plaque_core::BinaryField;
use plaque_morph::{Sel, dilate};

/// Options for adjacency detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyOptions {
    /// Dilation reach in pixels; 1 is the 3x3 full element
    pub margin: u32,
}

impl Default for AdjacencyOptions {
    fn default() -> Self {
        Self { margin: 1 }
    }
}

/// Which regions of A touch B, and their combined original area
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyResult {
    /// Sum of the original (undilated) areas of touching regions
    pub area: u64,
    /// Labels of touching regions, ascending
    pub touching: Vec<u32>,
}

/// Find the regions of `labeling` whose dilation overlaps `other`.
///
/// # Errors
///
/// Fails if `other` differs in size from the labeled field, or the margin
/// is zero or too large for a structuring element.
pub fn detect_adjacency(
    labeling: &Labeling,
    other: &BinaryField,
    options: &AdjacencyOptions,
) -> RegionResult<AdjacencyResult> {
    labeling.label_map.field().check_same_size(other)?;
    let sel = Sel::with_margin(options.margin)?;

    let mut result = AdjacencyResult::default();
    if !other.has_foreground() {
        return Ok(result);
    }

    let (w, h) = labeling.dimensions();
    for region in &labeling.regions {
        let window = region.bounds.expand_within(options.margin, w, h);
        let mask = labeling.label_map.region_mask_in(region.label, window)?;
        let grown = dilate(&mask, &sel)?;
        if grown.intersects(&other.crop(window)?)? {
            result.area += region.area;
            result.touching.push(region.label);
        }
    }

    Ok(result)
}

/// Adjacency area of `labeling`'s class against `other`.
pub fn adjacency_area(
    labeling: &Labeling,
    other: &BinaryField,
    options: &AdjacencyOptions,
) -> RegionResult<u64> {
    Ok(detect_adjacency(labeling, other, options)?.area)
}

/// Field holding the full original pixels of every touching region
///
/// This is the pseudo-category field ("A in contact with B") that interior
/// sampling runs on for adjacency-derived series. Its foreground count
/// equals [`adjacency_area`].
pub fn adjacency_mask(
    labeling: &Labeling,
    other: &BinaryField,
    options: &AdjacencyOptions,
) -> RegionResult<BinaryField> {
    let result = detect_adjacency(labeling, other, options)?;
    Ok(touching_mask(labeling, &result))
}

/// Build the touching-region field from an already computed result.
pub fn touching_mask(labeling: &Labeling, result: &AdjacencyResult) -> BinaryField {
    let keep = label_lookup(labeling, |r| result.touching.binary_search(&r.label).is_ok());
    labeling.label_map.field().map(|l| keep[l as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conncomp::{ConnectivityType, label_components};

    fn labeled(w: u32, h: u32, pixels: &[(u32, u32)]) -> Labeling {
        let f = BinaryField::from_points(w, h, pixels).unwrap();
        label_components(&f, ConnectivityType::EightWay).unwrap()
    }

    #[test]
    fn test_diagonal_contact_counts() {
        // Region at (1,1)-(2,1); other pixel diagonally below-right of (2,1)
        let a = labeled(6, 6, &[(1, 1), (2, 1)]);
        let b = BinaryField::from_points(6, 6, &[(3, 2)]).unwrap();
        let r = detect_adjacency(&a, &b, &AdjacencyOptions::default()).unwrap();
        assert_eq!(r.area, 2);
        assert_eq!(r.touching, vec![1]);
    }

    #[test]
    fn test_gap_of_one_pixel_needs_margin_two() {
        let a = labeled(8, 3, &[(1, 1)]);
        let b = BinaryField::from_points(8, 3, &[(3, 1)]).unwrap();
        assert_eq!(adjacency_area(&a, &b, &AdjacencyOptions { margin: 1 }).unwrap(), 0);
        assert_eq!(adjacency_area(&a, &b, &AdjacencyOptions { margin: 2 }).unwrap(), 1);
    }

    #[test]
    fn test_whole_region_counts() {
        // A long bar touching B only at its right end
        let bar: Vec<_> = (0..6).map(|x| (x, 2)).collect();
        let mut pixels = bar.clone();
        pixels.push((0, 5));
        let a = labeled(8, 6, &pixels);
        let b = BinaryField::from_points(8, 6, &[(6, 3)]).unwrap();

        let r = detect_adjacency(&a, &b, &AdjacencyOptions::default()).unwrap();
        assert_eq!(r.area, 6);
        let mask = adjacency_mask(&a, &b, &AdjacencyOptions::default()).unwrap();
        assert_eq!(mask.count_foreground(), 6);
        assert_eq!(mask.get(0, 5), Some(false));
    }

    #[test]
    fn test_empty_other() {
        let a = labeled(4, 4, &[(1, 1)]);
        let b = BinaryField::new(4, 4).unwrap();
        let r = detect_adjacency(&a, &b, &AdjacencyOptions::default()).unwrap();
        assert_eq!(r, AdjacencyResult::default());
    }

    #[test]
    fn test_size_mismatch_and_bad_margin() {
        let a = labeled(4, 4, &[(1, 1)]);
        let b = BinaryField::from_points(5, 4, &[(0, 0)]).unwrap();
        assert!(detect_adjacency(&a, &b, &AdjacencyOptions::default()).is_err());
        let b = BinaryField::from_points(4, 4, &[(0, 0)]).unwrap();
        assert!(detect_adjacency(&a, &b, &AdjacencyOptions { margin: 0 }).is_err());
        assert!(detect_adjacency(&a, &b, &AdjacencyOptions { margin: 40_000 }).is_err());
    }
}
