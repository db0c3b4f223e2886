//! Interior sampling
//!
//! Collects gray intensities from the "pure" interior of each region:
//! pixels of regions with at least `min_region_size` pixels that survive an
//! erosion of their own region's mask. Erosion is done per region, so a
//! thin bridge between two regions of the same category never props up
//! either one's interior. A region thinner than the element contributes
//! nothing, whatever its area.

use crate::conncomp::Labeling;
use crate::error::RegionResult;
use plaque_core::{BinaryField, BinaryFieldMut, GrayField};
use plaque_morph::{Sel, erode};

/// Options for interior sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteriorOptions {
    /// Regions smaller than this are skipped entirely
    pub min_region_size: u64,
    /// Erosion reach in pixels; 1 is the 3x3 full element
    pub margin: u32,
}

impl Default for InteriorOptions {
    fn default() -> Self {
        Self {
            min_region_size: 5,
            margin: 1,
        }
    }
}

/// Union of the per-region erosions of every large-enough region.
pub fn interior_mask(labeling: &Labeling, options: &InteriorOptions) -> RegionResult<BinaryField> {
    let sel = Sel::with_margin(options.margin)?;
    let (w, h) = labeling.dimensions();
    let mut out = BinaryFieldMut::new(w, h)?;

    for region in labeling
        .regions
        .iter()
        .filter(|r| r.area >= options.min_region_size)
    {
        // The bounding box is tight, so its edge pixels are never interior
        // whether the outside reads as "not this region" or as "off frame".
        let window = region.bounds;
        let mask = labeling.label_map.region_mask_in(region.label, window)?;
        let core = erode(&mask, &sel)?;
        for (x, y) in core.foreground_points() {
            out.set_unchecked(window.x + x, window.y + y, true);
        }
    }

    Ok(out.into())
}

/// Gray values at the interior pixels of `labeling`'s regions.
///
/// The returned values are an unordered sample; callers bin them.
///
/// # Errors
///
/// Fails if `gray` is not the same size as the labeled field.
pub fn collect_interior_intensities(
    labeling: &Labeling,
    gray: &GrayField,
    options: &InteriorOptions,
) -> RegionResult<Vec<u16>> {
    labeling.label_map.field().check_same_size(gray)?;
    let mask = interior_mask(labeling, options)?;
    Ok(gray.values_under(&mask)?)
}
