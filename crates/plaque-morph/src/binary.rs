//! Binary morphological operations
//!
//! Implements erosion, dilation, opening, and closing for binary fields.
//! Every operation returns a new field; the input is never modified.
//!
//! Boundary condition: pixels outside the field are background. Dilation
//! therefore never grows past the frame edge, and erosion clears every
//! pixel whose element footprint leaves the frame.

use crate::{MorphError, MorphResult, Sel};
use plaque_core::{BinaryField, BinaryFieldMut};

/// Dilate a binary field (row shift-and-OR)
///
/// Dilation expands foreground regions. For each hit position in the SEL,
/// the source field is shifted by that offset and OR-accumulated into the
/// output.
///
/// Algorithm:
///   1. Clear output
///   2. For each hit (dx, dy): dest[y] |= shift(src[y - dy], dx)
pub fn dilate(field: &BinaryField, sel: &Sel) -> MorphResult<BinaryField> {
    check_sel(sel)?;
    let (w, h) = field.dimensions();
    let mut out = BinaryFieldMut::new(w, h)?;

    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h as i64 {
            let sy = y - dy as i64;
            if sy < 0 || sy >= h as i64 {
                continue;
            }
            or_shifted_row(out.row_mut(y as u32), field.row(sy as u32), dx);
        }
    }

    Ok(out.into())
}

/// Erode a binary field (row shift-and-AND)
///
/// Erosion shrinks foreground regions. For each hit position in the SEL,
/// the source field is shifted by the inverted offset and AND-accumulated
/// into the output.
///
/// Algorithm:
///   1. Set all output pixels
///   2. For each hit (dx, dy): dest[y] &= shift(src[y + dy], -dx)
///   3. Outside boundaries: AND with background = clear
pub fn erode(field: &BinaryField, sel: &Sel) -> MorphResult<BinaryField> {
    check_sel(sel)?;
    let (w, h) = field.dimensions();
    let mut out = BinaryFieldMut::new(w, h)?;
    out.fill(true);

    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h as i64 {
            let sy = y + dy as i64;
            let dst = out.row_mut(y as u32);
            if sy < 0 || sy >= h as i64 {
                dst.fill(false);
                continue;
            }
            and_shifted_row(dst, field.row(sy as u32), -dx);
        }
    }

    Ok(out.into())
}

/// Dilate with the 3x3 full element (one pixel of growth in all 8 directions)
pub fn dilate_3x3(field: &BinaryField) -> MorphResult<BinaryField> {
    dilate(field, &Sel::with_margin(1)?)
}

/// Erode with the 3x3 full element
///
/// A pixel survives iff it and all 8 of its neighbors are set. Border
/// pixels never survive.
pub fn erode_3x3(field: &BinaryField) -> MorphResult<BinaryField> {
    erode(field, &Sel::with_margin(1)?)
}

/// Open a binary field
///
/// Opening = Erosion followed by Dilation.
/// Removes small foreground objects and smooths contours.
pub fn open(field: &BinaryField, sel: &Sel) -> MorphResult<BinaryField> {
    let eroded = erode(field, sel)?;
    dilate(&eroded, sel)
}

/// Close a binary field
///
/// Closing = Dilation followed by Erosion.
/// Fills small holes and connects nearby objects. Because erosion treats
/// the frame edge as background, closing is not guaranteed to contain the
/// input near the border.
pub fn close(field: &BinaryField, sel: &Sel) -> MorphResult<BinaryField> {
    let dilated = dilate(field, sel)?;
    erode(&dilated, sel)
}

/// Boundary type for [`extract_boundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryType {
    /// Background pixels adjacent to foreground
    Outer,
    /// Foreground pixels adjacent to background
    Inner,
}

/// Extract boundary pixels of a binary field, using the 3x3 element.
///
/// - [`BoundaryType::Outer`]: dilation minus original
/// - [`BoundaryType::Inner`]: original minus erosion
pub fn extract_boundary(field: &BinaryField, boundary_type: BoundaryType) -> MorphResult<BinaryField> {
    let boundary = match boundary_type {
        BoundaryType::Outer => dilate_3x3(field)?.and_not(field)?,
        BoundaryType::Inner => field.and_not(&erode_3x3(field)?)?,
    };
    Ok(boundary)
}

fn check_sel(sel: &Sel) -> MorphResult<()> {
    if sel.hit_count() == 0 {
        return Err(MorphError::InvalidSel("element has no hits".to_string()));
    }
    Ok(())
}

/// dst[x] |= src[x - dx] for every x where the source index is in range.
fn or_shifted_row(dst: &mut [bool], src: &[bool], dx: i32) {
    let w = dst.len() as i64;
    for x in 0..w {
        let sx = x - dx as i64;
        if sx >= 0 && sx < w && src[sx as usize] {
            dst[x as usize] = true;
        }
    }
}

/// dst[x] &= src[x - dx]; a source index out of range reads as background.
fn and_shifted_row(dst: &mut [bool], src: &[bool], dx: i32) {
    let w = dst.len() as i64;
    for x in 0..w {
        let sx = x - dx as i64;
        if sx < 0 || sx >= w || !src[sx as usize] {
            dst[x as usize] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: u32, h: u32, x0: u32, y0: u32, size: u32) -> BinaryField {
        let mut pts = Vec::new();
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                pts.push((x, y));
            }
        }
        BinaryField::from_points(w, h, &pts).unwrap()
    }

    #[test]
    fn test_dilate_single_pixel() {
        let f = BinaryField::from_points(5, 5, &[(2, 2)]).unwrap();
        let d = dilate_3x3(&f).unwrap();
        assert_eq!(d, square(5, 5, 1, 1, 3));
        // Input untouched
        assert_eq!(f.count_foreground(), 1);
    }

    #[test]
    fn test_dilate_clipped_at_border() {
        let f = BinaryField::from_points(4, 4, &[(0, 0)]).unwrap();
        let d = dilate_3x3(&f).unwrap();
        assert_eq!(d.count_foreground(), 4);
        assert_eq!(d, square(4, 4, 0, 0, 2));
    }

    #[test]
    fn test_erode_square() {
        let f = square(6, 6, 1, 1, 4);
        let e = erode_3x3(&f).unwrap();
        assert_eq!(e, square(6, 6, 2, 2, 2));
    }

    #[test]
    fn test_erode_border_clears() {
        let mut full = BinaryFieldMut::new(4, 4).unwrap();
        full.fill(true);
        let e = erode_3x3(&full.into()).unwrap();
        // Only the 2x2 core has all neighbors inside the frame
        assert_eq!(e, square(4, 4, 1, 1, 2));
    }

    #[test]
    fn test_erode_thin_line_vanishes() {
        let pts: Vec<_> = (0..6).map(|x| (x + 1, 2)).collect();
        let f = BinaryField::from_points(8, 5, &pts).unwrap();
        assert_eq!(erode_3x3(&f).unwrap().count_foreground(), 0);
    }

    #[test]
    fn test_larger_margin() {
        let f = BinaryField::from_points(7, 7, &[(3, 3)]).unwrap();
        let d = dilate(&f, &Sel::with_margin(2).unwrap()).unwrap();
        assert_eq!(d, square(7, 7, 1, 1, 5));
        let e = erode(&d, &Sel::with_margin(2).unwrap()).unwrap();
        assert_eq!(e, f);
    }

    #[test]
    fn test_asymmetric_sel_direction() {
        // Hit at origin and one pixel to the right of it
        let sel = Sel::from_string("xx", 0, 0).unwrap();
        let f = BinaryField::from_points(4, 1, &[(1, 0)]).unwrap();
        let d = dilate(&f, &sel).unwrap();
        assert_eq!(d.data(), &[false, true, true, false]);
        let e = erode(&d, &sel).unwrap();
        assert_eq!(e, f);
    }

    #[test]
    fn test_open_removes_specks() {
        let mut pts = vec![(0u32, 7u32)];
        for y in 1..5 {
            for x in 1..5 {
                pts.push((x, y));
            }
        }
        let f = BinaryField::from_points(8, 8, &pts).unwrap();
        let o = open(&f, &Sel::with_margin(1).unwrap()).unwrap();
        assert_eq!(o, square(8, 8, 1, 1, 4));
    }

    #[test]
    fn test_close_fills_hole() {
        let mut pts = Vec::new();
        for y in 1..6 {
            for x in 1..6 {
                if (x, y) != (3, 3) {
                    pts.push((x, y));
                }
            }
        }
        let f = BinaryField::from_points(7, 7, &pts).unwrap();
        let c = close(&f, &Sel::with_margin(1).unwrap()).unwrap();
        assert_eq!(c, square(7, 7, 1, 1, 5));
    }

    #[test]
    fn test_extract_boundary() {
        let f = square(5, 5, 1, 1, 3);
        let inner = extract_boundary(&f, BoundaryType::Inner).unwrap();
        assert_eq!(inner.count_foreground(), 8);
        assert_eq!(inner.get(2, 2), Some(false));

        let outer = extract_boundary(&f, BoundaryType::Outer).unwrap();
        assert_eq!(outer.count_foreground(), 16);
        assert_eq!(outer.get(1, 1), Some(false));
    }

    #[test]
    fn test_empty_sel_rejected() {
        let f = BinaryField::new(3, 3).unwrap();
        let sel = Sel::new(3, 3).unwrap();
        assert!(dilate(&f, &sel).is_err());
        assert!(erode(&f, &sel).is_err());
    }
}
