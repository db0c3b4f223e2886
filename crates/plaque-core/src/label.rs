//! LabelMap and Region - the output of connected component labeling
//!
//! A [`LabelMap`] is a grid of `u32` where 0 is background and `1..=K`
//! identify the regions of a single labeling pass. Labels are dense and
//! frame-local: they carry no meaning outside the labeling that produced
//! them.

use crate::error::{Error, Result};
use crate::field::{BinaryField, Field, FieldMut};
use crate::rect::Rect;
use serde::Serialize;

/// A labeled connected component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Dense label in `1..=K`
    pub label: u32,
    /// Pixel count
    pub area: u64,
    /// Mean row of member pixels
    pub centroid_row: f64,
    /// Mean column of member pixels
    pub centroid_col: f64,
    /// Tight bounding box of member pixels
    pub bounds: Rect,
}

/// Grid of region labels, 0 = background
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    labels: Field<u32>,
    num_labels: u32,
}

impl LabelMap {
    /// Wrap a label grid whose largest label is `num_labels`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a label exceeds `num_labels`.
    pub fn new(labels: Field<u32>, num_labels: u32) -> Result<Self> {
        if let Some(&bad) = labels.data().iter().find(|&&l| l > num_labels) {
            return Err(Error::InvalidParameter(format!(
                "label {} exceeds label count {}",
                bad, num_labels
            )));
        }
        Ok(Self { labels, num_labels })
    }

    /// Number of regions (K).
    #[inline]
    pub fn num_labels(&self) -> u32 {
        self.num_labels
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.labels.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.labels.height()
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.labels.dimensions()
    }

    /// Label at (x, y); `None` outside the grid.
    #[inline]
    pub fn label_at(&self, x: u32, y: u32) -> Option<u32> {
        self.labels.get(x, y)
    }

    /// The underlying label grid.
    pub fn field(&self) -> &Field<u32> {
        &self.labels
    }

    /// Binary mask of every labeled pixel.
    pub fn foreground(&self) -> BinaryField {
        self.labels.map(|l| l != 0)
    }

    /// Full-size binary mask of one region.
    pub fn region_mask(&self, label: u32) -> BinaryField {
        self.labels.map(|l| l == label)
    }

    /// Binary mask of one region restricted to `rect`.
    ///
    /// The returned field has the size of `rect`; pixel (0, 0) corresponds
    /// to (`rect.x`, `rect.y`) in the label map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `rect` is empty or outside the map.
    pub fn region_mask_in(&self, label: u32, rect: Rect) -> Result<BinaryField> {
        if rect.is_empty() || rect.right() > self.width() || rect.bottom() > self.height() {
            return Err(Error::InvalidParameter(format!(
                "rect {:?} outside {}x{} label map",
                rect,
                self.width(),
                self.height()
            )));
        }
        let mut mask = FieldMut::new(rect.w, rect.h)?;
        for dy in 0..rect.h {
            let src = &self.labels.row(rect.y + dy)[rect.x as usize..rect.right() as usize];
            for (dst, &l) in mask.row_mut(dy).iter_mut().zip(src) {
                *dst = l == label;
            }
        }
        Ok(mask.into())
    }
}
