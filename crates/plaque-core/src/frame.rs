//! Per-frame inputs
//!
//! A frame of a stack is six co-registered category fields plus one gray
//! intensity field. Constructors check that every field has the frame's
//! size; category exclusivity is checked on request.

use crate::category::TissueCategory;
use crate::error::{Error, Result};
use crate::field::{BinaryField, GrayField};

/// The six category fields of one frame, indexed by [`TissueCategory`]
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMasks {
    masks: [BinaryField; TissueCategory::COUNT],
}

impl CategoryMasks {
    /// Create from fields in [`TissueCategory::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the fields differ in size.
    pub fn new(masks: [BinaryField; TissueCategory::COUNT]) -> Result<Self> {
        for m in &masks[1..] {
            masks[0].check_same_size(m)?;
        }
        Ok(Self { masks })
    }

    /// Create from a closure producing the field for each category.
    pub fn from_fn<F>(mut f: F) -> Result<Self>
    where
        F: FnMut(TissueCategory) -> Result<BinaryField>,
    {
        let mut masks = Vec::with_capacity(TissueCategory::COUNT);
        for c in TissueCategory::ALL {
            masks.push(f(c)?);
        }
        let masks: [BinaryField; TissueCategory::COUNT] = masks
            .try_into()
            .map_err(|_| Error::InvalidParameter("category field count".to_string()))?;
        Self::new(masks)
    }

    /// Field of one category.
    #[inline]
    pub fn get(&self, category: TissueCategory) -> &BinaryField {
        &self.masks[category.index()]
    }

    /// `(width, height)` shared by all six fields.
    pub fn dimensions(&self) -> (u32, u32) {
        self.masks[0].dimensions()
    }

    /// Iterate `(category, field)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TissueCategory, &BinaryField)> {
        TissueCategory::ALL.into_iter().zip(self.masks.iter())
    }

    /// Number of pixels claimed by more than one category.
    pub fn overlapping_pixels(&self) -> u64 {
        let len = self.masks[0].len();
        (0..len)
            .filter(|&i| self.masks.iter().filter(|m| m.data()[i]).count() > 1)
            .count() as u64
    }

    /// Require the categories to be mutually exclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any pixel belongs to two
    /// categories.
    pub fn check_exclusive(&self) -> Result<()> {
        match self.overlapping_pixels() {
            0 => Ok(()),
            n => Err(Error::InvalidParameter(format!(
                "{} pixels belong to more than one category",
                n
            ))),
        }
    }
}

/// Everything the engine needs to analyze one frame
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Position within the stack
    pub index: usize,
    /// Category fields
    pub masks: CategoryMasks,
    /// Co-registered gray intensities
    pub gray: GrayField,
}

impl FrameInput {
    /// Bundle a frame's fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the gray field differs in size
    /// from the category fields.
    pub fn new(index: usize, masks: CategoryMasks, gray: GrayField) -> Result<Self> {
        let frame = Self { index, masks, gray };
        frame.validate()?;
        Ok(frame)
    }

    /// Check that the gray field is co-registered with the masks.
    pub fn validate(&self) -> Result<()> {
        let expected = self.masks.dimensions();
        let actual = self.gray.dimensions();
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(())
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.masks.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masks_3x3() -> CategoryMasks {
        CategoryMasks::from_fn(|c| match c {
            TissueCategory::NecroticCore => BinaryField::from_points(3, 3, &[(1, 1)]),
            TissueCategory::Lumen => BinaryField::from_points(3, 3, &[(0, 0)]),
            _ => BinaryField::new(3, 3),
        })
        .unwrap()
    }

    #[test]
    fn test_masks_get() {
        let m = masks_3x3();
        assert_eq!(m.get(TissueCategory::NecroticCore).count_foreground(), 1);
        assert_eq!(m.get(TissueCategory::DenseCalcium).count_foreground(), 0);
        assert_eq!(m.iter().count(), 6);
        assert!(m.check_exclusive().is_ok());
    }

    #[test]
    fn test_masks_reject_mismatch() {
        let r = CategoryMasks::from_fn(|c| match c {
            TissueCategory::Media => BinaryField::new(4, 3),
            _ => BinaryField::new(3, 3),
        });
        assert!(matches!(r, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_overlap_detected() {
        let m = CategoryMasks::from_fn(|c| match c {
            TissueCategory::Fibrotic | TissueCategory::FibroFatty => {
                BinaryField::from_points(2, 2, &[(0, 1)])
            }
            _ => BinaryField::new(2, 2),
        })
        .unwrap();
        assert_eq!(m.overlapping_pixels(), 1);
        assert!(m.check_exclusive().is_err());
    }

    #[test]
    fn test_frame_gray_must_match() {
        let gray = GrayField::new(3, 4).unwrap();
        let err = FrameInput::new(0, masks_3x3(), gray).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: (3, 3),
                actual: (3, 4)
            }
        );
        assert!(FrameInput::new(1, masks_3x3(), GrayField::new(3, 3).unwrap()).is_ok());
    }
}
