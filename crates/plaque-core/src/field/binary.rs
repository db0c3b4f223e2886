//! Binary and gray field operations
//!
//! Pixel-wise logic between co-registered binary fields, plus sampling of a
//! gray field through a binary mask.

use super::{BinaryField, Field, FieldMut};
use crate::error::Result;

impl Field<bool> {
    /// Build a binary field with the given `(x, y)` pixels set.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or a point outside the field.
    pub fn from_points(width: u32, height: u32, points: &[(u32, u32)]) -> Result<Self> {
        let mut field = FieldMut::new(width, height)?;
        for &(x, y) in points {
            field.set(x, y, true)?;
        }
        Ok(field.into())
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> u64 {
        self.data().iter().filter(|&&v| v).count() as u64
    }

    /// Whether any pixel is foreground.
    pub fn has_foreground(&self) -> bool {
        self.data().iter().any(|&v| v)
    }

    /// Iterate over `(x, y)` of foreground pixels in raster order.
    pub fn foreground_points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width() as usize;
        self.data()
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| ((i % w) as u32, (i / w) as u32))
    }

    /// Whether the two fields share at least one foreground pixel.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if sizes differ.
    pub fn intersects(&self, other: &BinaryField) -> Result<bool> {
        self.check_same_size(other)?;
        Ok(self
            .data()
            .iter()
            .zip(other.data())
            .any(|(&a, &b)| a && b))
    }

    /// Pixel-wise AND.
    pub fn and(&self, other: &BinaryField) -> Result<BinaryField> {
        self.combine(other, |a, b| a && b)
    }

    /// Pixel-wise OR.
    pub fn or(&self, other: &BinaryField) -> Result<BinaryField> {
        self.combine(other, |a, b| a || b)
    }

    /// Pixels set in `self` but not in `other`.
    pub fn and_not(&self, other: &BinaryField) -> Result<BinaryField> {
        self.combine(other, |a, b| a && !b)
    }

    /// Pixel-wise complement.
    pub fn invert(&self) -> BinaryField {
        self.map(|v| !v)
    }

    /// Whether every foreground pixel of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &BinaryField) -> Result<bool> {
        self.check_same_size(other)?;
        Ok(self
            .data()
            .iter()
            .zip(other.data())
            .all(|(&a, &b)| !a || b))
    }

    fn combine<F>(&self, other: &BinaryField, op: F) -> Result<BinaryField>
    where
        F: Fn(bool, bool) -> bool,
    {
        self.check_same_size(other)?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| op(a, b))
            .collect();
        Field::from_vec(self.width(), self.height(), data)
    }
}

impl Field<u16> {
    /// Largest sample value.
    pub fn max_value(&self) -> u16 {
        self.data().iter().copied().max().unwrap_or(0)
    }

    /// Collect the gray values under the foreground of `mask`, in raster order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if sizes differ.
    pub fn values_under(&self, mask: &BinaryField) -> Result<Vec<u16>> {
        self.check_same_size(mask)?;
        Ok(self
            .data()
            .iter()
            .zip(mask.data())
            .filter(|(_, m)| **m)
            .map(|(&v, _)| v)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GrayField;

    #[test]
    fn test_from_points_and_count() {
        let f = BinaryField::from_points(4, 4, &[(0, 0), (3, 3), (1, 2)]).unwrap();
        assert_eq!(f.count_foreground(), 3);
        assert!(f.has_foreground());
        let pts: Vec<_> = f.foreground_points().collect();
        assert_eq!(pts, vec![(0, 0), (1, 2), (3, 3)]);
        assert!(BinaryField::from_points(4, 4, &[(4, 0)]).is_err());
    }

    #[test]
    fn test_logic_ops() {
        let a = BinaryField::from_points(3, 1, &[(0, 0), (1, 0)]).unwrap();
        let b = BinaryField::from_points(3, 1, &[(1, 0), (2, 0)]).unwrap();
        assert_eq!(a.and(&b).unwrap().data(), &[false, true, false]);
        assert_eq!(a.or(&b).unwrap().data(), &[true, true, true]);
        assert_eq!(a.and_not(&b).unwrap().data(), &[true, false, false]);
        assert_eq!(a.invert().data(), &[false, false, true]);
        assert!(a.intersects(&b).unwrap());
        assert!(a.and(&b).unwrap().is_subset_of(&a).unwrap());
        assert!(!a.is_subset_of(&b).unwrap());
    }

    #[test]
    fn test_logic_ops_reject_mismatch() {
        let a = BinaryField::new(3, 2).unwrap();
        let b = BinaryField::new(2, 3).unwrap();
        assert!(a.or(&b).is_err());
        assert!(a.intersects(&b).is_err());
    }

    #[test]
    fn test_values_under() {
        let g = GrayField::from_vec(3, 2, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let m = BinaryField::from_points(3, 2, &[(2, 0), (0, 1)]).unwrap();
        assert_eq!(g.values_under(&m).unwrap(), vec![30, 40]);
        assert_eq!(g.max_value(), 60);
    }
}
