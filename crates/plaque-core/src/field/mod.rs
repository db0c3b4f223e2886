//! Field, FieldMut - two-dimensional sample grids
//!
//! `Field<T>` is the immutable, cheaply clonable grid used everywhere in the
//! pipeline: binary category fields, gray intensity fields, RGB frames and
//! label grids are all fields of different sample types.
//!
//! A field is built through [`FieldMut`] and published by converting it into
//! a [`Field`]. Once published the samples are never written again; every
//! operation that "modifies" a field returns a new one. Clones share the same
//! buffer, so a frame's fields can be handed to several consumers (and
//! threads) without copying.

mod binary;

use crate::error::{Error, Result};
use crate::rect::Rect;
use std::sync::Arc;

/// Binary field: one boolean per pixel
pub type BinaryField = Field<bool>;
/// Mutable binary field
pub type BinaryFieldMut = FieldMut<bool>;
/// Gray intensity field
///
/// Samples are stored as `u16` so that data read from wider sources keeps
/// its original value; the histogram stage rejects anything above 255.
pub type GrayField = Field<u16>;
/// Mutable gray intensity field
pub type GrayFieldMut = FieldMut<u16>;
/// RGB frame as produced by the color classification stack
pub type RgbField = Field<[u8; 3]>;

#[derive(Debug, Clone, PartialEq)]
struct FieldData<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T> FieldData<T> {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Immutable two-dimensional grid of samples
///
/// Samples are stored row-major; `x` is the column and `y` the row.
#[derive(Debug, Clone)]
pub struct Field<T> {
    inner: Arc<FieldData<T>>,
}

impl<T: Copy + Default> Field<T> {
    /// Create a new field filled with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(FieldMut::new(width, height)?.into())
    }

    /// Create a field from a row-major sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 and
    /// [`Error::BufferLength`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() != width as usize * height as usize {
            return Err(Error::BufferLength {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Field {
            inner: Arc::new(FieldData {
                width,
                height,
                data,
            }),
        })
    }

    /// Create a default-filled field with the same size as this one.
    pub fn create_template(&self) -> Self {
        Field {
            inner: Arc::new(FieldData {
                width: self.width(),
                height: self.height(),
                data: vec![T::default(); self.inner.data.len()],
            }),
        }
    }

    /// Copy the samples inside `rect` into a new field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `rect` is empty or extends past
    /// the field.
    pub fn crop(&self, rect: Rect) -> Result<Self> {
        if rect.is_empty() || rect.right() > self.width() || rect.bottom() > self.height() {
            return Err(Error::InvalidParameter(format!(
                "crop rect {:?} outside {}x{} field",
                rect,
                self.width(),
                self.height()
            )));
        }

        let mut data = Vec::with_capacity(rect.area() as usize);
        for y in rect.y..rect.bottom() {
            let row = self.row(y);
            data.extend_from_slice(&row[rect.x as usize..rect.right() as usize]);
        }
        Self::from_vec(rect.w, rect.h, data)
    }

    /// Apply `f` to every sample, producing a field of another type.
    pub fn map<U, F>(&self, f: F) -> Field<U>
    where
        U: Copy + Default,
        F: Fn(T) -> U,
    {
        Field {
            inner: Arc::new(FieldData {
                width: self.width(),
                height: self.height(),
                data: self.inner.data.iter().map(|&v| f(v)).collect(),
            }),
        }
    }

    /// Get a mutable copy of this field.
    ///
    /// Always copies the samples.
    pub fn to_mut(&self) -> FieldMut<T> {
        FieldMut {
            inner: (*self.inner).clone(),
        }
    }
}

impl<T> Field<T> {
    /// Field width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Field height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Number of samples (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Always false: fields have at least one sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Raw row-major samples.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.inner.data
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let start = self.inner.offset(0, y);
        &self.inner.data[start..start + self.inner.width as usize]
    }

    /// Number of handles sharing this field's buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check whether two fields have the same width and height.
    pub fn sizes_equal<U>(&self, other: &Field<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Require `other` to have the same size as this field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_same_size<U>(&self, other: &Field<U>) -> Result<()> {
        if self.sizes_equal(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// Try to get mutable access to the samples.
    ///
    /// Succeeds only if there is exactly one handle to the buffer.
    pub fn try_into_mut(self) -> std::result::Result<FieldMut<T>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(FieldMut { inner }),
            Err(inner) => Err(Field { inner }),
        }
    }
}

impl<T: Copy> Field<T> {
    /// Get the sample at (x, y), or `None` outside the field.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x < self.width() && y < self.height() {
            Some(self.inner.data[self.inner.offset(x, y)])
        } else {
            None
        }
    }

    /// Get the sample at (x, y) without bounds checking against the width.
    ///
    /// # Panics
    ///
    /// Panics if the offset falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> T {
        self.inner.data[self.inner.offset(x, y)]
    }
}

impl<T: PartialEq> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || *self.inner == *other.inner
    }
}

/// Mutable field
///
/// Allows modification of samples. Convert back to an immutable [`Field`]
/// using `Into<Field>`.
#[derive(Debug)]
pub struct FieldMut<T> {
    inner: FieldData<T>,
}

impl<T: Copy + Default> FieldMut<T> {
    /// Create a new mutable field filled with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(FieldMut {
            inner: FieldData {
                width,
                height,
                data: vec![T::default(); width as usize * height as usize],
            },
        })
    }

    /// Field width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Field height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample at (x, y), or `None` outside the field.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x < self.width() && y < self.height() {
            Some(self.inner.data[self.inner.offset(x, y)])
        } else {
            None
        }
    }

    /// Set the sample at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_unchecked(x, y, value);
        Ok(())
    }

    /// Set the sample at (x, y) without bounds checking against the width.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: T) {
        let offset = self.inner.offset(x, y);
        self.inner.data[offset] = value;
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: T) {
        self.inner.data.fill(value);
    }

    /// Raw row-major samples.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.inner.data
    }

    /// Mutable raw row-major samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.inner.data
    }

    /// Mutable samples of row `y`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        let start = self.inner.offset(0, y);
        let width = self.inner.width as usize;
        &mut self.inner.data[start..start + width]
    }
}

impl<T> From<FieldMut<T>> for Field<T> {
    fn from(field: FieldMut<T>) -> Self {
        Field {
            inner: Arc::new(field.inner),
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(())
}
