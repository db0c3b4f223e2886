//! Plaque Core - Basic data structures for tissue-composition analysis
//!
//! This crate provides the data model shared by every stage of the
//! plaque analysis library:
//!
//! - [`Field`] / [`FieldMut`] - Two-dimensional sample grid (immutable / mutable)
//! - [`BinaryField`], [`GrayField`], [`RgbField`] - The field flavors used by the pipeline
//! - [`TissueCategory`] / [`SeriesKey`] - Tissue classes and histogram series
//! - [`LabelMap`] / [`Region`] - Connected component labeling results
//! - [`CategoryMasks`] / [`FrameInput`] - The per-frame input bundle
//! - [`Rect`] - Pixel rectangles

pub mod category;
pub mod error;
pub mod field;
pub mod frame;
pub mod label;
pub mod rect;

pub use category::{SeriesKey, TissueCategory};
pub use error::{Error, Result};
pub use field::{
    BinaryField, BinaryFieldMut, Field, FieldMut, GrayField, GrayFieldMut, RgbField,
};
pub use frame::{CategoryMasks, FrameInput};
pub use label::{LabelMap, Region};
pub use rect::Rect;
