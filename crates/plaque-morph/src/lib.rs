//! plaque-morph - Binary morphology for tissue fields
//!
//! This crate provides the structuring-element operations the region
//! analysis is built on:
//!
//! - Structuring elements (SEL) for defining operation neighborhoods
//! - Binary morphology: erosion, dilation, opening, closing
//! - Boundary extraction
//!
//! All operations are pure: they read an immutable field and return a new one.

pub mod binary;
mod error;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};

pub use binary::{
    BoundaryType, close, dilate, dilate_3x3, erode, erode_3x3, extract_boundary, open,
};
