//! plaque-color - Color-coded frame handling
//!
//! - Nearest-color classification of a color-coded frame into six
//!   mutually exclusive tissue category fields
//! - RGB to gray conversion for intensity frames stored as color

pub mod classify;
pub mod colorspace;
mod error;

pub use classify::{
    Classification, Palette, ReferenceColor, classify_frame, color_distance,
};
pub use colorspace::{convert_to_gray, rgb_to_gray};
pub use error::{ColorError, ColorResult};
