//! Color space conversion

use plaque_core::{GrayField, RgbField};

/// Convert RGB to grayscale using ITU-R BT.601 coefficients
///
/// Formula: gray = 0.299*R + 0.587*G + 0.114*B, rounded to nearest
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    let gray = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32 + 0.5;
    gray.min(255.0) as u8
}

/// Convert an RGB field to a gray field.
pub fn convert_to_gray(rgb: &RgbField) -> GrayField {
    rgb.map(|[r, g, b]| rgb_to_gray(r, g, b) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_gray() {
        assert_eq!(rgb_to_gray(0, 0, 0), 0);
        assert_eq!(rgb_to_gray(255, 255, 255), 255);
        assert_eq!(rgb_to_gray(100, 100, 100), 100);
        assert_eq!(rgb_to_gray(255, 0, 0), 76);
        assert_eq!(rgb_to_gray(0, 255, 0), 150);
    }

    #[test]
    fn test_convert_field() {
        let rgb = RgbField::from_vec(2, 1, vec![[10, 10, 10], [0, 0, 255]]).unwrap();
        let gray = convert_to_gray(&rgb);
        assert_eq!(gray.data(), &[10, 29]);
    }
}
