//! Nearest-color tissue classification
//!
//! Each pixel of a color-coded frame is assigned to the category whose
//! reference color is nearest in RGB (Euclidean distance). Without a
//! tolerance every pixel gets a category. With one, pixels farther than
//! the tolerance from every reference color belong to no category. Ties go
//! to the earlier palette entry, so the six output fields are always
//! mutually exclusive.

use crate::error::{ColorError, ColorResult};
use plaque_core::{BinaryFieldMut, CategoryMasks, RgbField, TissueCategory};
use serde::{Deserialize, Serialize};

/// Reference color of one tissue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceColor {
    pub category: TissueCategory,
    pub rgb: [u8; 3],
}

/// Ordered set of reference colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ReferenceColor>", into = "Vec<ReferenceColor>")]
pub struct Palette {
    colors: Vec<ReferenceColor>,
}

impl Palette {
    /// Create a palette from reference colors.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] if the palette is empty or
    /// names a category twice.
    pub fn new(colors: Vec<ReferenceColor>) -> ColorResult<Self> {
        if colors.is_empty() {
            return Err(ColorError::InvalidParameters("empty palette".to_string()));
        }
        for (i, c) in colors.iter().enumerate() {
            if colors[..i].iter().any(|p| p.category == c.category) {
                return Err(ColorError::InvalidParameters(format!(
                    "category {} listed twice",
                    c.category
                )));
            }
        }
        Ok(Self { colors })
    }

    /// Reference colors in palette order.
    pub fn colors(&self) -> &[ReferenceColor] {
        &self.colors
    }

    /// Reference color of a category, if listed.
    pub fn color_of(&self, category: TissueCategory) -> Option<[u8; 3]> {
        self.colors
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.rgb)
    }

    /// Nearest reference color and its distance.
    pub fn nearest(&self, rgb: [u8; 3]) -> Option<(TissueCategory, f64)> {
        let mut best: Option<(TissueCategory, f64)> = None;
        for c in &self.colors {
            let d = color_distance(rgb, c.rgb);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((c.category, d));
            }
        }
        best
    }

    /// Category of one pixel, or `None` if nothing is within `tolerance`.
    pub fn classify(&self, rgb: [u8; 3], tolerance: Option<f64>) -> Option<TissueCategory> {
        let (category, d) = self.nearest(rgb)?;
        tolerance.is_none_or(|t| d <= t).then_some(category)
    }
}

impl TryFrom<Vec<ReferenceColor>> for Palette {
    type Error = ColorError;

    fn try_from(colors: Vec<ReferenceColor>) -> ColorResult<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<ReferenceColor> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Default for Palette {
    /// The color coding of virtual-histology frames.
    fn default() -> Self {
        use TissueCategory::*;
        let colors = [
            (Fibrotic, [0, 128, 0]),
            (FibroFatty, [128, 255, 0]),
            (NecroticCore, [255, 0, 0]),
            (DenseCalcium, [255, 255, 255]),
            (Lumen, [0, 0, 0]),
            (Media, [128, 128, 128]),
        ];
        Self {
            colors: colors
                .into_iter()
                .map(|(category, rgb)| ReferenceColor { category, rgb })
                .collect(),
        }
    }
}

/// Euclidean distance between two RGB colors
#[inline]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    a.iter()
        .zip(&b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Result of classifying one frame
#[derive(Debug, Clone)]
pub struct Classification {
    /// One field per category, mutually exclusive
    pub masks: CategoryMasks,
    /// Pixels outside the tolerance of every reference color
    pub unclassified: u64,
}

/// Split a color-coded frame into six category fields.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for a negative or NaN tolerance.
pub fn classify_frame(
    rgb: &RgbField,
    palette: &Palette,
    tolerance: Option<f64>,
) -> ColorResult<Classification> {
    if let Some(tolerance) = tolerance.filter(|t| t.is_nan() || *t < 0.0) {
        return Err(ColorError::InvalidParameters(format!(
            "tolerance must be non-negative, got {}",
            tolerance
        )));
    }

    let (w, h) = rgb.dimensions();
    let mut fields: Vec<BinaryFieldMut> = (0..TissueCategory::COUNT)
        .map(|_| BinaryFieldMut::new(w, h))
        .collect::<Result<_, _>>()?;
    let mut unclassified = 0u64;

    for (i, &px) in rgb.data().iter().enumerate() {
        match palette.classify(px, tolerance) {
            Some(c) => fields[c.index()].data_mut()[i] = true,
            None => unclassified += 1,
        }
    }

    let mut fields = fields.into_iter();
    let masks = CategoryMasks::from_fn(|_| match fields.next() {
        Some(f) => Ok(f.into()),
        None => Err(plaque_core::Error::InvalidParameter(
            "missing category field".to_string(),
        )),
    })?;

    Ok(Classification {
        masks,
        unclassified,
    })
}
