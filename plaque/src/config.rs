//! Analysis configuration
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it changes:
//!
//! ```json
//! { "adjacency_margin": 2, "parallel": false }
//! ```

use crate::error::{PipelineError, PipelineResult};
use plaque_core::{SeriesKey, TissueCategory};
use plaque_region::{AdjacencyOptions, InteriorOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest accepted dilation or erosion margin, in pixels
pub const MAX_MARGIN: u32 = 64;

/// Parameters of a stack analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Regions smaller than this contribute no interior samples
    pub min_region_size: u32,
    /// Dilation reach of the adjacency test, in pixels
    pub adjacency_margin: u32,
    /// Erosion reach of interior sampling, in pixels
    pub interior_margin: u32,
    /// `(base, touching)` pairs measured as adjacency series
    pub adjacency_pairs: Vec<(TissueCategory, TissueCategory)>,
    /// Analyze frames on the rayon thread pool
    pub parallel: bool,
    /// Reject frames where a pixel belongs to two categories
    pub require_exclusive: bool,
    /// Largest RGB distance to a reference color that still classifies.
    /// `None` assigns every pixel to its nearest reference color.
    pub color_tolerance: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_region_size: 5,
            adjacency_margin: 1,
            interior_margin: 1,
            adjacency_pairs: vec![(TissueCategory::NecroticCore, TissueCategory::DenseCalcium)],
            parallel: true,
            require_exclusive: true,
            color_tolerance: None,
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for a margin outside
    /// `1..=MAX_MARGIN`, a pair whose two categories are the same, a
    /// repeated pair, or a negative tolerance.
    pub fn validate(&self) -> PipelineResult<()> {
        check_margin("adjacency_margin", self.adjacency_margin)?;
        check_margin("interior_margin", self.interior_margin)?;
        for (i, &(base, touching)) in self.adjacency_pairs.iter().enumerate() {
            if base == touching {
                return Err(PipelineError::Config(format!(
                    "adjacency pair {}@{} names one category twice",
                    base, touching
                )));
            }
            if self.adjacency_pairs[..i].contains(&(base, touching)) {
                return Err(PipelineError::Config(format!(
                    "adjacency pair {}@{} listed twice",
                    base, touching
                )));
            }
        }
        if let Some(tolerance) = self.color_tolerance.filter(|t| t.is_nan() || *t < 0.0) {
            return Err(PipelineError::Config(format!(
                "color_tolerance must be non-negative, got {}",
                tolerance
            )));
        }
        Ok(())
    }

    /// Histogram series of a run: the six categories, then the adjacency pairs.
    pub fn series(&self) -> Vec<SeriesKey> {
        TissueCategory::ALL
            .into_iter()
            .map(SeriesKey::Tissue)
            .chain(
                self.adjacency_pairs
                    .iter()
                    .map(|&(base, touching)| SeriesKey::adjacency(base, touching)),
            )
            .collect()
    }

    pub fn adjacency_options(&self) -> AdjacencyOptions {
        AdjacencyOptions {
            margin: self.adjacency_margin,
        }
    }

    pub fn interior_options(&self) -> InteriorOptions {
        InteriorOptions {
            min_region_size: self.min_region_size as u64,
            margin: self.interior_margin,
        }
    }
}

fn check_margin(name: &str, margin: u32) -> PipelineResult<()> {
    if !(1..=MAX_MARGIN).contains(&margin) {
        return Err(PipelineError::Config(format!(
            "{} must be in 1..={}, got {}",
            name, MAX_MARGIN, margin
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interior_options(), InteriorOptions::default());
        assert_eq!(config.adjacency_options(), AdjacencyOptions::default());
        let series = config.series();
        assert_eq!(series.len(), 7);
        assert_eq!(series[6].to_string(), "NC@DC");
    }

    #[test]
    fn test_partial_json() {
        let config = AnalysisConfig::from_json(r#"{ "adjacency_margin": 2 }"#).unwrap();
        assert_eq!(config.adjacency_margin, 2);
        assert_eq!(config.min_region_size, 5);
        assert!(config.parallel);
        assert_eq!(config.color_tolerance, None);

        let config = AnalysisConfig::from_json(r#"{ "color_tolerance": 30.0 }"#).unwrap();
        assert_eq!(config.color_tolerance, Some(30.0));

        let config = AnalysisConfig::from_json(r#"{ "adjacency_pairs": [["FF", "MEDIA"]] }"#).unwrap();
        assert_eq!(
            config.adjacency_pairs,
            vec![(TissueCategory::FibroFatty, TissueCategory::Media)]
        );
    }

    #[test]
    fn test_rejects() {
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "interior_margin": 0 }"#),
            Err(PipelineError::Config(_))
        ));
        assert!(AnalysisConfig::from_json(r#"{ "adjacency_pairs": [["NC", "NC"]] }"#).is_err());
        assert!(
            AnalysisConfig::from_json(r#"{ "adjacency_pairs": [["NC", "DC"], ["NC", "DC"]] }"#)
                .is_err()
        );
        assert!(AnalysisConfig::from_json(r#"{ "color_tolerance": -1.0 }"#).is_err());
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "adjacency_margin": 40000 }"#),
            Err(PipelineError::Config(_))
        ));
        assert!(AnalysisConfig::from_json(r#"{ "interior_margin": 65 }"#).is_err());
        assert!(AnalysisConfig::from_json(r#"{ "interior_margin": 64 }"#).is_ok());
        assert!(matches!(
            AnalysisConfig::from_json("{ not json"),
            Err(PipelineError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "min_region_size": 9 }}"#).unwrap();
        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.min_region_size, 9);

        assert!(matches!(
            AnalysisConfig::load("/nonexistent/plaque.json"),
            Err(PipelineError::ConfigRead { .. })
        ));
    }
}
