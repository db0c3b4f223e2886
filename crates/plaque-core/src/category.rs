//! Tissue categories and histogram series keys
//!
//! A classified frame assigns every pixel to exactly one of six tissue
//! categories. Measurements are reported per category, plus a small number of
//! derived "adjacency" series such as `NC@DC` (necrotic core in contact with
//! dense calcium).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six tissue classes of a classified frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TissueCategory {
    /// Fibrotic tissue
    #[serde(rename = "FB")]
    Fibrotic,
    /// Fibro-fatty tissue
    #[serde(rename = "FF")]
    FibroFatty,
    /// Necrotic core
    #[serde(rename = "NC")]
    NecroticCore,
    /// Dense calcium
    #[serde(rename = "DC")]
    DenseCalcium,
    /// Vessel lumen
    #[serde(rename = "LUMEN")]
    Lumen,
    /// Media layer
    #[serde(rename = "MEDIA")]
    Media,
}

impl TissueCategory {
    /// Number of tissue categories
    pub const COUNT: usize = 6;

    /// All categories in their canonical order
    pub const ALL: [TissueCategory; Self::COUNT] = [
        TissueCategory::Fibrotic,
        TissueCategory::FibroFatty,
        TissueCategory::NecroticCore,
        TissueCategory::DenseCalcium,
        TissueCategory::Lumen,
        TissueCategory::Media,
    ];

    /// Short name used in tables and reports
    pub fn name(self) -> &'static str {
        match self {
            TissueCategory::Fibrotic => "FB",
            TissueCategory::FibroFatty => "FF",
            TissueCategory::NecroticCore => "NC",
            TissueCategory::DenseCalcium => "DC",
            TissueCategory::Lumen => "LUMEN",
            TissueCategory::Media => "MEDIA",
        }
    }

    /// Position in [`TissueCategory::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the category counts toward plaque burden
    ///
    /// Lumen and media are vessel structure, not plaque.
    pub fn is_plaque(self) -> bool {
        !matches!(self, TissueCategory::Lumen | TissueCategory::Media)
    }
}

impl fmt::Display for TissueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TissueCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TissueCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Key of one intensity-histogram series
///
/// Either a base tissue category, or the adjacency-derived pseudo-category
/// "`base` regions touching `touching`" (written `base@touching`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SeriesKey {
    /// A base tissue category
    Tissue(TissueCategory),
    /// Regions of `base` whose dilation meets `touching`
    Adjacency {
        base: TissueCategory,
        touching: TissueCategory,
    },
}

impl SeriesKey {
    /// Adjacency series key for `base@touching`
    pub fn adjacency(base: TissueCategory, touching: TissueCategory) -> Self {
        SeriesKey::Adjacency { base, touching }
    }

    /// The category whose pixels the series is drawn from
    pub fn base(self) -> TissueCategory {
        match self {
            SeriesKey::Tissue(c) => c,
            SeriesKey::Adjacency { base, .. } => base,
        }
    }

    /// Whether this is an adjacency-derived series
    pub fn is_adjacency(self) -> bool {
        matches!(self, SeriesKey::Adjacency { .. })
    }
}

impl From<TissueCategory> for SeriesKey {
    fn from(category: TissueCategory) -> Self {
        SeriesKey::Tissue(category)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKey::Tissue(c) => write!(f, "{}", c),
            SeriesKey::Adjacency { base, touching } => write!(f, "{}@{}", base, touching),
        }
    }
}

impl FromStr for SeriesKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('@') {
            Some((base, touching)) => Ok(SeriesKey::Adjacency {
                base: base.parse()?,
                touching: touching.parse()?,
            }),
            None => Ok(SeriesKey::Tissue(s.parse()?)),
        }
    }
}

impl From<SeriesKey> for String {
    fn from(key: SeriesKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SeriesKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
