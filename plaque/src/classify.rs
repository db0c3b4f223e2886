//! Plaque type rules
//!
//! Each frame gets a plaque type from its area fractions. Fractions are
//! taken over the plaque area FB + FF + NC + DC; lumen and media are not
//! plaque. The rules are tried in order:
//!
//! | Condition                                   | Type     |
//! |---------------------------------------------|----------|
//! | plaque area is 0                            | Unknown  |
//! | NC >= 10%, NC@DC more than half of NC       | VH-TCFA  |
//! | NC >= 10%                                   | ThCFA    |
//! | FB > 50%, DC > 10%                          | FibCa    |
//! | FB > 50%                                    | FIB      |
//! | FF > 30%, or NC < 5% with FB < 50%          | PIT      |
//! | DC > 10%                                    | FibCa    |
//! | otherwise                                   | FIB      |

use crate::frame::FrameAreas;
use plaque_core::{SeriesKey, TissueCategory};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Virtual-histology plaque type of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PlaqueType {
    /// Thin-cap fibroatheroma: confluent necrotic core
    #[serde(rename = "VH-TCFA")]
    VhTcfa,
    /// Thick-cap fibroatheroma: necrotic core under a fibrous cap
    #[serde(rename = "ThCFA")]
    ThCfa,
    /// Fibrocalcific plaque
    #[serde(rename = "FibCa")]
    FibCa,
    /// Fibrotic plaque
    #[serde(rename = "FIB")]
    Fib,
    /// Pathological intimal thickening
    #[serde(rename = "PIT")]
    Pit,
    /// No plaque tissue in the frame
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Rupture risk grouping of plaque types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
    Unknown,
}

impl PlaqueType {
    pub fn name(self) -> &'static str {
        match self {
            PlaqueType::VhTcfa => "VH-TCFA",
            PlaqueType::ThCfa => "ThCFA",
            PlaqueType::FibCa => "FibCa",
            PlaqueType::Fib => "FIB",
            PlaqueType::Pit => "PIT",
            PlaqueType::Unknown => "UNKNOWN",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PlaqueType::VhTcfa => "Thin-cap fibroatheroma, confluent necrotic core",
            PlaqueType::ThCfa => "Thick-cap fibroatheroma, necrotic core under a fibrous cap",
            PlaqueType::FibCa => "Fibrocalcific plaque",
            PlaqueType::Fib => "Fibrotic plaque",
            PlaqueType::Pit => "Pathological intimal thickening",
            PlaqueType::Unknown => "No plaque tissue",
        }
    }

    pub fn risk(self) -> RiskLevel {
        match self {
            PlaqueType::VhTcfa => RiskLevel::High,
            PlaqueType::ThCfa => RiskLevel::Moderate,
            PlaqueType::FibCa | PlaqueType::Fib | PlaqueType::Pit => RiskLevel::Low,
            PlaqueType::Unknown => RiskLevel::Unknown,
        }
    }
}

impl fmt::Display for PlaqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify one frame from its areas.
///
/// The confluence test reads the `NC@DC` adjacency area; a run that does
/// not measure that pair never yields [`PlaqueType::VhTcfa`].
pub fn classify_plaque(areas: &FrameAreas) -> PlaqueType {
    use TissueCategory::*;

    let plaque = areas.plaque_area();
    if plaque == 0 {
        return PlaqueType::Unknown;
    }
    let percent = |c: TissueCategory| areas.tissue_area(c) as f64 * 100.0 / plaque as f64;
    let (nc, fb, dc, ff) = (
        percent(NecroticCore),
        percent(Fibrotic),
        percent(DenseCalcium),
        percent(FibroFatty),
    );

    if nc >= 10.0 {
        let nc_area = areas.tissue_area(NecroticCore);
        let confluent = areas.area(SeriesKey::adjacency(NecroticCore, DenseCalcium));
        return if confluent as f64 / nc_area as f64 > 0.5 {
            PlaqueType::VhTcfa
        } else {
            PlaqueType::ThCfa
        };
    }
    if fb > 50.0 {
        return if dc > 10.0 {
            PlaqueType::FibCa
        } else {
            PlaqueType::Fib
        };
    }
    if ff > 30.0 || (nc < 5.0 && fb < 50.0) {
        return PlaqueType::Pit;
    }
    if dc > 10.0 {
        return PlaqueType::FibCa;
    }
    PlaqueType::Fib
}

/// Frame counts per plaque type and risk level
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassificationSummary {
    pub frames: usize,
    pub by_type: BTreeMap<PlaqueType, usize>,
    pub by_risk: BTreeMap<RiskLevel, usize>,
}

impl ClassificationSummary {
    pub fn from_types<I: IntoIterator<Item = PlaqueType>>(types: I) -> Self {
        let mut summary = Self::default();
        for t in types {
            summary.frames += 1;
            *summary.by_type.entry(t).or_default() += 1;
            *summary.by_risk.entry(t.risk()).or_default() += 1;
        }
        summary
    }

    pub fn count(&self, plaque_type: PlaqueType) -> usize {
        self.by_type.get(&plaque_type).copied().unwrap_or(0)
    }

    /// Share of frames with this type, in percent.
    pub fn percent(&self, plaque_type: PlaqueType) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.count(plaque_type) as f64 * 100.0 / self.frames as f64
    }
}
