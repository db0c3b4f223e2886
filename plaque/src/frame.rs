//! Per-frame analysis
//!
//! One frame goes through labeling, adjacency detection and interior
//! sampling on its own. Nothing here touches state shared with other
//! frames, so frames can run on any thread in any order.

use crate::config::AnalysisConfig;
use crate::error::{PipelineError, PipelineResult};
use plaque_core::{FrameInput, SeriesKey, TissueCategory};
use plaque_region::{
    ComponentSummary, ConnectivityType, Labeling, collect_interior_intensities, detect_adjacency,
    label_components, touching_mask,
};
use plaque_stats::IntensitySample;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Area measurements of one frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FrameAreas {
    /// Frame index within the stack
    pub frame: usize,
    /// Pixel count per category
    pub tissue: BTreeMap<TissueCategory, u64>,
    /// Original area of base regions touching the other category, per pair
    pub adjacency: BTreeMap<SeriesKey, u64>,
}

impl FrameAreas {
    /// Area of any series; 0 if the series was not measured.
    pub fn area(&self, key: SeriesKey) -> u64 {
        match key {
            SeriesKey::Tissue(c) => self.tissue.get(&c).copied().unwrap_or(0),
            adj => self.adjacency.get(&adj).copied().unwrap_or(0),
        }
    }

    /// Area of one category.
    pub fn tissue_area(&self, category: TissueCategory) -> u64 {
        self.area(SeriesKey::Tissue(category))
    }

    /// FB + FF + NC + DC
    pub fn plaque_area(&self) -> u64 {
        TissueCategory::ALL
            .into_iter()
            .filter(|c| c.is_plaque())
            .map(|c| self.tissue_area(c))
            .sum()
    }
}

/// Everything one frame contributes to the stack
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub areas: FrameAreas,
    /// Region statistics per category
    pub components: BTreeMap<TissueCategory, ComponentSummary>,
    /// Interior intensities per series
    pub samples: BTreeMap<SeriesKey, IntensitySample>,
}

impl FrameOutcome {
    /// Frame index within the stack
    pub fn frame(&self) -> usize {
        self.areas.frame
    }
}

/// Analyze one frame.
///
/// # Errors
///
/// Fails if the gray field and the category fields differ in size, or, with
/// `require_exclusive`, if a pixel belongs to two categories. An adjacency
/// area larger than its base category's area is reported as
/// [`PipelineError::AdjacencyArea`].
pub fn analyze_frame(input: &FrameInput, config: &AnalysisConfig) -> PipelineResult<FrameOutcome> {
    input.validate()?;
    if config.require_exclusive {
        input.masks.check_exclusive()?;
    }

    let interior = config.interior_options();
    let mut areas = FrameAreas {
        frame: input.index,
        ..FrameAreas::default()
    };
    let mut components = BTreeMap::new();
    let mut samples = BTreeMap::new();
    let mut labelings: Vec<Labeling> = Vec::with_capacity(TissueCategory::COUNT);

    for (category, mask) in input.masks.iter() {
        let labeling = label_components(mask, ConnectivityType::EightWay)?;
        let values = collect_interior_intensities(&labeling, &input.gray, &interior)?;

        areas.tissue.insert(category, labeling.total_area());
        components.insert(category, ComponentSummary::from_regions(&labeling.regions));
        samples.insert(
            SeriesKey::Tissue(category),
            IntensitySample::from_values(values),
        );
        labelings.push(labeling);
    }

    let adjacency = config.adjacency_options();
    for &(base, touching) in &config.adjacency_pairs {
        let key = SeriesKey::adjacency(base, touching);
        let base_labels = &labelings[base.index()];
        let result = detect_adjacency(base_labels, input.masks.get(touching), &adjacency)?;

        // Touching regions are whole regions of `base`, so relabeling their
        // mask reproduces them exactly.
        let mask = touching_mask(base_labels, &result);
        let touching_labels = label_components(&mask, ConnectivityType::EightWay)?;
        let values = collect_interior_intensities(&touching_labels, &input.gray, &interior)?;

        check_adjacency_area(key, result.area, base_labels.total_area())?;
        areas.adjacency.insert(key, result.area);
        samples.insert(key, IntensitySample::from_values(values));
    }

    debug!(
        frame = input.index,
        plaque_area = areas.plaque_area(),
        "frame analyzed"
    );

    Ok(FrameOutcome {
        areas,
        components,
        samples,
    })
}

/// An adjacency series counts whole base regions, so it never exceeds the
/// base category's area.
fn check_adjacency_area(series: SeriesKey, area: u64, base: u64) -> PipelineResult<()> {
    if area > base {
        return Err(PipelineError::AdjacencyArea { series, area, base });
    }
    Ok(())
}
