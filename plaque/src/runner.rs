//! Stack runner
//!
//! Frames are independent, so they are analyzed on the rayon pool (or one
//! after another when `parallel` is off). A frame that fails is logged and
//! recorded, and the run continues. Once every frame is done the totals
//! are closed, then the histograms are clustered.

use crate::accumulator::StackAccumulator;
use crate::config::AnalysisConfig;
use crate::error::{FrameFailure, PipelineResult};
use crate::frame::{FrameOutcome, analyze_frame};
use crate::report::AnalysisReport;
use plaque_color::{Palette, classify_frame};
use plaque_core::{FrameInput, GrayField, RgbField};
use plaque_io::ImageStacks;
use plaque_stats::cluster_histograms;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Runs the analysis over whole stacks
#[derive(Debug, Clone)]
pub struct StackRunner {
    config: AnalysisConfig,
}

impl StackRunner {
    /// Create a runner.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::Config`] if the configuration does
    /// not validate.
    pub fn new(config: AnalysisConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze already classified frames.
    #[instrument(skip_all, fields(frames = frames.len()))]
    pub fn run(&self, frames: &[FrameInput]) -> PipelineResult<AnalysisReport> {
        self.run_frames(frames.len(), |i| {
            let frame = &frames[i];
            (frame.index, analyze_frame(frame, &self.config))
        })
    }

    /// Classify color-coded frames with `palette`, then analyze them.
    ///
    /// Frame `i` of the report is page `i` of the stacks.
    #[instrument(skip_all, fields(frames = stacks.len()))]
    pub fn run_stacks(&self, stacks: &ImageStacks, palette: &Palette) -> PipelineResult<AnalysisReport> {
        self.run_frames(stacks.len(), |i| {
            let outcome = classify_input(i, &stacks.rgb[i], &stacks.gray[i], palette, &self.config)
                .and_then(|frame| analyze_frame(&frame, &self.config));
            (i, outcome)
        })
    }

    fn run_frames<F>(&self, count: usize, task: F) -> PipelineResult<AnalysisReport>
    where
        F: Fn(usize) -> (usize, PipelineResult<FrameOutcome>) + Sync,
    {
        info!(frames = count, parallel = self.config.parallel, "analyzing stack");

        let outcomes: Vec<_> = if self.config.parallel {
            (0..count).into_par_iter().map(|i| task(i)).collect()
        } else {
            (0..count).map(|i| task(i)).collect()
        };

        let mut acc = StackAccumulator::new(self.config.series());
        for (frame, outcome) in outcomes {
            match outcome {
                Ok(outcome) => acc.add_outcome(outcome),
                Err(e) => {
                    warn!(frame, error = %e, "skipping frame");
                    acc.add_failure(FrameFailure::new(frame, &e));
                }
            }
        }
        info!(
            analyzed = acc.frames_analyzed(),
            skipped = acc.frames_skipped(),
            "frames done"
        );

        let totals = acc.finish()?;
        let clusters = cluster_histograms(&totals.histograms)?;
        info!(
            clustered = clusters.input.included.len(),
            no_data = clusters.input.excluded.len(),
            "histograms clustered"
        );

        Ok(AnalysisReport::new(&self.config, count, totals, clusters))
    }
}

/// Build a frame's input from its color-coded and gray pages.
pub fn classify_input(
    index: usize,
    rgb: &RgbField,
    gray: &GrayField,
    palette: &Palette,
    config: &AnalysisConfig,
) -> PipelineResult<FrameInput> {
    let classification = classify_frame(rgb, palette, config.color_tolerance)?;
    if classification.unclassified > 0 {
        debug!(
            frame = index,
            pixels = classification.unclassified,
            "pixels matched no reference color"
        );
    }
    Ok(FrameInput::new(index, classification.masks, gray.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaque_core::{SeriesKey, TissueCategory};
    use plaque_test::{frame_from_ascii, gray_constant};

    fn frames() -> Vec<FrameInput> {
        let art = [
            "NNNN.
             NNNND
             NNNN.
             NNNN.",
            "BBBB.
             BBBB.
             BBBB.
             FFFF.",
        ];
        art.iter()
            .enumerate()
            .map(|(i, a)| frame_from_ascii(i, a, gray_constant(5, 4, 10 * (i as u16 + 1)).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let frames = frames();
        let par = StackRunner::new(AnalysisConfig::default()).unwrap();
        let seq = StackRunner::new(AnalysisConfig {
            parallel: false,
            ..AnalysisConfig::default()
        })
        .unwrap();

        let a = par.run(&frames).unwrap();
        let b = seq.run(&frames).unwrap();
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.histograms, b.histograms);
        assert_eq!(a.dendrogram, b.dendrogram);
    }

    #[test]
    fn test_skip_and_record() {
        let mut frames = frames();
        frames[1].gray = GrayField::new(3, 3).unwrap();
        let runner = StackRunner::new(AnalysisConfig::default()).unwrap();
        let report = runner.run(&frames).unwrap();

        assert_eq!(report.frames_total, 2);
        assert_eq!(report.frames.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].frame, 1);
        assert_eq!(
            report.total_area(SeriesKey::Tissue(TissueCategory::NecroticCore)),
            16
        );
    }

    #[test]
    fn test_out_of_range_aborts() {
        let mut frames = frames();
        frames[0].gray = gray_constant(5, 4, 300).unwrap();
        let runner = StackRunner::new(AnalysisConfig::default()).unwrap();
        assert!(matches!(
            runner.run(&frames),
            Err(crate::PipelineError::Aggregation(_))
        ));
    }

    #[test]
    fn test_classify_input() {
        let rgb = RgbField::from_vec(2, 1, vec![[255, 0, 0], [0, 128, 0]]).unwrap();
        let gray = GrayField::new(2, 1).unwrap();
        let frame = classify_input(4, &rgb, &gray, &Palette::default(), &AnalysisConfig::default()).unwrap();
        assert_eq!(frame.index, 4);
        assert_eq!(frame.masks.get(TissueCategory::Fibrotic).get(1, 0), Some(true));
    }
}
