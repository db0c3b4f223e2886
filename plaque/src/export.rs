//! Mask export
//!
//! Writes one multi-page TIFF per category, one page per frame, so the
//! classification can be inspected in any stack viewer.

use crate::error::PipelineResult;
use plaque_core::{BinaryField, FrameInput, TissueCategory};
use plaque_io::{IoError, write_mask_stack};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// File name of a category's mask stack
pub fn mask_file_name(category: TissueCategory) -> String {
    format!("{}_mask.tif", category.name().to_lowercase())
}

/// Write `<dir>/<category>_mask.tif` for every category.
///
/// Returns the written paths in category order; nothing is written for an
/// empty stack.
pub fn export_category_masks<P: AsRef<Path>>(frames: &[FrameInput], dir: P) -> PipelineResult<Vec<PathBuf>> {
    if frames.is_empty() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::with_capacity(TissueCategory::COUNT);
    for category in TissueCategory::ALL {
        let pages: Vec<&BinaryField> = frames.iter().map(|f| f.masks.get(category)).collect();
        let path = dir.as_ref().join(mask_file_name(category));
        let file = File::create(&path).map_err(IoError::from)?;
        write_mask_stack(&pages, BufWriter::new(file))?;
        paths.push(path);
    }
    Ok(paths)
}
