//! plaque-test - Regression test framework for the plaque library
//!
//! Provides [`RegParams`], which records a sequence of numbered comparisons
//! and reports every failure at the end of a test, plus builders for the
//! small synthetic frames the regression tests run on.
//!
//! # Usage
//!
//! ```ignore
//! use plaque_test::{RegParams, field_from_ascii};
//!
//! let mut rp = RegParams::new("conncomp");
//! let field = field_from_ascii("##.\n.#.")?;
//! rp.compare_values(3.0, field.count_foreground() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to dump fields to stderr

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use plaque_core::{
    BinaryField, BinaryFieldMut, CategoryMasks, FrameInput, GrayField, GrayFieldMut, Rect,
    TissueCategory,
};

/// Parse a binary field from rows of `#`/`x`/`1` (set) and `.`/`0` (clear).
///
/// Leading and trailing whitespace on each row is ignored, as are blank rows.
pub fn field_from_ascii(art: &str) -> TestResult<BinaryField> {
    let rows = ascii_rows(art)?;
    let (w, h) = (rows[0].len() as u32, rows.len() as u32);
    let mut field = BinaryFieldMut::new(w, h)?;
    for (y, row) in rows.iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            let v = match ch {
                '#' | 'x' | '1' => true,
                '.' | '0' => false,
                other => {
                    return Err(TestError::Parse {
                        row: y,
                        message: format!("unexpected character '{}'", other),
                    });
                }
            };
            field.set(x as u32, y as u32, v)?;
        }
    }
    Ok(field.into())
}

/// Parse six category fields from a map of category letters.
///
/// `B` = FB, `F` = FF, `N` = NC, `D` = DC, `L` = LUMEN, `M` = MEDIA and
/// `.` = no category.
pub fn masks_from_ascii(art: &str) -> TestResult<CategoryMasks> {
    let rows = ascii_rows(art)?;
    let (w, h) = (rows[0].len() as u32, rows.len() as u32);
    let mut fields: Vec<BinaryFieldMut> = (0..TissueCategory::COUNT)
        .map(|_| BinaryFieldMut::new(w, h))
        .collect::<Result<_, _>>()?;

    for (y, row) in rows.iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            let category = match ch {
                'B' => TissueCategory::Fibrotic,
                'F' => TissueCategory::FibroFatty,
                'N' => TissueCategory::NecroticCore,
                'D' => TissueCategory::DenseCalcium,
                'L' => TissueCategory::Lumen,
                'M' => TissueCategory::Media,
                '.' => continue,
                other => {
                    return Err(TestError::Parse {
                        row: y,
                        message: format!("unexpected category letter '{}'", other),
                    });
                }
            };
            fields[category.index()].set(x as u32, y as u32, true)?;
        }
    }

    let mut fields = fields.into_iter();
    Ok(CategoryMasks::from_fn(|_| match fields.next() {
        Some(f) => Ok(f.into()),
        None => BinaryField::new(w, h),
    })?)
}

/// Build a frame from a category map and a gray field.
pub fn frame_from_ascii(index: usize, art: &str, gray: GrayField) -> TestResult<FrameInput> {
    Ok(FrameInput::new(index, masks_from_ascii(art)?, gray)?)
}

/// Binary field with the given `(x, y)` pixels set.
pub fn field_from_points(width: u32, height: u32, points: &[(u32, u32)]) -> TestResult<BinaryField> {
    Ok(BinaryField::from_points(width, height, points)?)
}

/// Binary field with every pixel of `rect` set.
pub fn filled_rect(width: u32, height: u32, rect: Rect) -> TestResult<BinaryField> {
    let mut field = BinaryFieldMut::new(width, height)?;
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            field.set(x, y, true)?;
        }
    }
    Ok(field.into())
}

/// Gray field whose value at (x, y) is `(x + y * width) % 256`.
pub fn gray_ramp(width: u32, height: u32) -> TestResult<GrayField> {
    let data = (0..width * height).map(|i| (i % 256) as u16).collect();
    Ok(GrayField::from_vec(width, height, data)?)
}

/// Gray field holding one value everywhere.
pub fn gray_constant(width: u32, height: u32, value: u16) -> TestResult<GrayField> {
    let mut field = GrayFieldMut::new(width, height)?;
    field.fill(value);
    Ok(field.into())
}

/// Deterministic pseudo-random binary field (xorshift), roughly `density`
/// percent foreground.
pub fn field_pattern(width: u32, height: u32, seed: u32, density: u32) -> TestResult<BinaryField> {
    let mut state = seed.max(1);
    let data = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state % 100 < density
        })
        .collect();
    Ok(BinaryField::from_vec(width, height, data)?)
}

fn ascii_rows(art: &str) -> TestResult<Vec<Vec<char>>> {
    let rows: Vec<Vec<char>> = art
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.chars().collect())
        .collect();
    let Some(first) = rows.first() else {
        return Err(TestError::Parse {
            row: 0,
            message: "empty fixture".to_string(),
        });
    };
    let width = first.len();
    if let Some(y) = rows.iter().position(|r| r.len() != width) {
        return Err(TestError::Parse {
            row: y,
            message: format!("expected {} columns, got {}", width, rows[y].len()),
        });
    }
    Ok(rows)
}
