//! plaque-io - Stack and report I/O
//!
//! # Supported data
//!
//! | Data                    | Read | Write |
//! |-------------------------|------|-------|
//! | RGB classification stack (TIFF) | Yes | Yes |
//! | Gray intensity stack (TIFF)     | Yes | Yes |
//! | Per-category mask stack (TIFF)  | -   | Yes |
//! | Analysis report (JSON)          | -   | Yes |

mod error;
pub mod report;
pub mod tiff;

pub use error::{IoError, IoResult};
pub use report::{write_json, write_report_json};
pub use tiff::{
    ImageStacks, read_gray_stack, read_rgb_stack, read_stacks, tiff_page_count, write_gray_stack,
    write_mask_stack, write_rgb_stack,
};
