//! Binary morphology regression test
//!
//! Tests dilation, erosion, opening, and closing on synthetic fields,
//! including the monotonicity properties the region analysis relies on.
//!
//! Run with:
//! ```
//! cargo test -p plaque-morph --test binmorph_reg
//! ```

use plaque_core::Rect;
use plaque_morph::{Sel, close, dilate, dilate_3x3, erode, erode_3x3, open};
use plaque_test::{RegParams, field_from_ascii, field_pattern, filled_rect};

#[test]
fn binmorph_reg() {
    let mut rp = RegParams::new("binmorph");

    for seed in [3u32, 11, 29, 101] {
        let pixs = field_pattern(40, 30, seed, 45).expect("pattern");
        let orig_count = pixs.count_foreground();
        rp.show_field("pattern", &pixs);

        // Dilation never shrinks, and contains the original
        let dilated = dilate_3x3(&pixs).expect("Dilation failed");
        let dilated_count = dilated.count_foreground();
        eprintln!("  seed {}: {} -> dilated {}", seed, orig_count, dilated_count);
        rp.compare_values(1.0, if dilated_count >= orig_count { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, bool_value(pixs.is_subset_of(&dilated).unwrap()), 0.0);

        // Erosion never grows, and is contained in the original
        let eroded = erode_3x3(&pixs).expect("Erosion failed");
        let eroded_count = eroded.count_foreground();
        rp.compare_values(1.0, if eroded_count <= orig_count { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, bool_value(eroded.is_subset_of(&pixs).unwrap()), 0.0);

        // Opening is anti-extensive
        let sel = Sel::with_margin(1).expect("sel");
        let opened = open(&pixs, &sel).expect("Opening failed");
        rp.compare_values(1.0, bool_value(opened.is_subset_of(&pixs).unwrap()), 0.0);

        // The input is never modified
        rp.compare_values(orig_count as f64, pixs.count_foreground() as f64, 0.0);
    }

    // Sensitivity: a wider margin grows at least as much
    let pixs = field_pattern(40, 30, 5, 10).expect("pattern");
    let d1 = dilate(&pixs, &Sel::with_margin(1).unwrap()).unwrap();
    let d2 = dilate(&pixs, &Sel::with_margin(2).unwrap()).unwrap();
    rp.compare_values(1.0, bool_value(d1.is_subset_of(&d2).unwrap()), 0.0);

    // Two margin-1 dilations equal one margin-2 dilation
    let d11 = dilate_3x3(&d1).unwrap();
    rp.compare_fields(&d2, &d11);

    // Erosion of a rectangle shrinks it by one pixel on each side
    let rect = filled_rect(12, 10, Rect::new(2, 2, 7, 5)).unwrap();
    let expected = filled_rect(12, 10, Rect::new(3, 3, 5, 3)).unwrap();
    rp.compare_fields(&expected, &erode_3x3(&rect).unwrap());
    let e2 = erode(&rect, &Sel::with_margin(2).unwrap()).unwrap();
    rp.compare_fields(&filled_rect(12, 10, Rect::new(4, 4, 3, 1)).unwrap(), &e2);

    // Closing bridges a one-pixel gap
    let gap = field_from_ascii(
        "..........
         .###.###..
         .###.###..
         .###.###..
         ..........",
    )
    .unwrap();
    let closed = close(&gap, &Sel::with_margin(1).unwrap()).unwrap();
    rp.show_field("closed", &closed);
    rp.compare_values(1.0, bool_value(closed.get(4, 2) == Some(true)), 0.0);

    assert!(rp.cleanup(), "binmorph regression test failed");
}

fn bool_value(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}
