//! Interior sampling regression test
//!
//! Run with:
//! ```
//! cargo test -p plaque-region --test interior_reg
//! ```

use plaque_core::Rect;
use plaque_region::{
    ConnectivityType, InteriorOptions, collect_interior_intensities, filter_regions_by_size,
    interior_mask, label_components,
};
use plaque_test::{RegParams, field_from_ascii, field_pattern, filled_rect, gray_constant, gray_ramp};

#[test]
fn interior_reg() {
    let mut rp = RegParams::new("interior");
    let opts = InteriorOptions::default();

    // A six-pixel line is above the size threshold but has no interior
    let line = field_from_ascii(
        "........
         .######.
         ........",
    )
    .expect("fixture");
    let labeling = label_components(&line, ConnectivityType::EightWay).expect("label");
    rp.compare_values(6.0, labeling.regions[0].area as f64, 0.0);
    let gray = gray_ramp(8, 3).expect("gray");
    let values = collect_interior_intensities(&labeling, &gray, &opts).expect("sample");
    rp.compare_values(0.0, values.len() as f64, 0.0);

    // A 5x4 block keeps its 3x2 core, sampled from the gray field
    let block = filled_rect(10, 8, Rect::new(2, 2, 5, 4)).expect("rect");
    let labeling = label_components(&block, ConnectivityType::EightWay).expect("label");
    let gray = gray_constant(10, 8, 77).expect("gray");
    let values = collect_interior_intensities(&labeling, &gray, &opts).expect("sample");
    rp.compare_values(6.0, values.len() as f64, 0.0);
    rp.compare_values(1.0, if values.iter().all(|&v| v == 77) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_fields(
        &filled_rect(10, 8, Rect::new(3, 3, 3, 2)).expect("rect"),
        &interior_mask(&labeling, &opts).expect("mask"),
    );

    // A wider margin needs a thicker region
    let wide = InteriorOptions {
        min_region_size: 5,
        margin: 2,
    };
    rp.compare_values(
        0.0,
        interior_mask(&labeling, &wide).expect("mask").count_foreground() as f64,
        0.0,
    );

    // Random fields: the interior is inside the size-filtered field
    for seed in [5u32, 55, 555] {
        let pixs = field_pattern(60, 40, seed, 70).expect("pattern");
        let labeling = label_components(&pixs, ConnectivityType::EightWay).expect("label");
        let kept = filter_regions_by_size(&labeling, opts.min_region_size);
        let interior = interior_mask(&labeling, &opts).expect("mask");
        eprintln!(
            "  seed {}: fg {} kept {} interior {}",
            seed,
            pixs.count_foreground(),
            kept.count_foreground(),
            interior.count_foreground()
        );
        rp.compare_values(1.0, if interior.is_subset_of(&kept).unwrap() { 1.0 } else { 0.0 }, 0.0);

        let gray = gray_ramp(60, 40).expect("gray");
        let values = collect_interior_intensities(&labeling, &gray, &opts).expect("sample");
        rp.compare_values(interior.count_foreground() as f64, values.len() as f64, 0.0);
    }

    assert!(rp.cleanup(), "interior regression test failed");
}
