//! Connected component labeling regression test
//!
//! Tests:
//!   (1) 4-way and 8-way component counts on a drawn page
//!   (2) Size-ordered relabeling with a minimum-size filter
//!   (3) Component extraction
//!
//! Run with:
//! ```
//! cargo test -p kocr-region --test label_reg
//! ```

use kocr_core::{Box, Pix, PixelDepth};
use kocr_region::{
    ConnectivityType, RegionError, find_connected_components, label_by_size,
    label_connected_components,
};
use kocr_test::RegParams;
use kocr_test::fixtures::{Canvas, INK};

/// Ink pixels become 1 in a 1-bpp image
fn binarize(pix: &Pix) -> Pix {
    let data = pix.data().iter().map(|&v| u8::from(v == INK)).collect();
    Pix::from_raw(pix.width(), pix.height(), PixelDepth::Bit1, data).expect("binarize")
}

/// A 10x10 square, a 4x4 square and two diagonally touching pixels
fn page() -> Pix {
    let mut canvas = Canvas::new(60, 30).expect("canvas");
    canvas
        .fill_rect(2, 2, 10, 10, INK)
        .fill_rect(20, 5, 4, 4, INK)
        .fill_rect(40, 20, 1, 1, INK)
        .fill_rect(41, 21, 1, 1, INK);
    binarize(&canvas.into_pix())
}

#[test]
fn label_reg() {
    let mut rp = RegParams::new("label");
    let pixs = page();

    eprintln!("=== component counts ===");
    let four = find_connected_components(&pixs, ConnectivityType::FourWay).expect("4-way");
    let eight = find_connected_components(&pixs, ConnectivityType::EightWay).expect("8-way");
    rp.compare_values(4.0, four.len() as f64, 0.0);
    rp.compare_values(3.0, eight.len() as f64, 0.0);
    let total: u32 = eight.iter().map(|c| c.pixel_count).sum();
    rp.compare_values(118.0, f64::from(total), 0.0);

    eprintln!("=== largest first, small regions dropped ===");
    let regions = label_by_size(&pixs, ConnectivityType::EightWay, 5).expect("label");
    rp.compare_values(2.0, regions.len() as f64, 0.0);
    rp.compare_values(100.0, f64::from(regions.components[0].pixel_count), 0.0);
    rp.compare_values(16.0, f64::from(regions.components[1].pixel_count), 0.0);
    rp.check(
        regions.components[0].bounds == Box::new_unchecked(2, 2, 10, 10),
        "largest bounds",
    );
    rp.compare_values(1.0, f64::from(regions.map.get(5, 5).unwrap_or(0)), 0.0);
    rp.compare_values(2.0, f64::from(regions.map.get(21, 6).unwrap_or(0)), 0.0);
    rp.compare_values(0.0, f64::from(regions.map.get(40, 20).unwrap_or(99)), 0.0);

    eprintln!("=== extraction ===");
    let map = label_connected_components(&pixs, ConnectivityType::FourWay).expect("label");
    let first = map.extract_component(1).expect("extract");
    rp.write_pix(&first, "first_component").expect("write");
    let ones = first.data().iter().filter(|&&v| v == 1).count();
    rp.compare_values(100.0, ones as f64, 0.0);
    rp.check(
        matches!(
            map.extract_component(5),
            Err(RegionError::InvalidLabel { label: 5, count: 4 })
        ),
        "label past the count",
    );

    assert!(rp.cleanup(), "label regression test failed");
}
