//! Gray morphology regression test
//!
//! Tests:
//!   (1) Erosion thickens dark ink, dilation thins it
//!   (2) Duality of erode and dilate under inversion
//!   (3) A 1x1 brick is the identity
//!   (4) Parameter and depth checks
//!
//! Run with:
//! ```
//! cargo test -p kocr-morph --test graymorph_reg
//! ```

use kocr_core::{Pix, PixelDepth};
use kocr_morph::{MorphError, dilate_gray, erode_gray};
use kocr_test::RegParams;
use kocr_test::fixtures::{GlyphShape, INK};

fn invert_gray(pix: &Pix) -> Pix {
    let data = pix.data().iter().map(|&v| 255 - v).collect();
    Pix::from_raw(pix.width(), pix.height(), PixelDepth::Bit8, data).expect("invert")
}

fn ink_count(pix: &Pix) -> usize {
    pix.data().iter().filter(|&&v| v == INK).count()
}

#[test]
fn graymorph_reg() {
    let mut rp = RegParams::new("graymorph");
    let pixs = GlyphShape::Ring.render(48, 0).expect("ring");

    eprintln!("=== erosion thickens ink, dilation thins it ===");
    let eroded = erode_gray(&pixs, 3, 3).expect("erode");
    let dilated = dilate_gray(&pixs, 3, 3).expect("dilate");
    rp.write_pix(&eroded, "eroded").expect("write");
    rp.write_pix(&dilated, "dilated").expect("write");
    let (n0, ne, nd) = (ink_count(&pixs), ink_count(&eroded), ink_count(&dilated));
    eprintln!("ink pixels: source {n0}, eroded {ne}, dilated {nd}");
    rp.check(ne > n0, "erosion adds ink");
    rp.check(nd < n0, "dilation removes ink");
    rp.check(nd > 0, "a 3x3 brick does not erase the ring");

    eprintln!("=== duality under inversion ===");
    let inverted = invert_gray(&pixs);
    let lhs = dilate_gray(&inverted, 5, 3).expect("dilate");
    let rhs = invert_gray(&erode_gray(&pixs, 5, 3).expect("erode"));
    rp.compare_pix(&lhs, &rhs);
    let lhs = erode_gray(&inverted, 2, 4).expect("erode");
    let rhs = invert_gray(&dilate_gray(&pixs, 2, 4).expect("dilate"));
    rp.compare_pix(&lhs, &rhs);

    eprintln!("=== identity brick ===");
    rp.compare_pix(&pixs, &erode_gray(&pixs, 1, 1).expect("erode"));
    rp.compare_pix(&pixs, &dilate_gray(&pixs, 1, 1).expect("dilate"));

    eprintln!("=== rejected input ===");
    rp.check(
        matches!(
            erode_gray(&pixs, 0, 3),
            Err(MorphError::InvalidParameters(_))
        ),
        "zero brick size",
    );
    let binary = Pix::new(8, 8, PixelDepth::Bit1).expect("binary");
    rp.check(
        matches!(
            dilate_gray(&binary, 3, 3),
            Err(MorphError::UnsupportedDepth { .. })
        ),
        "1 bpp refused",
    );

    assert!(rp.cleanup(), "graymorph regression test failed");
}
