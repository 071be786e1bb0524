//! Contour and feature extraction regression test
//!
//! Normalizes synthetic glyphs, traces their boundaries and checks the
//! structural properties of the resulting feature grids.

use kocr_recog::contour::trace_contours;
use kocr_recog::feature::{Channels, DIRECTIONS, FeatureBuilder, GRID_SIZE, equalize};
use kocr_recog::matcher::distance;
use kocr_recog::preprocess::normalize_glyph;
use kocr_recog::{CANVAS_SIZE, RecogOptions};
use kocr_test::RegParams;
use kocr_test::fixtures::GlyphShape;

#[test]
fn contour_reg() {
    let mut rp = RegParams::new("contour");
    let options = RecogOptions::default();

    eprintln!("=== ring has an outer and an inner boundary ===");
    let ring = GlyphShape::Ring.render(48, 0).expect("ring");
    let canvas = normalize_glyph(&ring, &options).expect("normalize ring");
    rp.write_pix(&canvas, "ring_canvas").expect("write");
    rp.compare_values(f64::from(CANVAS_SIZE), f64::from(canvas.width()), 0.0);
    let contours = trace_contours(&canvas, options.max_contours).expect("trace ring");
    eprintln!("ring contours: {}", contours.len());
    rp.check(contours.len() >= 2, "outer and inner boundary traced");
    let longest = contours.iter().map(|c| c.len()).max().unwrap_or(0);
    rp.check(longest > 100, "outer boundary circles the canvas");

    eprintln!("=== every contour is closed ===");
    for shape in GlyphShape::ALL {
        let pix = shape.render(48, 1).expect("render");
        let canvas = normalize_glyph(&pix, &options).expect("normalize");
        let contours = trace_contours(&canvas, options.max_contours).expect("trace");
        rp.check(!contours.is_empty(), "at least one contour");
        for c in &contours {
            rp.check(c.is_closed(), &format!("{shape:?} contour closed"));
            let repeats = c.points().windows(2).filter(|w| w[0] == w[1]).count();
            rp.compare_values(0.0, repeats as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "contour regression test failed");
}

#[test]
fn equalize_reg() {
    let mut rp = RegParams::new("equalize");

    eprintln!("=== 1024 distinct values ===");
    let mut blurred: Channels<f64> = [[[0.0; GRID_SIZE]; GRID_SIZE]; DIRECTIONS];
    let mut i = 0usize;
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            for plane in blurred.iter_mut() {
                plane[x][y] = ((i * 37) % 1024) as f64;
                i += 1;
            }
        }
    }
    let levels = equalize(&blurred);

    let mut pairs = Vec::with_capacity(1024);
    let mut histogram = [0usize; 256];
    for nu in 0..DIRECTIONS {
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                pairs.push((blurred[nu][x][y], levels[nu][x][y]));
                histogram[levels[nu][x][y] as usize] += 1;
            }
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    let monotone = pairs.windows(2).all(|w| w[0].1 <= w[1].1);
    rp.check(monotone, "levels follow rank order");
    rp.check(histogram.iter().all(|&n| n == 4), "four values per level");
    rp.compare_values(0.0, f64::from(pairs[0].1), 0.0);
    rp.compare_values(255.0, f64::from(pairs[1023].1), 0.0);

    assert!(rp.cleanup(), "equalize regression test failed");
}

#[test]
fn feature_reg() {
    let mut rp = RegParams::new("feature");
    let builder = FeatureBuilder::default();

    eprintln!("=== identical input gives identical grids ===");
    let bar = GlyphShape::Bar.render(48, 0).expect("bar");
    let a = builder.extract_glyph(&bar).expect("extract");
    let b = builder.extract_glyph(&bar).expect("extract");
    rp.compare_values(0.0, distance(a.view(), b.view()), 0.0);
    rp.check(a == b, "grids equal");

    eprintln!("=== variants stay closer than other shapes ===");
    let bar2 = builder
        .extract_glyph(&GlyphShape::Bar.render(48, 1).expect("bar"))
        .expect("extract");
    let ring = builder
        .extract_glyph(&GlyphShape::Ring.render(48, 0).expect("ring"))
        .expect("extract");
    let near = distance(a.view(), bar2.view());
    let far = distance(a.view(), ring.view());
    eprintln!("bar/bar = {near:.1}, bar/ring = {far:.1}");
    rp.check(near < far, "same class is nearer");

    eprintln!("=== intensity image ===");
    let intensity = a.view().intensity_image().expect("intensity");
    rp.write_pix(&intensity, "bar_intensity").expect("write");
    rp.compare_values(16.0, f64::from(intensity.width()), 0.0);
    let center = intensity.get_pixel(8, 8).unwrap_or(0);
    let corner = intensity.get_pixel(0, 0).unwrap_or(0);
    rp.check(center > corner, "ink is brighter at the center column");

    assert!(rp.cleanup(), "feature regression test failed");
}
