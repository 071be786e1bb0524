//! Feature database regression test
//!
//! Builds a small database from synthetic glyphs, round-trips it through a
//! file and checks the header layout and validity probe.

use kocr_recog::database::{DATABASE_MAGIC, HEADER_SIZE};
use kocr_recog::feature::GRID_BYTES;
use kocr_recog::{FeatureBuilder, FeatureDatabase, RecogError, Sample, is_valid_database};
use kocr_test::fixtures::GlyphShape;
use kocr_test::{RegParams, scratch_dir};

fn samples() -> Vec<Sample> {
    let builder = FeatureBuilder::default();
    GlyphShape::ALL
        .iter()
        .map(|&shape| {
            let pix = shape.render(40, 0).expect("render");
            Sample::new(shape.label(), builder.extract_glyph(&pix).expect("extract"))
        })
        .collect()
}

#[test]
fn database_reg() {
    let mut rp = RegParams::new("database");
    let dir = scratch_dir("database").expect("scratch dir");
    let samples = samples();
    let n = samples.len();

    eprintln!("=== header layout ===");
    let db = FeatureDatabase::from_samples(&samples).expect("pack");
    let header = db.header();
    rp.compare_values(f64::from(DATABASE_MAGIC), f64::from(header.magic), 0.0);
    rp.compare_values(n as f64, f64::from(header.count), 0.0);
    rp.compare_values(HEADER_SIZE as f64, f64::from(header.feature_offset), 0.0);
    rp.compare_values(
        (HEADER_SIZE + n * GRID_BYTES) as f64,
        f64::from(header.class_offset),
        0.0,
    );
    rp.compare_values(
        (HEADER_SIZE + n * GRID_BYTES + n) as f64,
        db.as_bytes().len() as f64,
        0.0,
    );
    let expected_labels: Vec<u8> = GlyphShape::ALL.iter().map(|s| s.label()).collect();
    rp.compare_strings(&expected_labels, db.labels());

    eprintln!("=== save and load ===");
    let path = dir.join("shapes.db");
    db.save(&path).expect("save");
    rp.check(is_valid_database(&path), "saved file is a database");
    let loaded = FeatureDatabase::load(&path).expect("load");
    rp.compare_strings(db.as_bytes(), loaded.as_bytes());
    rp.check(loaded == db, "loaded database equals original");
    for (i, sample) in samples.iter().enumerate() {
        rp.check(loaded.grid(i).to_grid() == sample.grid, "grid survives");
    }

    eprintln!("=== rejected files ===");
    let bogus = dir.join("bogus.db");
    let mut bytes = db.as_bytes().to_vec();
    bytes[0] ^= 0xff;
    std::fs::write(&bogus, &bytes).expect("write bogus");
    rp.check(!is_valid_database(&bogus), "bad magic is not a database");
    rp.check(
        matches!(
            FeatureDatabase::load(&bogus),
            Err(RecogError::InvalidDatabaseMagic { .. })
        ),
        "bad magic refused",
    );

    let short = dir.join("short.db");
    std::fs::write(&short, &db.as_bytes()[..HEADER_SIZE + 100]).expect("write short");
    rp.check(FeatureDatabase::load(&short).is_err(), "truncated file refused");
    rp.check(!is_valid_database(dir.join("missing.db")), "missing file");

    assert!(rp.cleanup(), "database regression test failed");
}
