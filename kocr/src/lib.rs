//! kocr - Character recognition for kana, digits and symbols
//!
//! Recognizes single glyphs and short horizontal strings by comparing
//! directional edge features against a trained database.
//!
//! # Overview
//!
//! - Train a database from a list of labeled glyph images
//! - Save and load it in a fixed binary layout
//! - Recognize single glyphs or strips of glyphs
//! - Audit a database (leave-one-out, exclusion, stranger and class-mean
//!   distances) and evaluate accuracy on a directory of images
//!
//! # Example
//!
//! ```no_run
//! use kocr::RecogOptions;
//!
//! let options = RecogOptions::default();
//! let recognizer = kocr::open("chars.db").unwrap();
//! let result = kocr::recog::recognize_file(&recognizer, "digits.png", &options).unwrap();
//! println!("{result}");
//! ```

// Re-export core types (primary data structures used everywhere)
pub use kocr_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use kocr_io as io;
pub use kocr_morph as morph;
pub use kocr_recog as recog;
pub use kocr_region as region;
pub use kocr_transform as transform;

pub use kocr_recog::{
    Classifier, FeatureDatabase, NearestNeighbor, RecogError, RecogOptions, RecogResult,
    Recognition,
};

use std::path::Path;

/// Load a database file and wrap it in a nearest-neighbor classifier
///
/// # Errors
///
/// Fails if the file cannot be read or is not a valid database.
pub fn open<P: AsRef<Path>>(path: P) -> RecogResult<NearestNeighbor> {
    Ok(NearestNeighbor::new(FeatureDatabase::load(path)?))
}

/// Recognize the glyph or strip in an image file with default options
pub fn recognize_path<P: AsRef<Path>>(
    recognizer: &NearestNeighbor,
    path: P,
) -> RecogResult<Recognition> {
    kocr_recog::recognize_file(recognizer, path, &RecogOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kocr_recog::{FeatureBuilder, Sample};
    use kocr_test::fixtures::GlyphShape;
    use kocr_test::scratch_dir;

    #[test]
    fn test_open_and_recognize() {
        let dir = scratch_dir("facade").unwrap();
        let builder = FeatureBuilder::default();
        let samples: Vec<Sample> = [GlyphShape::Bar, GlyphShape::Cross]
            .iter()
            .map(|&s| {
                let grid = builder.extract_glyph(&s.render(40, 0).unwrap()).unwrap();
                Sample::new(s.label(), grid)
            })
            .collect();
        let db_path = dir.join("facade.db");
        FeatureDatabase::from_samples(&samples).unwrap().save(&db_path).unwrap();

        let recognizer = open(&db_path).unwrap();
        assert_eq!(recognizer.database().len(), 2);

        let query = dir.join("plus.png");
        let pix = GlyphShape::Cross.render(32, 1).unwrap();
        io::write_image(&pix, &query, ImageFormat::Png).unwrap();
        assert_eq!(recognize_path(&recognizer, &query).unwrap().text(), "+");
    }

    #[test]
    fn test_open_missing_file() {
        assert!(open("/nonexistent/kocr/chars.db").is_err());
    }
}
