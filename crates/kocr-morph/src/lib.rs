//! kocr-morph - Grayscale morphology
//!
//! Brick (rectangular) erosion and dilation for 8-bpp images. Erosion is
//! what the glyph preprocessor uses to thicken dark strokes before
//! component labeling.

mod error;
pub mod grayscale;

pub use error::{MorphError, MorphResult};
pub use grayscale::{dilate_gray, erode_gray};
