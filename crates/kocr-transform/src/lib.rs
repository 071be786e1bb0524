//! kocr-transform - Geometric scaling
//!
//! Nearest-neighbor resampling used to bring every glyph onto the fixed
//! recognition canvas.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{scale_by_sampling, scale_to_size};
