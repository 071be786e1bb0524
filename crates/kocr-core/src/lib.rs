//! kocr core - basic data structures for glyph images
//!
//! This crate provides the containers shared by every stage of the
//! recognizer:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`Box`] - Rectangle regions
//! - [`ImageFormat`] - File formats understood by `kocr-io`
//!
//! Images are either 8-bpp grayscale or 1-bpp binary. Both are stored
//! one byte per pixel, row-major.

pub mod box_;
pub mod error;
pub mod pix;

pub use box_::Box;
pub use error::{Error, Result};
pub use pix::{ImageFormat, Pix, PixMut, PixelDepth};
