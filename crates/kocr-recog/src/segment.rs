//! Glyph segmentation
//!
//! Splits a strip of characters into one sub-image per character.
//!
//! # Algorithm Overview
//!
//! 1. **Ink box**: [`find_ink_bbox`] takes the pixel at (0, 0) as the
//!    background reference and returns the smallest box covering every
//!    pixel that differs from it.
//!
//! 2. **Column profile**: a column is *blank* when the sum of its gray
//!    values reaches `background_ratio_percent` of an all-white column,
//!    i.e. `sum * 100 >= height * 255 * percent`; otherwise it is *ink*.
//!
//! 3. **Two-state scan**: [`split_columns`] walks right from `start_x`.
//!    While searching, blank columns move the left edge forward; the first
//!    ink column switches to inside-glyph. Inside a glyph the first blank
//!    column ends the glyph and becomes the next start position.

use crate::{RecogError, RecogResult};
use kocr_core::{Box, Pix, PixelDepth};

/// Smallest box covering every pixel that differs from pixel (0, 0)
///
/// Returns an empty (all-zero) box when the image is uniform.
pub fn find_ink_bbox(pix: &Pix) -> Box {
    let w = pix.width();
    let reference = pix.data()[0];
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for y in 0..pix.height() {
        for (x, &v) in pix.row_data(y).iter().enumerate() {
            if v == reference {
                continue;
            }
            let x = x as u32;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0, x1.max(x), y1.max(y)),
            });
        }
    }

    match bounds {
        Some((x0, y0, x1, y1)) => {
            debug_assert!(x1 < w);
            Box::from_inclusive_corners(x0 as i32, y0 as i32, x1 as i32, y1 as i32)
        }
        None => Box::default(),
    }
}

/// One glyph cut out of a strip
#[derive(Debug, Clone)]
pub struct GlyphColumn {
    /// The glyph's columns, full strip height
    pub image: Pix,
    /// Left edge within the strip
    pub x: u32,
    /// Number of columns
    pub width: u32,
    /// Where the next scan should start
    pub next_x: u32,
}

/// Cut the next glyph starting at or after column `start_x`
///
/// Returns `Ok(None)` once `start_x >= width` or when no ink column
/// remains. A glyph that runs to the right edge keeps its last column.
///
/// # Errors
///
/// Returns [`RecogError::UnsupportedDepth`] unless the strip is 8 bpp.
pub fn split_columns(
    pix: &Pix,
    start_x: u32,
    background_ratio_percent: u32,
) -> RecogResult<Option<GlyphColumn>> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(RecogError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    let width = pix.width();
    if start_x >= width {
        return Ok(None);
    }

    let profile = ColumnProfile::new(pix, background_ratio_percent);
    let mut left = start_x;
    let mut inside = false;
    let mut end = None;

    for x in start_x..width {
        let ink = profile.is_ink(x);
        if !inside {
            left = x;
            inside = ink;
        } else if !ink {
            end = Some(x);
            break;
        }
    }

    if !inside {
        return Ok(None);
    }
    let right = end.unwrap_or(width);
    let glyph_width = right - left;
    let image = pix.clip_rectangle(left as i32, 0, glyph_width as i32, pix.height() as i32)?;
    Ok(Some(GlyphColumn {
        image,
        x: left,
        width: glyph_width,
        next_x: right,
    }))
}

/// Iterator over every glyph of a strip, left to right
pub struct GlyphColumns<'a> {
    pix: &'a Pix,
    next_x: u32,
    background_ratio_percent: u32,
    done: bool,
}

impl<'a> GlyphColumns<'a> {
    /// Start scanning at column 0
    pub fn new(pix: &'a Pix, background_ratio_percent: u32) -> Self {
        Self {
            pix,
            next_x: 0,
            background_ratio_percent,
            done: false,
        }
    }
}

impl Iterator for GlyphColumns<'_> {
    type Item = RecogResult<GlyphColumn>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match split_columns(self.pix, self.next_x, self.background_ratio_percent) {
            Ok(Some(glyph)) if glyph.width > 0 => {
                self.next_x = glyph.next_x;
                Some(Ok(glyph))
            }
            Ok(_) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

struct ColumnProfile {
    sums: Vec<u64>,
    blank_limit: u64,
}

impl ColumnProfile {
    fn new(pix: &Pix, percent: u32) -> Self {
        let mut sums = vec![0u64; pix.width() as usize];
        for y in 0..pix.height() {
            for (sum, &v) in sums.iter_mut().zip(pix.row_data(y)) {
                *sum += u64::from(v);
            }
        }
        let full = u64::from(pix.height()) * 255;
        Self {
            sums,
            blank_limit: full * u64::from(percent),
        }
    }

    fn is_ink(&self, x: u32) -> bool {
        self.sums[x as usize] * 100 < self.blank_limit
    }
}
