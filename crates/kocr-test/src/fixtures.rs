//! Synthetic glyph images
//!
//! All fixtures are 8-bpp with dark ink ([`INK`]) on white paper
//! ([`PAPER`]), the polarity of a scanned page.

use crate::TestResult;
use kocr_core::{Pix, PixMut, PixelDepth};

/// Ink value
pub const INK: u8 = 0;
/// Paper value
pub const PAPER: u8 = 255;

/// A blank page
pub fn blank(width: u32, height: u32) -> TestResult<Pix> {
    Ok(Pix::new_filled(width, height, PixelDepth::Bit8, u32::from(PAPER))?)
}

/// Drawing surface for building fixtures; every primitive clips to the page
pub struct Canvas {
    pm: PixMut,
}

impl Canvas {
    /// Start from a blank page
    pub fn new(width: u32, height: u32) -> TestResult<Self> {
        Ok(Self {
            pm: blank(width, height)?.to_mut(),
        })
    }

    fn plot(&mut self, x: i32, y: i32, val: u8) {
        if x >= 0 && y >= 0 && (x as u32) < self.pm.width() && (y as u32) < self.pm.height() {
            self.pm.set_pixel_unchecked(x as u32, y as u32, u32::from(val));
        }
    }

    /// Fill a rectangle with `val`
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, val: u8) -> &mut Self {
        for yy in y..y + h {
            for xx in x..x + w {
                self.plot(xx, yy, val);
            }
        }
        self
    }

    /// Draw a straight ink stroke with a square pen of side `thickness`
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32) -> &mut Self {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        let lo = -(thickness / 2);
        for s in 0..=steps {
            let x = x0 + ((x1 - x0) * s + steps / 2).div_euclid(steps);
            let y = y0 + ((y1 - y0) * s + steps / 2).div_euclid(steps);
            self.fill_rect(x + lo, y + lo, thickness, thickness, INK);
        }
        self
    }

    /// Draw an ink annulus with radii `inner..=outer` around `(cx, cy)`
    pub fn ring(&mut self, cx: i32, cy: i32, outer: i32, inner: i32) -> &mut Self {
        for y in cy - outer..=cy + outer {
            for x in cx - outer..=cx + outer {
                let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
                if d2 <= outer * outer && d2 >= inner * inner {
                    self.plot(x, y, INK);
                }
            }
        }
        self
    }

    /// Finish drawing
    pub fn into_pix(self) -> Pix {
        self.pm.into()
    }
}

/// Shapes that stand in for characters in recognition tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphShape {
    /// A vertical stroke, labeled `'1'`
    Bar,
    /// A hollow circle, labeled `'0'`
    Ring,
    /// A plus sign, labeled `'+'`
    Cross,
    /// A rising diagonal, labeled `'/'`
    Slash,
    /// Vertical stroke with a foot, labeled `'L'`
    Ell,
    /// Horizontal bar over a vertical stroke, labeled `'T'`
    Tee,
}

impl GlyphShape {
    /// Every shape, in label order of the variants above
    pub const ALL: [GlyphShape; 6] = [
        GlyphShape::Bar,
        GlyphShape::Ring,
        GlyphShape::Cross,
        GlyphShape::Slash,
        GlyphShape::Ell,
        GlyphShape::Tee,
    ];

    /// Class label byte
    pub fn label(self) -> u8 {
        match self {
            GlyphShape::Bar => b'1',
            GlyphShape::Ring => b'0',
            GlyphShape::Cross => b'+',
            GlyphShape::Slash => b'/',
            GlyphShape::Ell => b'L',
            GlyphShape::Tee => b'T',
        }
    }

    /// Render on a `size x size` page
    ///
    /// `variant` perturbs stroke thickness and extent slightly so that
    /// several renderings of one shape form a realistic class cluster.
    pub fn render(self, size: u32, variant: u32) -> TestResult<Pix> {
        let mut canvas = Canvas::new(size, size)?;
        self.draw(&mut canvas, 0, size as i32, size as i32, variant);
        Ok(canvas.into_pix())
    }

    /// Draw into a `w x h` cell whose left edge is `x0`
    pub fn draw(self, canvas: &mut Canvas, x0: i32, w: i32, h: i32, variant: u32) {
        let v = variant as i32;
        let m = (w.min(h) / 8).max(1) + v % 2;
        let t = (w.min(h) / 8).max(2) + v % 3;
        let (left, right) = (x0 + m, x0 + w - 1 - m);
        let (top, bottom) = (m, h - 1 - m);
        let cx = x0 + w / 2;
        let cy = h / 2;
        match self {
            GlyphShape::Bar => {
                canvas.line(cx, top, cx, bottom, t);
            }
            GlyphShape::Ring => {
                let outer = (w.min(h) / 2 - m).max(3);
                canvas.ring(cx, cy, outer, (outer - t).max(1));
            }
            GlyphShape::Cross => {
                canvas.line(cx, top, cx, bottom, t);
                canvas.line(left, cy, right, cy, t);
            }
            GlyphShape::Slash => {
                canvas.line(left, bottom, right, top, t);
            }
            GlyphShape::Ell => {
                canvas.line(left + t, top, left + t, bottom, t);
                canvas.line(left + t, bottom, right, bottom, t);
            }
            GlyphShape::Tee => {
                canvas.line(left, top + t, right, top + t, t);
                canvas.line(cx, top + t, cx, bottom, t);
            }
        }
    }
}

/// A horizontal strip of glyphs separated by blank gaps
///
/// Returns the strip and the `(x, width)` column run covered by each
/// glyph's ink.
pub fn glyph_strip(
    shapes: &[GlyphShape],
    cell_width: u32,
    gap: u32,
    height: u32,
) -> TestResult<(Pix, Vec<(u32, u32)>)> {
    let n = shapes.len().max(1) as u32;
    let width = gap + n * (cell_width + gap);
    let mut canvas = Canvas::new(width, height)?;
    for (i, shape) in shapes.iter().enumerate() {
        let x0 = (gap + i as u32 * (cell_width + gap)) as i32;
        shape.draw(&mut canvas, x0, cell_width as i32, height as i32, 0);
    }
    let pix = canvas.into_pix();
    let runs = ink_runs(&pix);
    Ok((pix, runs))
}

/// Column runs that contain at least one ink pixel
pub fn ink_runs(pix: &Pix) -> Vec<(u32, u32)> {
    let has_ink = |x: u32| (0..pix.height()).any(|y| pix.get_pixel(x, y) == Some(u32::from(INK)));
    let mut runs = Vec::new();
    let mut start = None;
    for x in 0..pix.width() {
        match (has_ink(x), start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push((s, x - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, pix.width() - s));
    }
    runs
}
