//! Boundary contour tracing
//!
//! # Algorithm
//!
//! The canvas is scanned column by column (x outer, y inner). A pixel
//! starts a new contour when it is foreground, the pixel above it is
//! background (or it sits on row 0), and no earlier trace has stepped on it.
//!
//! From the start pixel the walk repeatedly searches the 8 neighbors in
//! increasing direction order, beginning at `(inverse(last) + 1) mod 8`
//! where `inverse(d) = (d + 4) mod 8`, and moves to the first foreground
//! neighbor. The search on the first step begins at direction 4 on row 0
//! and 3 elsewhere. The walk ends when it steps back onto the start pixel;
//! an isolated pixel yields a one-point contour.
//!
//! Direction `d` moves by `(DX[d], DY[d])`:
//!
//! ```text
//!   1  2  3
//!   0  .  4
//!   7  6  5
//! ```

use crate::{FOREGROUND, RecogError, RecogResult};
use kocr_core::{Pix, PixelDepth};
use tracing::debug;

const DX: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];
const DY: [i32; 8] = [0, -1, -1, -1, 0, 1, 1, 1];

/// A canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn step(self, dir: usize) -> Self {
        Self::new(self.x + DX[dir], self.y + DY[dir])
    }
}

/// A closed boundary, in walk order
///
/// The start point appears once, at index 0; the walk's final step back
/// onto it is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Points in walk order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for traced contours
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at a cyclic index (negative values wrap)
    pub fn cyclic(&self, index: isize) -> Point {
        let n = self.points.len() as isize;
        self.points[index.rem_euclid(n) as usize]
    }

    /// True when every step, including last-to-first, is one 8-neighbor move
    pub fn is_closed(&self) -> bool {
        let adjacent = |a: Point, b: Point| {
            a != b && (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1
        };
        match self.points.len() {
            0 => false,
            1 => true,
            n => {
                self.points.windows(2).all(|w| adjacent(w[0], w[1]))
                    && adjacent(self.points[n - 1], self.points[0])
            }
        }
    }
}

struct Tracer<'a> {
    data: &'a [u8],
    width: i32,
    height: i32,
    visited: Vec<bool>,
}

impl Tracer<'_> {
    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    fn is_fg(&self, p: Point) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.x < self.width
            && p.y < self.height
            && self.data[self.index(p)] == FOREGROUND
    }

    fn is_start(&self, p: Point) -> bool {
        self.is_fg(p)
            && !self.visited[self.index(p)]
            && (p.y == 0 || !self.is_fg(Point::new(p.x, p.y - 1)))
    }

    fn follow(&mut self, start: Point) -> Contour {
        let step_limit = 4 * (self.width * self.height) as usize;
        let mut points = vec![start];
        let mut last = start;
        let mut search = if start.y == 0 { 4 } else { 3 };

        loop {
            let Some(dir) = (search..search + 8)
                .map(|d| d % 8)
                .find(|&d| self.is_fg(last.step(d)))
            else {
                break;
            };
            last = last.step(dir);
            let idx = self.index(last);
            self.visited[idx] = true;
            search = (dir + 4 + 1) % 8;

            if last == start {
                break;
            }
            points.push(last);
            if points.len() > step_limit {
                debug!(x = start.x, y = start.y, "contour walk did not close; cut");
                break;
            }
        }
        Contour { points }
    }
}

/// Trace every boundary of the foreground in an 8-bpp canvas
///
/// # Errors
///
/// * [`RecogError::UnsupportedDepth`] unless the canvas is 8 bpp.
/// * [`RecogError::TooManyContours`] when a contour beyond `max_contours`
///   would be started.
pub fn trace_contours(canvas: &Pix, max_contours: usize) -> RecogResult<Vec<Contour>> {
    if canvas.depth() != PixelDepth::Bit8 {
        return Err(RecogError::UnsupportedDepth {
            expected: "8 bpp",
            actual: canvas.depth().bits(),
        });
    }
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let mut tracer = Tracer {
        data: canvas.data(),
        width: w,
        height: h,
        visited: vec![false; (w * h) as usize],
    };

    let mut contours = Vec::new();
    for x in 0..w {
        for y in 0..h {
            let p = Point::new(x, y);
            if !tracer.is_start(p) {
                continue;
            }
            if contours.len() == max_contours {
                return Err(RecogError::TooManyContours {
                    count: max_contours + 1,
                    limit: max_contours,
                });
            }
            contours.push(tracer.follow(p));
        }
    }
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(pixels: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new_filled(64, 64, PixelDepth::Bit8, 255).unwrap().to_mut();
        for &(x, y) in pixels {
            pm.set_pixel(x, y, 0).unwrap();
        }
        pm.into()
    }

    fn rect(x0: u32, y0: u32, w: u32, h: u32) -> Vec<(u32, u32)> {
        (y0..y0 + h)
            .flat_map(|y| (x0..x0 + w).map(move |x| (x, y)))
            .collect()
    }

    #[test]
    fn test_square_walk_order() {
        let contours = trace_contours(&canvas(&rect(10, 10, 3, 3)), 30).unwrap();
        assert_eq!(contours.len(), 1);
        let expected: Vec<Point> = [
            (10, 10),
            (11, 10),
            (12, 10),
            (12, 11),
            (12, 12),
            (11, 12),
            (10, 12),
            (10, 11),
        ]
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect();
        assert_eq!(contours[0].points(), expected.as_slice());
        assert!(contours[0].is_closed());
    }

    #[test]
    fn test_isolated_pixel() {
        let contours = trace_contours(&canvas(&[(30, 40)]), 30).unwrap();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points(), &[Point::new(30, 40)]);
        assert!(contours[0].is_closed());
    }

    #[test]
    fn test_thin_line_doubles_back() {
        let contours = trace_contours(&canvas(&[(2, 5), (3, 5), (4, 5)]), 30).unwrap();
        let pts: Vec<(i32, i32)> = contours[0].points().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(pts, vec![(2, 5), (3, 5), (4, 5), (3, 5)]);
    }

    #[test]
    fn test_hole_gives_inner_contour() {
        let mut pixels = rect(10, 10, 5, 5);
        pixels.retain(|&p| p != (12, 12));
        let contours = trace_contours(&canvas(&pixels), 30).unwrap();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[1].points()[0], Point::new(12, 13));
        assert!(contours.iter().all(|c| c.is_closed()));
    }

    #[test]
    fn test_top_row_start() {
        let contours = trace_contours(&canvas(&rect(5, 0, 4, 2)), 30).unwrap();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points()[0], Point::new(5, 0));
        assert!(contours[0].is_closed());
    }

    #[test]
    fn test_contour_limit() {
        let thirty: Vec<(u32, u32)> = (0..30).map(|i| (2 * i, 7)).collect();
        assert_eq!(trace_contours(&canvas(&thirty), 30).unwrap().len(), 30);

        let mut more = thirty;
        more.push((2, 20));
        let err = trace_contours(&canvas(&more), 30).unwrap_err();
        assert!(matches!(
            err,
            RecogError::TooManyContours {
                count: 31,
                limit: 30
            }
        ));
    }

    #[test]
    fn test_cyclic_index() {
        let contours = trace_contours(&canvas(&rect(10, 10, 3, 3)), 30).unwrap();
        let c = &contours[0];
        assert_eq!(c.cyclic(-1), Point::new(10, 11));
        assert_eq!(c.cyclic(8), Point::new(10, 10));
    }
}
