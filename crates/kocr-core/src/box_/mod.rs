//! Box - rectangle regions

use crate::error::{Error, Result};

/// A rectangle region
///
/// A small Copy type; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a box spanning the inclusive corners `(x1, y1)`..=`(x2, y2)`
    pub fn from_inclusive_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (xmin, xmax) = (x1.min(x2), x1.max(x2));
        let (ymin, ymax) = (y1.min(y2), y1.max(y2));
        Self {
            x: xmin,
            y: ymin,
            w: xmax - xmin + 1,
            h: ymax - ymin + 1,
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the box is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the box
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Ratio of the longer side to the shorter side
    ///
    /// Returns `f64::INFINITY` for an empty box.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let w = self.w as f64;
        let h = self.h as f64;
        (w / h).max(h / w)
    }

    /// Compute the intersection of two boxes
    pub fn intersect(&self, other: &Box) -> Option<Box> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Box {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Smallest box containing both boxes; empty boxes are ignored
    pub fn union(&self, other: &Box) -> Box {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Box {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_new() {
        assert!(Box::new(0, 0, -1, 5).is_err());
        let b = Box::new(2, 3, 4, 5).unwrap();
        assert_eq!(b.right(), 6);
        assert_eq!(b.bottom(), 8);
        assert_eq!(b.area(), 20);
    }

    #[test]
    fn test_inclusive_corners() {
        let b = Box::from_inclusive_corners(5, 7, 2, 3);
        assert_eq!(b, Box::new_unchecked(2, 3, 4, 5));
        assert!(b.contains_point(5, 7));
        assert!(!b.contains_point(6, 7));
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(Box::new_unchecked(0, 0, 20, 2).aspect_ratio(), 10.0);
        assert_eq!(Box::new_unchecked(0, 0, 2, 20).aspect_ratio(), 10.0);
        assert!(Box::default().aspect_ratio().is_infinite());
    }

    #[test]
    fn test_intersect_and_union() {
        let a = Box::new_unchecked(0, 0, 10, 10);
        let b = Box::new_unchecked(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Box::new_unchecked(5, 5, 5, 5)));
        assert_eq!(a.union(&b), Box::new_unchecked(0, 0, 15, 15));
        assert_eq!(Box::default().union(&b), b);
        assert_eq!(a.intersect(&Box::new_unchecked(20, 20, 1, 1)), None);
    }
}
