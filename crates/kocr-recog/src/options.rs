//! Tunable recognition parameters

use crate::{RecogError, RecogResult};
use kocr_region::ConnectivityType;

/// Options shared by segmentation, preprocessing and recognition
#[derive(Debug, Clone)]
pub struct RecogOptions {
    /// Gray level at or above which a pixel is background (default: 120)
    pub threshold: u8,

    /// A column is blank when its sum reaches this percentage of an
    /// all-background column (default: 95)
    pub background_ratio_percent: u32,

    /// Side of the square erosion applied before labeling (default: 3)
    pub erode_size: u32,

    /// Components more elongated than this may be ruled lines (default: 10.0)
    pub ruled_line_aspect_ratio: f64,

    /// Components with fewer pixels are ignored (default: 3)
    pub min_component_size: u32,

    /// Pixel neighborhood for labeling (default: 8-way)
    pub connectivity: ConnectivityType,

    /// Maximum contours traced per glyph (default: 30)
    pub max_contours: usize,

    /// Images wider than this many heights are split into glyphs (default: 2)
    pub multi_glyph_aspect_ratio: u32,
}

impl Default for RecogOptions {
    fn default() -> Self {
        Self {
            threshold: 120,
            background_ratio_percent: 95,
            erode_size: 3,
            ruled_line_aspect_ratio: 10.0,
            min_component_size: 3,
            connectivity: ConnectivityType::EightWay,
            max_contours: 30,
            multi_glyph_aspect_ratio: 2,
        }
    }
}

impl RecogOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binarization threshold
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the blank-column percentage
    pub fn with_background_ratio_percent(mut self, percent: u32) -> Self {
        self.background_ratio_percent = percent;
        self
    }

    /// Set the erosion size
    pub fn with_erode_size(mut self, size: u32) -> Self {
        self.erode_size = size;
        self
    }

    /// Set the ruled-line aspect ratio
    pub fn with_ruled_line_aspect_ratio(mut self, ratio: f64) -> Self {
        self.ruled_line_aspect_ratio = ratio;
        self
    }

    /// Set the minimum component size
    pub fn with_min_component_size(mut self, size: u32) -> Self {
        self.min_component_size = size;
        self
    }

    /// Set the labeling connectivity
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the contour limit
    pub fn with_max_contours(mut self, max: usize) -> Self {
        self.max_contours = max;
        self
    }

    /// Set the aspect ratio above which an image is treated as a strip
    pub fn with_multi_glyph_aspect_ratio(mut self, ratio: u32) -> Self {
        self.multi_glyph_aspect_ratio = ratio;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.threshold == 0 {
            return Err(RecogError::InvalidParameter(
                "threshold must be positive".to_string(),
            ));
        }
        if self.background_ratio_percent == 0 || self.background_ratio_percent > 100 {
            return Err(RecogError::InvalidParameter(
                "background_ratio_percent must be in 1..=100".to_string(),
            ));
        }
        if self.erode_size == 0 {
            return Err(RecogError::InvalidParameter(
                "erode_size must be positive".to_string(),
            ));
        }
        if !(self.ruled_line_aspect_ratio >= 1.0) {
            return Err(RecogError::InvalidParameter(
                "ruled_line_aspect_ratio must be at least 1".to_string(),
            ));
        }
        if self.max_contours == 0 {
            return Err(RecogError::InvalidParameter(
                "max_contours must be positive".to_string(),
            ));
        }
        if self.multi_glyph_aspect_ratio == 0 {
            return Err(RecogError::InvalidParameter(
                "multi_glyph_aspect_ratio must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
