//! Image scaling by sampling
//!
//! Destination pixel `(dx, dy)` takes the source pixel
//! `(floor(dx * src_w / dst_w), floor(dy * src_h / dst_h))`, computed in
//! integer arithmetic so results do not depend on float rounding.

use crate::{TransformError, TransformResult};
use kocr_core::Pix;

/// Scale an image to a specific size
///
/// # Arguments
/// * `pix` - Input image
/// * `width` - Target width (0 to maintain aspect ratio)
/// * `height` - Target height (0 to maintain aspect ratio)
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if both targets are 0.
pub fn scale_to_size(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    let (w, h) = match (width, height) {
        (0, 0) => {
            return Err(TransformError::InvalidParameters(
                "width and height cannot both be 0".to_string(),
            ));
        }
        (0, h) => {
            let w = (u64::from(pix.width()) * u64::from(h) / u64::from(pix.height())).max(1);
            (w as u32, h)
        }
        (w, 0) => {
            let h = (u64::from(pix.height()) * u64::from(w) / u64::from(pix.width())).max(1);
            (w, h as u32)
        }
        (w, h) => (w, h),
    };
    resample(pix, w, h)
}

/// Scale an image using nearest-neighbor sampling
///
/// # Arguments
/// * `pix` - Input image
/// * `scale_x` - Horizontal scale factor
/// * `scale_y` - Vertical scale factor
pub fn scale_by_sampling(pix: &Pix, scale_x: f32, scale_y: f32) -> TransformResult<Pix> {
    if !(scale_x > 0.0 && scale_y > 0.0) || !scale_x.is_finite() || !scale_y.is_finite() {
        return Err(TransformError::InvalidScaleFactor(format!(
            "{} x {}",
            scale_x, scale_y
        )));
    }
    let w = ((pix.width() as f32 * scale_x).round() as u32).max(1);
    let h = ((pix.height() as f32 * scale_y).round() as u32).max(1);
    resample(pix, w, h)
}

fn resample(pix: &Pix, w: u32, h: u32) -> TransformResult<Pix> {
    if w == pix.width() && h == pix.height() {
        return Ok(pix.clone());
    }
    let src_w = u64::from(pix.width());
    let src_h = u64::from(pix.height());
    let xmap: Vec<u32> = (0..u64::from(w))
        .map(|dx| (dx * src_w / u64::from(w)) as u32)
        .collect();

    let mut data = Vec::with_capacity(w as usize * h as usize);
    for dy in 0..u64::from(h) {
        let row = pix.row_data((dy * src_h / u64::from(h)) as u32);
        data.extend(xmap.iter().map(|&sx| row[sx as usize]));
    }
    Ok(Pix::from_raw(w, h, pix.depth(), data)?)
}
