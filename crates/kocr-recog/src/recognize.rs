//! Image-level recognition
//!
//! # Algorithm
//!
//! A single-glyph image is normalized, reduced to a feature grid and
//! handed to a [`Classifier`]. A strip is first binarized and cropped to
//! its ink box; [`GlyphColumns`] then cuts it into glyphs and every glyph
//! goes through the single-glyph path. A failing glyph fails the whole
//! strip, so a returned string always holds one character per glyph.

use crate::feature::FeatureBuilder;
use crate::matcher::{Classifier, Match};
use crate::preprocess::binarize;
use crate::segment::{GlyphColumns, find_ink_bbox};
use crate::{RecogError, RecogOptions, RecogResult};
use kocr_core::Pix;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// One recognized glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMatch {
    /// Left edge of the glyph in the input image
    pub x: u32,
    /// Glyph width in columns
    pub width: u32,
    pub matched: Match,
}

/// Result of recognizing an image
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recognition {
    pub glyphs: Vec<GlyphMatch>,
}

impl Recognition {
    /// The recognized characters in reading order
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.matched.label_char()).collect()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl fmt::Display for Recognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Recognize an image holding exactly one glyph
///
/// # Errors
///
/// Extraction failures ([`RecogError::NoInkFound`] and friends) and
/// classifier errors are returned unchanged.
pub fn recognize_single<C: Classifier>(
    classifier: &C,
    pix: &Pix,
    options: &RecogOptions,
) -> RecogResult<Recognition> {
    options.validate()?;
    let builder = FeatureBuilder::new(options.clone());
    let grid = builder.extract_glyph(pix)?;
    let matched = classifier.classify(grid.view())?;
    debug!(
        label = %matched.label_char(),
        distance = matched.distance,
        confidence = matched.confidence,
        "recognized"
    );
    Ok(Recognition {
        glyphs: vec![GlyphMatch {
            x: 0,
            width: pix.width(),
            matched,
        }],
    })
}

/// Recognize a horizontal strip of glyphs
pub fn recognize_multi<C: Classifier>(
    classifier: &C,
    pix: &Pix,
    options: &RecogOptions,
) -> RecogResult<Recognition> {
    options.validate()?;
    let binary = binarize(pix, options.threshold)?;
    let bounds = find_ink_bbox(&binary);
    if bounds.is_empty() {
        return Err(RecogError::NoInkFound);
    }
    let body = binary.clip_box(&bounds)?;
    let builder = FeatureBuilder::new(options.clone());

    let mut glyphs = Vec::new();
    for column in GlyphColumns::new(&body, options.background_ratio_percent) {
        let column = column?;
        let grid = builder.extract_glyph(&column.image)?;
        let matched = classifier.classify(grid.view())?;
        debug!(
            seq = glyphs.len(),
            x = column.x,
            width = column.width,
            label = %matched.label_char(),
            distance = matched.distance,
            "recognized glyph"
        );
        glyphs.push(GlyphMatch {
            x: bounds.x as u32 + column.x,
            width: column.width,
            matched,
        });
    }

    if glyphs.is_empty() {
        return Err(RecogError::NoInkFound);
    }
    Ok(Recognition { glyphs })
}

/// Pick the single- or multi-glyph path from the image shape
///
/// Images with `width / height` (integer division) above
/// `multi_glyph_aspect_ratio` are treated as strips.
pub fn recognize_image<C: Classifier>(
    classifier: &C,
    pix: &Pix,
    options: &RecogOptions,
) -> RecogResult<Recognition> {
    if pix.width() / pix.height() > options.multi_glyph_aspect_ratio {
        recognize_multi(classifier, pix, options)
    } else {
        recognize_single(classifier, pix, options)
    }
}

/// Load an image file and recognize it
pub fn recognize_file<C: Classifier, P: AsRef<Path>>(
    classifier: &C,
    path: P,
    options: &RecogOptions,
) -> RecogResult<Recognition> {
    let path = path.as_ref();
    let pix = kocr_io::read_image(path).map_err(|e| RecogError::ImageLoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), width = pix.width(), height = pix.height(), "loaded");
    recognize_image(classifier, &pix, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{FeatureDatabase, Sample};
    use crate::matcher::NearestNeighbor;
    use kocr_core::PixelDepth;

    fn page(w: u32, h: u32, rects: &[(u32, u32, u32, u32)]) -> Pix {
        let mut pm = Pix::new_filled(w, h, PixelDepth::Bit8, 255).unwrap().to_mut();
        for &(x0, y0, rw, rh) in rects {
            for y in y0..y0 + rh {
                for x in x0..x0 + rw {
                    pm.set_pixel(x, y, 0).unwrap();
                }
            }
        }
        pm.into()
    }

    fn model() -> NearestNeighbor {
        let builder = FeatureBuilder::default();
        let bar = builder.extract_glyph(&page(40, 40, &[(17, 4, 6, 32)])).unwrap();
        let dash = builder.extract_glyph(&page(40, 40, &[(4, 17, 32, 6)])).unwrap();
        let samples = [Sample::new(b'|', bar), Sample::new(b'-', dash)];
        NearestNeighbor::new(FeatureDatabase::from_samples(&samples).unwrap())
    }

    #[test]
    fn test_single_glyph() {
        let model = model();
        let result =
            recognize_single(&model, &page(30, 30, &[(12, 3, 5, 24)]), &RecogOptions::default())
                .unwrap();
        assert_eq!(result.text(), "|");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_blank_image_has_no_ink() {
        let model = model();
        let blank = page(30, 30, &[]);
        let opts = RecogOptions::default();
        assert!(matches!(
            recognize_single(&model, &blank, &opts),
            Err(RecogError::NoInkFound)
        ));
        let strip = page(120, 30, &[]);
        assert!(matches!(
            recognize_image(&model, &strip, &opts),
            Err(RecogError::NoInkFound)
        ));
    }

    #[test]
    fn test_strip_dispatch() {
        let model = model();
        let strip = page(
            120,
            30,
            &[(10, 3, 5, 24), (40, 12, 24, 5), (90, 3, 5, 24)],
        );
        let result = recognize_image(&model, &strip, &RecogOptions::default()).unwrap();
        assert_eq!(result.to_string(), "|-|");
        let xs: Vec<u32> = result.glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![10, 40, 90]);
    }

    #[test]
    fn test_missing_file() {
        let err = recognize_file(&model(), "/nonexistent/kocr/q.png", &RecogOptions::default())
            .unwrap_err();
        assert!(matches!(err, RecogError::ImageLoadFailed { .. }));
    }
}
