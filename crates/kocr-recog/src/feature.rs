//! Directional-edge features
//!
//! A glyph's feature is a 16x16 grid of [`Dirp`] cells: four edge
//! orientation strengths plus one intensity byte per cell.
//!
//! # Algorithm
//!
//! Directional sub-pipeline:
//!
//! 1. For every contour point the tangent is estimated from the points
//!    [`SMOOTHING_STEP`] places ahead of and behind it, folded into
//!    `[0, pi)` and quantized to 8 directions; direction `d` belongs to
//!    orientation `nu = d / 2`. Odd directions add 2 to their orientation,
//!    even directions add 1 to `nu` and 1 to `(nu + 1) mod 4`.
//! 2. Each orientation plane is convolved with [`DIRECTION_KERNEL`]
//!    (radius 4). Near the grid edge the result is scaled by
//!    `full_weight / in_bounds_weight`.
//! 3. All 1024 blurred values are ranked (cells x-major, then y, then
//!    orientation, stable on ties) and rank `r` becomes level `r / 4`.
//!
//! Intensity sub-pipeline:
//!
//! 1. Foreground pixels are counted per 4x4 canvas block; more than 2 gives
//!    255, otherwise 0.
//! 2. The 16x16 plane is convolved with [`INTENSITY_KERNEL`] and divided
//!    by the in-bounds weight; the value is truncated to a byte.

use crate::contour::{Contour, trace_contours};
use crate::preprocess::normalize_glyph;
use crate::{CANVAS_SIZE, FOREGROUND, RecogError, RecogOptions, RecogResult};
use kocr_core::{Pix, PixelDepth};
use std::f64::consts::PI;
use std::fmt;
use tracing::trace;

/// Cells per grid side
pub const GRID_SIZE: usize = 16;
/// Orientation channels per cell
pub const DIRECTIONS: usize = 4;
/// Contour offset used to estimate the tangent
pub const SMOOTHING_STEP: isize = 3;
/// Serialized bytes per cell: `I, d0, d1, d2, d3`
pub const CELL_BYTES: usize = 1 + DIRECTIONS;
/// Serialized bytes per grid
pub const GRID_BYTES: usize = GRID_SIZE * GRID_SIZE * CELL_BYTES;

/// Number of output levels of the rank equalization
const LEVELS: usize = 256;

/// One orientation plane per channel, indexed `[nu][x][y]`
pub type Channels<T> = [[[T; GRID_SIZE]; GRID_SIZE]; DIRECTIONS];

/// A single plane indexed `[x][y]`
pub type Plane<T> = [[T; GRID_SIZE]; GRID_SIZE];

/// Gaussian, variance 4, not normalized; indexed by `[|i|][|j|]`
pub const DIRECTION_KERNEL: [[f64; 5]; 5] = [
    [1.0000, 0.8825, 0.6065, 0.3247, 0.1353],
    [0.8825, 0.7788, 0.5353, 0.2865, 0.1194],
    [0.6065, 0.5353, 0.3679, 0.1969, 0.0821],
    [0.3247, 0.2865, 0.1969, 0.1054, 0.0439],
    [0.1353, 0.1194, 0.0821, 0.0439, 0.0183],
];

/// Gaussian, variance 2; indexed by `[|i|][|j|]`
pub const INTENSITY_KERNEL: [[f64; 5]; 5] = [
    [0.28209, 0.21970, 0.10378, 0.02973, 0.00517],
    [0.21970, 0.17110, 0.08082, 0.02316, 0.00402],
    [0.10378, 0.08082, 0.03818, 0.01094, 0.00190],
    [0.02973, 0.02316, 0.01094, 0.00313, 0.00054],
    [0.00517, 0.00402, 0.00190, 0.00054, 0.00009],
];

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dirp {
    /// Blurred intensity
    pub intensity: u8,
    /// Equalized orientation strengths
    pub d: [u8; DIRECTIONS],
}

#[inline]
fn cell_offset(x: usize, y: usize) -> usize {
    (x * GRID_SIZE + y) * CELL_BYTES
}

/// An owned feature grid in its serialized layout
#[derive(Clone, PartialEq, Eq)]
pub struct FeatureGrid {
    bytes: [u8; GRID_BYTES],
}

impl Default for FeatureGrid {
    fn default() -> Self {
        Self {
            bytes: [0; GRID_BYTES],
        }
    }
}

impl fmt::Debug for FeatureGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureGrid")
            .field("cell(0, 0)", &self.cell(0, 0))
            .finish_non_exhaustive()
    }
}

impl FeatureGrid {
    /// An all-zero grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a grid out of its serialized bytes
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] unless `bytes` is exactly
    /// [`GRID_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> RecogResult<Self> {
        let bytes: [u8; GRID_BYTES] = bytes.try_into().map_err(|_| {
            RecogError::InvalidParameter(format!(
                "feature grid needs {GRID_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Serialized bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cell at `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> Dirp {
        self.view().cell(x, y)
    }

    /// Overwrite the cell at `(x, y)`
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Dirp) {
        let o = cell_offset(x, y);
        self.bytes[o] = cell.intensity;
        self.bytes[o + 1..o + CELL_BYTES].copy_from_slice(&cell.d);
    }

    /// Borrow as a view
    pub fn view(&self) -> GridView<'_> {
        GridView { bytes: &self.bytes }
    }
}

/// A borrowed feature grid, e.g. one slot of a database blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView<'a> {
    bytes: &'a [u8],
}

impl<'a> GridView<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), GRID_BYTES);
        Self { bytes }
    }

    /// Serialized bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Cell at `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> Dirp {
        let o = cell_offset(x, y);
        let mut d = [0u8; DIRECTIONS];
        d.copy_from_slice(&self.bytes[o + 1..o + CELL_BYTES]);
        Dirp {
            intensity: self.bytes[o],
            d,
        }
    }

    /// Cells in serialized order, each as `[I, d0, d1, d2, d3]`
    pub fn cells(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.bytes.chunks_exact(CELL_BYTES)
    }

    /// Copy into an owned grid
    pub fn to_grid(&self) -> FeatureGrid {
        let mut grid = FeatureGrid::new();
        grid.bytes.copy_from_slice(self.bytes);
        grid
    }

    /// Intensity plane as a 16x16 8-bpp image, `(x, y)` at pixel `(x, y)`
    pub fn intensity_image(&self) -> RecogResult<Pix> {
        let mut data = vec![0u8; GRID_SIZE * GRID_SIZE];
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                data[y * GRID_SIZE + x] = self.bytes[cell_offset(x, y)];
            }
        }
        Ok(Pix::from_raw(
            GRID_SIZE as u32,
            GRID_SIZE as u32,
            PixelDepth::Bit8,
            data,
        )?)
    }
}

/// Quantized tangent direction (0..8) at point `l` of a contour
fn tangent_direction(contour: &Contour, l: usize) -> usize {
    let p1 = contour.cyclic(l as isize + SMOOTHING_STEP);
    let p2 = contour.cyclic(l as isize - SMOOTHING_STEP);
    let mut theta = f64::atan2(f64::from(p2.x - p1.x), f64::from(p2.y - p1.y));
    if theta.abs() == PI {
        theta = 0.0;
    }
    if theta < 0.0 {
        theta += PI;
    }
    ((8.0 * theta / PI + 0.5).floor() as usize) % 8
}

fn grid_cell(coord: i32) -> usize {
    (coord as usize * GRID_SIZE) / CANVAS_SIZE as usize
}

/// Accumulate contour tangents into per-cell orientation counts
pub fn directional_histogram(contours: &[Contour]) -> Channels<u32> {
    let mut pattern = [[[0u32; GRID_SIZE]; GRID_SIZE]; DIRECTIONS];
    for contour in contours {
        for (l, p) in contour.points().iter().enumerate() {
            let d = tangent_direction(contour, l);
            let nu = d / 2;
            let (x, y) = (grid_cell(p.x), grid_cell(p.y));
            if d % 2 == 1 {
                pattern[nu][x][y] += 2;
            } else {
                pattern[nu][x][y] += 1;
                pattern[(nu + 1) % DIRECTIONS][x][y] += 1;
            }
        }
    }
    pattern
}

fn kernel_weight(kernel: &[[f64; 5]; 5]) -> f64 {
    let mut total = 0.0;
    for i in -4i32..=4 {
        for j in -4i32..=4 {
            total += kernel[i.unsigned_abs() as usize][j.unsigned_abs() as usize];
        }
    }
    total
}

/// Weighted sum over the in-bounds kernel window, and that window's weight
fn convolve_at<F>(x: usize, y: usize, kernel: &[[f64; 5]; 5], value: F) -> (f64, f64)
where
    F: Fn(usize, usize) -> f64,
{
    let mut sum = 0.0;
    let mut weight = 0.0;
    for i in -4i32..=4 {
        let xi = x as i32 + i;
        if xi < 0 || xi >= GRID_SIZE as i32 {
            continue;
        }
        for j in -4i32..=4 {
            let yj = y as i32 + j;
            if yj < 0 || yj >= GRID_SIZE as i32 {
                continue;
            }
            let g = kernel[i.unsigned_abs() as usize][j.unsigned_abs() as usize];
            sum += value(xi as usize, yj as usize) * g;
            weight += g;
        }
    }
    (sum, weight)
}

/// Blur each orientation plane, compensating for weight lost at the edge
pub fn blur_directions(pattern: &Channels<u32>) -> Channels<f64> {
    let total = kernel_weight(&DIRECTION_KERNEL);
    let mut blurred = [[[0.0f64; GRID_SIZE]; GRID_SIZE]; DIRECTIONS];
    for (plane, out) in pattern.iter().zip(blurred.iter_mut()) {
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                let (sum, weight) =
                    convolve_at(x, y, &DIRECTION_KERNEL, |i, j| f64::from(plane[i][j]));
                out[x][y] = sum * total / weight;
            }
        }
    }
    blurred
}

/// Rank-equalize all blurred orientation values into 256 levels
pub fn equalize(blurred: &Channels<f64>) -> Channels<u8> {
    let mut ranked = Vec::with_capacity(GRID_SIZE * GRID_SIZE * DIRECTIONS);
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            for (nu, plane) in blurred.iter().enumerate() {
                ranked.push((plane[x][y], x, y, nu));
            }
        }
    }
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let step = ranked.len() / LEVELS;
    let mut levels = [[[0u8; GRID_SIZE]; GRID_SIZE]; DIRECTIONS];
    for (rank, &(_, x, y, nu)) in ranked.iter().enumerate() {
        levels[nu][x][y] = (rank / step) as u8;
    }
    levels
}

/// Per-cell ink presence: 255 when a 4x4 block has more than 2 FG pixels
pub fn intensity_histogram(canvas: &Pix) -> Plane<u8> {
    let mut counts = [[0u32; GRID_SIZE]; GRID_SIZE];
    for y in 0..canvas.height() {
        let j = grid_cell(y as i32);
        for (x, &v) in canvas.row_data(y).iter().enumerate() {
            if v == FOREGROUND {
                counts[grid_cell(x as i32)][j] += 1;
            }
        }
    }
    counts.map(|col| col.map(|n| if n > 2 { 255 } else { 0 }))
}

/// Blur the intensity plane, normalized by the in-bounds weight
pub fn blur_intensity(plane: &Plane<u8>) -> Plane<u8> {
    let mut out = [[0u8; GRID_SIZE]; GRID_SIZE];
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            let (sum, weight) =
                convolve_at(x, y, &INTENSITY_KERNEL, |i, j| f64::from(plane[i][j]));
            out[x][y] = (sum / weight).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Intermediate planes of one extraction
#[derive(Debug, Clone)]
struct ExtractionContext {
    pattern: Channels<u32>,
    blurred: Channels<f64>,
    levels: Channels<u8>,
    intensity: Plane<u8>,
}

impl ExtractionContext {
    fn run(canvas: &Pix, max_contours: usize) -> RecogResult<Self> {
        let contours = trace_contours(canvas, max_contours)?;
        let pattern = directional_histogram(&contours);
        let blurred = blur_directions(&pattern);
        let levels = equalize(&blurred);
        let intensity = blur_intensity(&intensity_histogram(canvas));
        Ok(Self {
            pattern,
            blurred,
            levels,
            intensity,
        })
    }

    fn log_summary(&self) {
        let strokes: u32 = self.pattern.iter().flatten().flatten().sum();
        let peak = self
            .blurred
            .iter()
            .flatten()
            .flatten()
            .fold(0.0f64, |m, &v| m.max(v));
        trace!(strokes, peak, "directional pattern built");
    }

    fn into_grid(self) -> FeatureGrid {
        let mut grid = FeatureGrid::new();
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                let d = [0, 1, 2, 3].map(|nu| self.levels[nu][x][y]);
                grid.set_cell(
                    x,
                    y,
                    Dirp {
                        intensity: self.intensity[x][y],
                        d,
                    },
                );
            }
        }
        grid
    }
}

/// Builds feature grids from glyph images
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    options: RecogOptions,
}

impl FeatureBuilder {
    /// Create a builder with the given options
    pub fn new(options: RecogOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &RecogOptions {
        &self.options
    }

    /// Extract the feature grid of a normalized 64x64 canvas
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] for a canvas of the wrong
    /// size and [`RecogError::TooManyContours`] for an overly noisy one.
    pub fn extract(&self, canvas: &Pix) -> RecogResult<FeatureGrid> {
        if canvas.width() != CANVAS_SIZE || canvas.height() != CANVAS_SIZE {
            return Err(RecogError::InvalidParameter(format!(
                "canvas must be {CANVAS_SIZE}x{CANVAS_SIZE}, got {}x{}",
                canvas.width(),
                canvas.height()
            )));
        }
        let ctx = ExtractionContext::run(canvas, self.options.max_contours)?;
        ctx.log_summary();
        Ok(ctx.into_grid())
    }

    /// Preprocess a glyph image and extract its feature grid
    pub fn extract_glyph(&self, pix: &Pix) -> RecogResult<FeatureGrid> {
        let canvas = normalize_glyph(pix, &self.options)?;
        self.extract(&canvas)
    }
}
