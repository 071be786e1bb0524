//! Database quality audits
//!
//! All audits treat the database as read-only. [`exclude`] only reports
//! which samples it would drop; [`FeatureDatabase::subset`] builds the
//! reduced database when one is wanted.

use crate::database::FeatureDatabase;
use crate::feature::{DIRECTIONS, Dirp, FeatureGrid, GRID_SIZE};
use crate::listfile::SampleSources;
use crate::matcher::{distance, nearest_where};
use crate::{RecogError, RecogResult};
use kocr_core::{Pix, PixelDepth};
use kocr_io::ImageFormat;
use kocr_transform::scale_by_sampling;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `%g`-style formatting: six significant digits, trailing zeros dropped
fn general(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Correct-over-total tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecogRate {
    pub correct: usize,
    pub total: usize,
}

impl RecogRate {
    /// Fraction correct; 0 for an empty tally
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

impl fmt::Display for RecogRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recog-rate = {} (= {} / {} )",
            general(self.rate()),
            self.correct,
            self.total
        )
    }
}

/// A sample whose nearest other sample has a different class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss {
    /// 1-based running count of misses
    pub ordinal: usize,
    pub index: usize,
    pub label: u8,
    pub neighbor: usize,
    pub neighbor_label: u8,
}

/// Outcome of [`leave_one_out`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeaveOneOutReport {
    pub total: usize,
    pub correct: usize,
    pub misses: Vec<Miss>,
}

impl LeaveOneOutReport {
    pub fn rate(&self) -> f64 {
        self.tally().rate()
    }

    pub fn tally(&self) -> RecogRate {
        RecogRate {
            correct: self.correct,
            total: self.total,
        }
    }
}

impl fmt::Display for LeaveOneOutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tally().fmt(f)
    }
}

/// Classify every sample against all the others
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] for fewer than two samples.
pub fn leave_one_out(db: &FeatureDatabase) -> RecogResult<LeaveOneOutReport> {
    if db.len() < 2 {
        return Err(RecogError::InvalidParameter(format!(
            "leave-one-out needs at least two samples, have {}",
            db.len()
        )));
    }
    let mut report = LeaveOneOutReport {
        total: db.len(),
        ..Default::default()
    };
    for n in 0..db.len() {
        let Some((m, _)) = nearest_where(db, db.grid(n), |m| m != n) else {
            continue;
        };
        if db.label(m) == db.label(n) {
            report.correct += 1;
        } else {
            let miss = Miss {
                ordinal: report.misses.len() + 1,
                index: n,
                label: db.label(n),
                neighbor: m,
                neighbor_label: db.label(m),
            };
            debug!(?miss, "leave-one-out miss");
            report.misses.push(miss);
        }
    }
    Ok(report)
}

/// File name for a rendered miss: `err-{k}-{class}-{n}-{nnclass}-{m}.png`
pub fn miss_file_name(miss: &Miss) -> String {
    format!(
        "err-{}-{}-{}-{}-{}.png",
        miss.ordinal,
        char::from(miss.label),
        miss.index,
        char::from(miss.neighbor_label),
        miss.neighbor
    )
}

/// The sample's and the neighbor's intensity grids side by side
///
/// The image is `32 x 16` before being enlarged by `zoom`.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if either index of `miss` is
/// outside `db`.
pub fn render_miss_pair(db: &FeatureDatabase, miss: &Miss, zoom: u32) -> RecogResult<Pix> {
    if miss.index >= db.len() || miss.neighbor >= db.len() {
        return Err(RecogError::InvalidParameter(format!(
            "miss {} -> {} outside a database of {} samples",
            miss.index,
            miss.neighbor,
            db.len()
        )));
    }
    let left = db.grid(miss.index).intensity_image()?;
    let right = db.grid(miss.neighbor).intensity_image()?;
    let g = GRID_SIZE;
    let mut data = Vec::with_capacity(2 * g * g);
    for y in 0..g as u32 {
        data.extend_from_slice(left.row_data(y));
        data.extend_from_slice(right.row_data(y));
    }
    let pair = Pix::from_raw(2 * g as u32, g as u32, PixelDepth::Bit8, data)?;
    if zoom > 1 {
        Ok(scale_by_sampling(&pair, zoom as f32, zoom as f32)?)
    } else {
        Ok(pair)
    }
}

/// Write every miss of a report as a PNG into `dir`
///
/// Returns the written paths in miss order.
pub fn write_misses<P: AsRef<Path>>(
    db: &FeatureDatabase,
    report: &LeaveOneOutReport,
    dir: P,
    zoom: u32,
) -> RecogResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(report.misses.len());
    for miss in &report.misses {
        let path = dir.join(miss_file_name(miss));
        let pix = render_miss_pair(db, miss, zoom)?;
        kocr_io::write_image(&pix, &path, ImageFormat::Png)?;
        debug!(path = %path.display(), "miss image written");
        written.push(path);
    }
    Ok(written)
}

/// Outcome of [`exclude`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExcludeReport {
    /// Dropped sample indices, in the order they were dropped
    pub removed: Vec<usize>,
    /// Source lines of the dropped samples
    pub lines: Vec<String>,
    /// Indices that survived, ascending
    pub survivors: Vec<usize>,
    /// Tally of the final, miss-free pass over the whole database
    pub rate: RecogRate,
}

impl fmt::Display for ExcludeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Drop misclassified samples until leave-one-out has no miss left
///
/// Within a pass a dropped sample stops being a neighbor immediately.
/// A sample left without any neighbor is kept.
pub fn exclude(db: &FeatureDatabase, sources: &SampleSources) -> ExcludeReport {
    let n_items = db.len();
    let mut deleted = vec![false; n_items];
    let mut report = ExcludeReport::default();

    loop {
        let mut correct = 0;
        let mut misses = 0;
        for n in 0..n_items {
            if deleted[n] {
                continue;
            }
            let neighbor = nearest_where(db, db.grid(n), |m| m != n && !deleted[m]);
            match neighbor {
                Some((m, _)) if db.label(m) != db.label(n) => {
                    misses += 1;
                    deleted[n] = true;
                    debug!(index = n, neighbor = m, "excluded");
                    report.removed.push(n);
                    report.lines.push(sources.line(n).into_owned());
                }
                _ => correct += 1,
            }
        }
        if misses == 0 {
            report.rate = RecogRate {
                correct,
                total: n_items,
            };
            break;
        }
    }

    report.survivors = (0..n_items).filter(|&n| !deleted[n]).collect();
    report
}

/// Nearest sample of another class
#[derive(Debug, Clone, PartialEq)]
pub struct StrangerEntry {
    pub index: usize,
    pub label: u8,
    /// `(index, label, distance)` of the nearest stranger, if any exists
    pub stranger: Option<(usize, u8, f64)>,
    pub line: String,
}

/// Outcome of [`distance_to_nearest_stranger`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrangerReport {
    pub entries: Vec<StrangerEntry>,
}

impl fmt::Display for StrangerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            match e.stranger {
                Some((_, label, dist)) => {
                    writeln!(f, "{:4.1}\t{}\t{}", dist, char::from(label), e.line)?
                }
                None => writeln!(f, "{:>4}\t-\t{}", "-", e.line)?,
            }
        }
        Ok(())
    }
}

/// Distance from every sample to the nearest sample of a different class
pub fn distance_to_nearest_stranger(db: &FeatureDatabase, sources: &SampleSources) -> StrangerReport {
    let entries = (0..db.len())
        .map(|n| {
            let label = db.label(n);
            let stranger = nearest_where(db, db.grid(n), |m| db.label(m) != label)
                .map(|(m, d)| (m, db.label(m), d));
            StrangerEntry {
                index: n,
                label,
                stranger,
                line: sources.line(n).into_owned(),
            }
        })
        .collect();
    StrangerReport { entries }
}

/// Element-wise mean of a class's orientation bytes, truncated
///
/// Intensity bytes of the mean are 0. Returns `None` for an absent class.
pub fn class_mean(db: &FeatureDatabase, label: u8) -> Option<FeatureGrid> {
    let mut sums = [[[0u32; DIRECTIONS]; GRID_SIZE]; GRID_SIZE];
    let mut count = 0u32;
    for (_, grid) in db.iter().filter(|(l, _)| *l == label) {
        count += 1;
        for (x, col) in sums.iter_mut().enumerate() {
            for (y, cell) in col.iter_mut().enumerate() {
                let d = grid.cell(x, y).d;
                for (acc, v) in cell.iter_mut().zip(d) {
                    *acc += u32::from(v);
                }
            }
        }
    }
    if count == 0 {
        return None;
    }
    let mut mean = FeatureGrid::new();
    for (x, col) in sums.iter().enumerate() {
        for (y, cell) in col.iter().enumerate() {
            let d = cell.map(|s| (s / count) as u8);
            mean.set_cell(x, y, Dirp { intensity: 0, d });
        }
    }
    Some(mean)
}

/// Distance from a sample to its class mean
#[derive(Debug, Clone, PartialEq)]
pub struct AverageEntry {
    pub index: usize,
    pub label: u8,
    pub distance: f64,
    pub line: String,
}

/// Outcome of [`average_feature_distance`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AverageReport {
    pub entries: Vec<AverageEntry>,
}

impl fmt::Display for AverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            writeln!(f, "{:4.1}\t{}\t{}", e.distance, char::from(e.label), e.line)?;
        }
        Ok(())
    }
}

/// Distance of every sample to its class mean, grouped by class byte
pub fn average_feature_distance(db: &FeatureDatabase, sources: &SampleSources) -> AverageReport {
    let mut by_class: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (n, &label) in db.labels().iter().enumerate() {
        by_class.entry(label).or_default().push(n);
    }

    let mut entries = Vec::with_capacity(db.len());
    for (label, members) in by_class {
        let Some(mean) = class_mean(db, label) else {
            continue;
        };
        for n in members {
            entries.push(AverageEntry {
                index: n,
                label,
                distance: distance(mean.view(), db.grid(n)),
                line: sources.line(n).into_owned(),
            });
        }
    }
    AverageReport { entries }
}
