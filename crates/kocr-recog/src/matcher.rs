//! Nearest-neighbor matching
//!
//! The distance between two grids is the Euclidean distance over the 1024
//! orientation bytes; the intensity bytes do not take part.

use crate::database::{FeatureDatabase, Sample};
use crate::feature::GridView;
use crate::{RecogError, RecogResult};

/// Euclidean distance between the orientation bytes of two grids
pub fn distance(a: GridView<'_>, b: GridView<'_>) -> f64 {
    let sum: u64 = a
        .cells()
        .zip(b.cells())
        .map(|(ca, cb)| {
            ca[1..]
                .iter()
                .zip(&cb[1..])
                .map(|(&x, &y)| {
                    let d = i64::from(x) - i64::from(y);
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum();
    (sum as f64).sqrt()
}

/// Result of a nearest-neighbor search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Class of the nearest sample
    pub label: u8,
    /// Database index of the nearest sample
    pub index: usize,
    /// Distance to it
    pub distance: f64,
    /// `1 - N * distance / sum_of_all_distances`; 0 when every distance is 0
    pub confidence: f64,
}

impl Match {
    /// The label as a character
    pub fn label_char(&self) -> char {
        char::from(self.label)
    }
}

/// Index and distance of the nearest sample accepted by `accept`
///
/// Ties keep the lower index. Returns `None` if no sample is accepted.
pub(crate) fn nearest_where<F>(
    db: &FeatureDatabase,
    query: GridView<'_>,
    mut accept: F,
) -> Option<(usize, f64)>
where
    F: FnMut(usize) -> bool,
{
    let mut best: Option<(usize, f64)> = None;
    for n in (0..db.len()).filter(|&n| accept(n)) {
        let d = distance(query, db.grid(n));
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((n, d));
        }
    }
    best
}

/// Linear scan for the nearest sample
///
/// # Errors
///
/// Returns [`RecogError::EmptyDatabase`] if there is nothing to match.
pub fn nearest(db: &FeatureDatabase, query: GridView<'_>) -> RecogResult<Match> {
    let mut total = 0.0;
    let mut best: Option<(usize, f64)> = None;
    for (n, (_, grid)) in db.iter().enumerate() {
        let d = distance(query, grid);
        total += d;
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((n, d));
        }
    }
    let (index, min) = best.ok_or(RecogError::EmptyDatabase)?;
    let confidence = if total > 0.0 {
        1.0 - db.len() as f64 * min / total
    } else {
        0.0
    };
    Ok(Match {
        label: db.label(index),
        index,
        distance: min,
        confidence,
    })
}

/// A trainable glyph classifier over feature grids
pub trait Classifier: Sized {
    /// Build a model from labeled samples
    fn train(samples: &[Sample]) -> RecogResult<Self>;

    /// Classify one grid
    fn classify(&self, grid: GridView<'_>) -> RecogResult<Match>;
}

/// Nearest-neighbor classification against a feature database
#[derive(Debug, Clone)]
pub struct NearestNeighbor {
    db: FeatureDatabase,
}

impl NearestNeighbor {
    pub fn new(db: FeatureDatabase) -> Self {
        Self { db }
    }

    /// The reference samples
    pub fn database(&self) -> &FeatureDatabase {
        &self.db
    }

    pub fn into_database(self) -> FeatureDatabase {
        self.db
    }
}

impl From<FeatureDatabase> for NearestNeighbor {
    fn from(db: FeatureDatabase) -> Self {
        Self::new(db)
    }
}

impl Classifier for NearestNeighbor {
    fn train(samples: &[Sample]) -> RecogResult<Self> {
        Ok(Self::new(FeatureDatabase::from_samples(samples)?))
    }

    fn classify(&self, grid: GridView<'_>) -> RecogResult<Match> {
        nearest(&self.db, grid)
    }
}
