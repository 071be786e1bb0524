//! Accuracy evaluation over a directory of labeled images

use crate::audit::RecogRate;
use crate::matcher::Classifier;
use crate::recognize::recognize_file;
use crate::{RecogOptions, RecogResult};
use kocr_io::ImageFormat;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Answer × predicted counts
///
/// Images that failed extraction are counted per answer in a separate
/// column and count against accuracy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: BTreeMap<(u8, u8), usize>,
    failures: BTreeMap<u8, usize>,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one recognized image
    pub fn record(&mut self, answer: u8, predicted: u8) {
        *self.counts.entry((answer, predicted)).or_default() += 1;
    }

    /// Count one image that produced no result
    pub fn record_failure(&mut self, answer: u8) {
        *self.failures.entry(answer).or_default() += 1;
    }

    pub fn count(&self, answer: u8, predicted: u8) -> usize {
        self.counts.get(&(answer, predicted)).copied().unwrap_or(0)
    }

    pub fn failures(&self, answer: u8) -> usize {
        self.failures.get(&answer).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.failures.values().sum::<usize>()
    }

    pub fn correct(&self) -> usize {
        self.counts
            .iter()
            .filter(|((a, p), _)| a == p)
            .map(|(_, &n)| n)
            .sum()
    }

    pub fn tally(&self) -> RecogRate {
        RecogRate {
            correct: self.correct(),
            total: self.total(),
        }
    }

    /// Fraction of images recognized as their answer
    pub fn accuracy(&self) -> f64 {
        self.tally().rate()
    }

    /// Every label seen as an answer or a prediction, ascending
    pub fn labels(&self) -> Vec<u8> {
        let mut set: BTreeSet<u8> = self.failures.keys().copied().collect();
        for &(a, p) in self.counts.keys() {
            set.insert(a);
            set.insert(p);
        }
        set.into_iter().collect()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        write!(f, "{:>4}", "")?;
        for &p in &labels {
            write!(f, " {:>4}", char::from(p))?;
        }
        writeln!(f, " {:>4}", "fail")?;
        for &a in &labels {
            write!(f, "{:>4}", char::from(a))?;
            for &p in &labels {
                write!(f, " {:>4}", self.count(a, p))?;
            }
            writeln!(f, " {:>4}", self.failures(a))?;
        }
        write!(f, "{}", self.tally())
    }
}

/// Recognize every image in `dir` and tabulate the results
///
/// The answer is the first character of each file name. Files whose
/// extension is not an image format are ignored. The first glyph of each
/// result is the prediction.
///
/// # Errors
///
/// Fails if the directory cannot be read or on any error other than a
/// per-glyph extraction failure.
pub fn evaluate_directory<C: Classifier, P: AsRef<Path>>(
    classifier: &C,
    dir: P,
    options: &RecogOptions,
) -> RecogResult<ConfusionMatrix> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ImageFormat::from_extension(e) != ImageFormat::Unknown);
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();

    let mut matrix = ConfusionMatrix::new();
    for path in &paths {
        let Some(answer) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.bytes().next())
        else {
            continue;
        };
        match recognize_file(classifier, path, options) {
            Ok(result) => {
                if let Some(glyph) = result.glyphs.first() {
                    debug!(
                        path = %path.display(),
                        answer = %char::from(answer),
                        predicted = %glyph.matched.label_char(),
                        "evaluated"
                    );
                    matrix.record(answer, glyph.matched.label);
                }
            }
            Err(e) if e.is_extraction_failure() => {
                warn!(path = %path.display(), error = %e, "no result");
                matrix.record_failure(answer);
            }
            Err(e) => return Err(e),
        }
    }
    info!(images = matrix.total(), correct = matrix.correct(), "evaluation completed");
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_accuracy() {
        let mut m = ConfusionMatrix::new();
        m.record(b'a', b'a');
        m.record(b'a', b'a');
        m.record(b'a', b'b');
        m.record_failure(b'b');
        assert_eq!(m.count(b'a', b'a'), 2);
        assert_eq!(m.count(b'a', b'b'), 1);
        assert_eq!(m.total(), 4);
        assert_eq!(m.correct(), 2);
        assert_eq!(m.accuracy(), 0.5);
        assert_eq!(m.labels(), vec![b'a', b'b']);
    }

    #[test]
    fn test_display_table() {
        let mut m = ConfusionMatrix::new();
        m.record(b'0', b'0');
        m.record(b'1', b'0');
        m.record_failure(b'1');
        let text = m.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "        0    1 fail");
        assert_eq!(lines[1], "   0    1    0    0");
        assert_eq!(lines[2], "   1    1    0    1");
        assert_eq!(lines[3], "Recog-rate = 0.333333 (= 1 / 3 )");
    }

    #[test]
    fn test_empty_matrix() {
        let m = ConfusionMatrix::new();
        assert_eq!(m.accuracy(), 0.0);
        assert!(m.labels().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let samples: Vec<crate::database::Sample> = Vec::new();
        let db = crate::matcher::NearestNeighbor::new(
            crate::database::FeatureDatabase::from_samples(&samples).unwrap(),
        );
        assert!(evaluate_directory(&db, "/nonexistent/kocr/dir", &RecogOptions::default()).is_err());
    }
}
