//! Database construction from a training list

use crate::database::{FeatureDatabase, Sample};
use crate::feature::{FeatureBuilder, FeatureGrid};
use crate::listfile::{SampleSources, TrainingList};
use crate::{RecogError, RecogOptions, RecogResult};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts of one training run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainingReport {
    /// Lines in the list
    pub found: usize,
    /// Samples packed into the database
    pub extracted: usize,
    /// Lines without a class or whose image failed extraction
    pub skipped: usize,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images found, {} extracted, {} skipped",
            self.found, self.extracted, self.skipped
        )
    }
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    pub database: FeatureDatabase,
    pub report: TrainingReport,
    pub sources: SampleSources,
}

/// Load an image file and extract its feature grid
///
/// A file that cannot be read or decoded yields
/// [`RecogError::ImageLoadFailed`].
pub fn extract_file<P: AsRef<Path>>(path: P, builder: &FeatureBuilder) -> RecogResult<FeatureGrid> {
    let path = path.as_ref();
    let pix = kocr_io::read_image(path).map_err(|e| RecogError::ImageLoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    builder.extract_glyph(&pix)
}

/// Build a database from a list file
///
/// # Errors
///
/// Fails if the list cannot be read or is malformed, or if no sample
/// could be extracted ([`RecogError::EmptyDatabase`]). Individual samples
/// that fail extraction are skipped and counted.
pub fn train<P: AsRef<Path>>(list_path: P, options: &RecogOptions) -> RecogResult<TrainingOutput> {
    let list = TrainingList::read(list_path.as_ref())?;
    train_list(&list, options)
}

/// Build a database from an already parsed list
pub fn train_list(list: &TrainingList, options: &RecogOptions) -> RecogResult<TrainingOutput> {
    options.validate()?;
    let builder = FeatureBuilder::new(options.clone());
    let (samples, sources, report) = extract_entries(list, &builder)?;
    if samples.is_empty() {
        return Err(RecogError::EmptyDatabase);
    }

    Ok(TrainingOutput {
        database: FeatureDatabase::from_samples(&samples)?,
        report,
        sources,
    })
}

/// Source lines of the samples [`train_list`] packs from `list`
///
/// Every entry is extracted again, so entries skipped during training are
/// skipped here too and index `n` names the line of database sample `n`.
pub fn packed_sources(list: &TrainingList, options: &RecogOptions) -> RecogResult<SampleSources> {
    options.validate()?;
    let builder = FeatureBuilder::new(options.clone());
    let (_, sources, _) = extract_entries(list, &builder)?;
    Ok(sources)
}

fn extract_entries(
    list: &TrainingList,
    builder: &FeatureBuilder,
) -> RecogResult<(Vec<Sample>, SampleSources, TrainingReport)> {
    info!(found = list.len(), "extracting features");

    let mut samples = Vec::with_capacity(list.len());
    let mut sources = SampleSources::default();
    let mut report = TrainingReport {
        found: list.len(),
        ..Default::default()
    };

    for entry in list.entries() {
        let Some(class) = entry.class else {
            warn!(line = entry.line_no, text = %entry.line, "no class label; skipped");
            report.skipped += 1;
            continue;
        };
        match extract_file(&entry.path, builder) {
            Ok(grid) => {
                debug!(line = entry.line_no, class = %char::from(class), "extracted");
                samples.push(Sample::new(class, grid));
                sources.push(entry.line.clone());
            }
            Err(e) if e.is_extraction_failure() => {
                warn!(line = entry.line_no, path = %entry.path.display(), error = %e, "skipped");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    report.extracted = samples.len();
    info!(
        extracted = report.extracted,
        found = report.found,
        "extraction completed"
    );
    Ok((samples, sources, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = TrainingReport {
            found: 5,
            extracted: 3,
            skipped: 2,
        };
        assert_eq!(report.to_string(), "5 images found, 3 extracted, 2 skipped");
    }

    #[test]
    fn test_unreadable_images_are_skipped() {
        let list = TrainingList::parse(b"a-missing.png\nnoclass\n", "/nonexistent/kocr").unwrap();
        let err = train_list(&list, &RecogOptions::default()).unwrap_err();
        assert!(matches!(err, RecogError::EmptyDatabase));
        let sources = packed_sources(&list, &RecogOptions::default()).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_extract_file_reports_load_failure() {
        let err = extract_file("/nonexistent/kocr/x.png", &FeatureBuilder::default()).unwrap_err();
        assert!(matches!(err, RecogError::ImageLoadFailed { .. }));
        assert!(err.is_extraction_failure());
    }
}
