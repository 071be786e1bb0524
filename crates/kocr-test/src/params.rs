//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use kocr_core::{ImageFormat, Pix};
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare values only (default)
    #[default]
    Compare,
    /// Also write intermediate images for inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index and every failure,
/// so a single test function can check many values and report them all.
pub struct RegParams {
    /// Name of the test (e.g., "contour")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if values match within `delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Check a boolean condition, recording `what` on failure
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            let msg = format!(
                "Failure in {}_reg: check for index {} failed: {}",
                self.test_name, self.index, what
            );
            self.record_failure(msg);
        }
        condition
    }

    /// Compare two images for exact equality
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.index += 1;

        if !pix1.sizes_equal(pix2) || pix1.depth() != pix2.depth() {
            let msg = format!(
                "Failure in {}_reg: pix comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            self.record_failure(msg);
            return false;
        }

        let width = pix1.width();
        if let Some(pos) = pix1
            .data()
            .iter()
            .zip(pix2.data())
            .position(|(a, b)| a != b)
        {
            let (x, y) = (pos as u32 % width, pos as u32 / width);
            let msg = format!(
                "Failure in {}_reg: pix comparison for index {} - pixel mismatch at ({}, {})",
                self.test_name, self.index, x, y
            );
            self.record_failure(msg);
            return false;
        }

        true
    }

    /// Compare two byte strings
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let first_diff = data1
                .iter()
                .zip(data2)
                .position(|(a, b)| a != b)
                .unwrap_or(data1.len().min(data2.len()));
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}, first difference at byte {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len(),
                first_diff
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Write an image to the regout directory when in display mode
    ///
    /// Does nothing in compare mode.
    pub fn write_pix(&mut self, pix: &Pix, label: &str) -> TestResult<()> {
        if !self.display() {
            return Ok(());
        }
        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = dir.join(format!("{}.{:02}.{}.png", self.test_name, self.index, label));
        kocr_io::write_image(pix, &path, ImageFormat::Png).map_err(|e| TestError::ImageWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        eprintln!("Wrote: {}", path.display());
        Ok(())
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kocr_core::PixelDepth;

    #[test]
    fn test_compare_values_records_failure() {
        let mut rp = RegParams::new("params_self");
        assert!(rp.compare_values(1.0, 1.05, 0.1));
        assert!(!rp.compare_values(1.0, 2.0, 0.1));
        assert!(!rp.compare_values(1.0, f64::NAN, 0.1));
        assert_eq!(rp.index(), 3);
        assert_eq!(rp.failures().len(), 2);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_pix_and_strings() {
        let mut rp = RegParams::new("params_pix");
        let a = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        let mut bm = a.to_mut();
        bm.set_pixel(2, 1, 5).unwrap();
        let b: Pix = bm.into();
        assert!(rp.compare_pix(&a, &a.clone()));
        assert!(!rp.compare_pix(&a, &b));
        assert!(rp.failures()[0].contains("(2, 1)"));
        assert!(rp.compare_strings(b"abc", b"abc"));
        assert!(!rp.compare_strings(b"abc", b"abd"));
        assert!(rp.check(true, "always"));
        assert!(!rp.is_success());
    }
}
