//! kocr-test - Regression test framework
//!
//! Provides [`RegParams`], which numbers and records every comparison a
//! regression test makes, and [`fixtures`], which draws synthetic glyph
//! images so tests need no binary assets.
//!
//! # Usage
//!
//! ```ignore
//! use kocr_test::RegParams;
//!
//! let mut rp = RegParams::new("segment");
//! rp.compare_values(3.0, glyphs.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display". Display mode also
//!   writes intermediate images to the regression output directory.

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::path::PathBuf;

/// Get the path to the workspace root
fn workspace_root() -> PathBuf {
    // kocr-test is at crates/kocr-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> PathBuf {
    workspace_root().join("target").join("regout")
}

/// Create a fresh scratch directory for one test under the regout directory
///
/// Any previous contents are removed.
pub fn scratch_dir(test_name: &str) -> TestResult<PathBuf> {
    let dir = regout_dir().join(test_name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    std::fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
