//! kocr-recog - Directional-feature glyph recognition
//!
//! Recognizes single characters (kana, digits, symbols) and short
//! horizontal strings of them by nearest-neighbor search over a database of
//! directional-histogram features.
//!
//! # Pipeline
//!
//! 1. [`segment`]: split a strip into glyph column ranges
//! 2. [`preprocess`]: binarize, drop ruled lines, crop, pad and resample to
//!    a 64x64 canvas
//! 3. [`contour`]: trace the boundaries of the canvas
//! 4. [`feature`]: bin contour tangents into a 16x16x4 histogram, blur,
//!    equalize and attach the blurred ink intensity
//! 5. [`matcher`]: Euclidean nearest neighbor against a [`database`]
//!
//! [`train`] builds a database from a list file, [`audit`] checks its
//! quality and [`evaluate`] measures accuracy on a directory of images.
//!
//! Inside the pipeline images are 8-bpp with ink [`FOREGROUND`] (0) on
//! [`BACKGROUND`] (255).
//!
//! # Example
//!
//! ```no_run
//! use kocr_recog::{RecogOptions, matcher::NearestNeighbor, recognize::recognize_file, train};
//!
//! let options = RecogOptions::default();
//! let trained = train::train("chars/list.lst", &options).unwrap();
//! println!("{}", trained.report);
//! let model = NearestNeighbor::new(trained.database);
//! let result = recognize_file(&model, "query.png", &options).unwrap();
//! println!("{result}");
//! ```

pub mod audit;
pub mod contour;
pub mod database;
pub mod error;
pub mod evaluate;
pub mod feature;
pub mod listfile;
pub mod matcher;
pub mod options;
pub mod preprocess;
pub mod recognize;
pub mod segment;
pub mod train;

pub use error::{RecogError, RecogResult};
pub use options::RecogOptions;

pub use audit::{LeaveOneOutReport, RecogRate, exclude, leave_one_out};
pub use database::{FeatureDatabase, Sample, is_valid_database};
pub use evaluate::{ConfusionMatrix, evaluate_directory};
pub use feature::{FeatureBuilder, FeatureGrid};
pub use listfile::{SampleSources, TrainingList};
pub use matcher::{Classifier, Match, NearestNeighbor};
pub use recognize::{Recognition, recognize_file, recognize_image};
pub use train::{TrainingOutput, TrainingReport};

/// Side of the normalized glyph canvas
pub const CANVAS_SIZE: u32 = 64;

/// Ink value inside the pipeline
pub const FOREGROUND: u8 = 0;

/// Paper value inside the pipeline
pub const BACKGROUND: u8 = 255;
