//! kocr-region - Connected component labeling
//!
//! Finds the connected foreground regions of a 1-bpp image (1 =
//! foreground) and reports each region's label, pixel count and bounding
//! box. [`label_by_size`] additionally renumbers the regions largest
//! first and drops regions below a minimum size, which is the view the
//! glyph preprocessor works from.
//!
//! # Example
//!
//! ```
//! use kocr_core::{Pix, PixelDepth};
//! use kocr_region::{ConnectivityType, find_connected_components};
//!
//! let mut pm = Pix::new(20, 20, PixelDepth::Bit1).unwrap().to_mut();
//! pm.set_pixel(1, 1, 1).unwrap();
//! pm.set_pixel(2, 2, 1).unwrap();
//! pm.set_pixel(10, 10, 1).unwrap();
//! let pix: Pix = pm.into();
//!
//! let four = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
//! let eight = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
//! assert_eq!(four.len(), 3);
//! assert_eq!(eight.len(), 2);
//! ```

pub mod conncomp;
pub mod error;
pub mod label;

pub use conncomp::{
    ConnectedComponent, ConnectivityType, LabelMap, find_connected_components,
    label_connected_components,
};
pub use error::{RegionError, RegionResult};
pub use label::{LabeledRegions, label_by_size};
