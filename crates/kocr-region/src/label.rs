//! Size-ordered labeling
//!
//! Relabels components so that label 1 is the largest region, label 2 the
//! next largest and so on. Components with equal pixel counts keep their
//! raster order. Components smaller than `min_size` are erased from the
//! map and do not appear in the component list.

use crate::conncomp::{ConnectedComponent, ConnectivityType, LabelMap, label_connected_components};
use crate::error::RegionResult;
use kocr_core::Pix;

/// Components ordered largest first, with a map using the same labels
#[derive(Debug, Clone)]
pub struct LabeledRegions {
    /// Per-pixel labels after renumbering
    pub map: LabelMap,
    /// Components in descending size order; `components[i].label == i + 1`
    pub components: Vec<ConnectedComponent>,
}

impl LabeledRegions {
    /// Number of kept components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when no component survived the size filter
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Label a 1-bpp image and order its components by size
///
/// # Arguments
///
/// * `pix` - Binary image, 1 = foreground
/// * `connectivity` - Neighborhood used to join pixels
/// * `min_size` - Components with fewer pixels are dropped
pub fn label_by_size(
    pix: &Pix,
    connectivity: ConnectivityType,
    min_size: u32,
) -> RegionResult<LabeledRegions> {
    let map = label_connected_components(pix, connectivity)?;
    let mut components = map.components();
    // stable sort keeps raster order among equal sizes
    components.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));
    components.retain(|c| c.pixel_count >= min_size);

    let mut renumber = vec![0u32; map.count() as usize + 1];
    for (i, comp) in components.iter_mut().enumerate() {
        renumber[comp.label as usize] = i as u32 + 1;
        comp.label = i as u32 + 1;
    }

    let labels = map
        .labels()
        .iter()
        .map(|&l| renumber[l as usize])
        .collect();
    let map = LabelMap::from_parts(map.width(), map.height(), labels, components.len() as u32);

    Ok(LabeledRegions { map, components })
}
