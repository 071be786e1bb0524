//! Connected component analysis
//!
//! Two-pass labeling with a Union-Find (disjoint set) table: the first
//! raster pass assigns provisional labels and records equivalences, the
//! second pass resolves each pixel to its root and renumbers roots in
//! order of first appearance.

use crate::error::{RegionError, RegionResult};
use kocr_core::{Box, Pix, PixelDepth};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Label of this component in its [`LabelMap`]
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Box,
}

impl ConnectedComponent {
    /// Create a new connected component
    pub fn new(label: u32, pixel_count: u32, bounds: Box) -> Self {
        Self {
            label,
            pixel_count,
            bounds,
        }
    }

    /// Ratio of the longer bounding-box side to the shorter one
    pub fn aspect_ratio(&self) -> f64 {
        self.bounds.aspect_ratio()
    }
}

/// Per-pixel component labels; 0 is background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u32>,
    count: u32,
}

impl LabelMap {
    pub(crate) fn from_parts(width: u32, height: u32, labels: Vec<u32>, count: u32) -> Self {
        Self {
            width,
            height,
            labels,
            count,
        }
    }

    /// Map width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of labels in use (labels run from 1 to `count`)
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Label at (x, y), `None` outside the map
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.labels[(y * self.width + x) as usize])
    }

    /// Raw labels, row-major
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Render one component as a 1-bpp mask
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidLabel`] if `label` is 0 or above
    /// [`LabelMap::count`].
    pub fn extract_component(&self, label: u32) -> RegionResult<Pix> {
        if label == 0 || label > self.count {
            return Err(RegionError::InvalidLabel {
                label,
                count: self.count,
            });
        }
        let data = self.labels.iter().map(|&l| u8::from(l == label)).collect();
        Ok(Pix::from_raw(self.width, self.height, PixelDepth::Bit1, data)?)
    }

    /// Accumulate pixel counts and bounds per label
    pub fn components(&self) -> Vec<ConnectedComponent> {
        // (count, min_x, min_y, max_x, max_y)
        let mut acc = vec![(0u32, i32::MAX, i32::MAX, i32::MIN, i32::MIN); self.count as usize];
        for y in 0..self.height {
            for x in 0..self.width {
                let label = self.labels[(y * self.width + x) as usize];
                if label > 0 {
                    let e = &mut acc[label as usize - 1];
                    e.0 += 1;
                    e.1 = e.1.min(x as i32);
                    e.2 = e.2.min(y as i32);
                    e.3 = e.3.max(x as i32);
                    e.4 = e.4.max(y as i32);
                }
            }
        }
        acc.into_iter()
            .enumerate()
            .filter(|(_, e)| e.0 > 0)
            .map(|(i, (count, x0, y0, x1, y1))| {
                ConnectedComponent::new(
                    i as u32 + 1,
                    count,
                    Box::from_inclusive_corners(x0, y0, x1, y1),
                )
            })
            .collect()
    }
}

/// Find all connected components in a binary image
///
/// Components are returned in label order, which is the raster order of
/// each component's first pixel.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    Ok(label_connected_components(pix, connectivity)?.components())
}

/// Label all connected components in a binary image
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] unless the image is 1 bpp.
pub fn label_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<LabelMap> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }

    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let src = pix.data();
    let mut provisional = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    for y in 0..h {
        for x in 0..w {
            if src[y * w + x] == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            let mut n = 0;
            let mut push = |label: u32| {
                if label > 0 {
                    neighbors[n] = label;
                    n += 1;
                }
            };
            if x > 0 {
                push(provisional[y * w + x - 1]);
            }
            if y > 0 {
                push(provisional[(y - 1) * w + x]);
                if connectivity == ConnectivityType::EightWay {
                    if x > 0 {
                        push(provisional[(y - 1) * w + x - 1]);
                    }
                    if x + 1 < w {
                        push(provisional[(y - 1) * w + x + 1]);
                    }
                }
            }

            provisional[y * w + x] = if n == 0 {
                uf.make_set()
            } else {
                let first = neighbors[0];
                for &other in &neighbors[1..n] {
                    uf.union(first, other);
                }
                first
            };
        }
    }

    // Resolve roots and renumber densely in order of first appearance
    let mut renumber = vec![0u32; uf.len() + 1];
    let mut count = 0;
    for label in provisional.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label) as usize;
        if renumber[root] == 0 {
            count += 1;
            renumber[root] = count;
        }
        *label = renumber[root];
    }

    Ok(LabelMap::from_parts(
        pix.width(),
        pix.height(),
        provisional,
        count,
    ))
}

/// Disjoint set over provisional labels 1..=n
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // index 0 is the background placeholder
        Self { parent: vec![0] }
    }

    fn len(&self) -> usize {
        self.parent.len() - 1
    }

    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grand = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grand;
            label = grand;
        }
        label
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // keep the smaller label as root
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}
