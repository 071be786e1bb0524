//! Feature database
//!
//! The database is one contiguous blob, identical in memory and on disk:
//!
//! ```text
//! offset 0   u32 magic            DATABASE_MAGIC
//! offset 4   u32 count            N
//! offset 8   u32 feature_offset   16
//! offset 12  u32 class_offset     feature_offset + N * GRID_BYTES
//! feature_offset ..               N feature grids
//! class_offset ..                 N label bytes
//! ```
//!
//! All header integers are little-endian. Grids and labels are borrowed
//! straight out of the blob.

use crate::feature::{FeatureGrid, GRID_BYTES, GridView};
use crate::{RecogError, RecogResult};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Validity constant stored at offset 0
pub const DATABASE_MAGIC: u32 = 0xdead_beaf;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 16;

/// The fixed-layout header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseHeader {
    pub magic: u32,
    pub count: u32,
    pub feature_offset: u32,
    pub class_offset: u32,
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

impl DatabaseHeader {
    /// Header of a database holding `count` samples
    pub fn for_count(count: u32) -> Self {
        let feature_offset = HEADER_SIZE as u32;
        Self {
            magic: DATABASE_MAGIC,
            count,
            feature_offset,
            class_offset: feature_offset + count * GRID_BYTES as u32,
        }
    }

    /// Parse and check the magic number
    ///
    /// # Errors
    ///
    /// * [`RecogError::TruncatedDatabase`] if fewer than [`HEADER_SIZE`]
    ///   bytes are given.
    /// * [`RecogError::InvalidDatabaseMagic`] if the magic is wrong.
    pub fn parse(bytes: &[u8]) -> RecogResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(RecogError::TruncatedDatabase {
                needed: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let header = Self {
            magic: read_u32(bytes, 0),
            count: read_u32(bytes, 4),
            feature_offset: read_u32(bytes, 8),
            class_offset: read_u32(bytes, 12),
        };
        if header.magic != DATABASE_MAGIC {
            return Err(RecogError::InvalidDatabaseMagic {
                found: header.magic,
            });
        }
        Ok(header)
    }

    /// Serialized header
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        for (i, v) in [self.magic, self.count, self.feature_offset, self.class_offset]
            .into_iter()
            .enumerate()
        {
            out[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        out
    }

    /// Total blob size the header describes
    pub fn blob_len(&self) -> u64 {
        u64::from(self.class_offset) + u64::from(self.count)
    }

    fn check_layout(&self) -> RecogResult<()> {
        if self.feature_offset as usize != HEADER_SIZE {
            return Err(RecogError::InconsistentDatabase(format!(
                "feature offset {} does not follow the {HEADER_SIZE}-byte header",
                self.feature_offset
            )));
        }
        let expected =
            u64::from(self.feature_offset) + u64::from(self.count) * GRID_BYTES as u64;
        if u64::from(self.class_offset) != expected {
            return Err(RecogError::InconsistentDatabase(format!(
                "class offset {} but {} samples end at {}",
                self.class_offset, self.count, expected
            )));
        }
        Ok(())
    }
}

/// One labeled feature grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub label: u8,
    pub grid: FeatureGrid,
}

impl Sample {
    pub fn new(label: u8, grid: FeatureGrid) -> Self {
        Self { label, grid }
    }
}

/// An immutable set of labeled feature grids
#[derive(Clone, PartialEq, Eq)]
pub struct FeatureDatabase {
    header: DatabaseHeader,
    blob: Vec<u8>,
}

impl std::fmt::Debug for FeatureDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureDatabase")
            .field("header", &self.header)
            .field("bytes", &self.blob.len())
            .finish()
    }
}

impl FeatureDatabase {
    /// Pack samples in order
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] if the sample count does
    /// not fit the header.
    pub fn from_samples<'a, I>(samples: I) -> RecogResult<Self>
    where
        I: IntoIterator<Item = &'a Sample>,
        I::IntoIter: ExactSizeIterator,
    {
        let samples = samples.into_iter();
        let count = u32::try_from(samples.len())
            .ok()
            .filter(|&n| u64::from(n) * (GRID_BYTES as u64 + 1) < u64::from(u32::MAX))
            .ok_or_else(|| {
                RecogError::InvalidParameter(format!("{} samples is too many", samples.len()))
            })?;

        let header = DatabaseHeader::for_count(count);
        let mut blob = Vec::with_capacity(header.blob_len() as usize);
        blob.extend_from_slice(&header.to_bytes());
        let mut labels = Vec::with_capacity(count as usize);
        for sample in samples {
            blob.extend_from_slice(sample.grid.as_bytes());
            labels.push(sample.label);
        }
        blob.extend_from_slice(&labels);
        Ok(Self { header, blob })
    }

    /// Take ownership of a serialized database
    ///
    /// # Errors
    ///
    /// Fails on a wrong magic number, offsets that disagree with the item
    /// count, or a blob shorter or longer than the header describes.
    pub fn from_bytes(blob: Vec<u8>) -> RecogResult<Self> {
        let header = DatabaseHeader::parse(&blob)?;
        header.check_layout()?;
        let needed = header.blob_len();
        if (blob.len() as u64) < needed {
            return Err(RecogError::TruncatedDatabase {
                needed: needed as usize,
                actual: blob.len(),
            });
        }
        if blob.len() as u64 > needed {
            return Err(RecogError::InconsistentDatabase(format!(
                "{} trailing bytes after the labels",
                blob.len() as u64 - needed
            )));
        }
        Ok(Self { header, blob })
    }

    /// The parsed header
    pub fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.header.count as usize
    }

    /// True when the database holds no sample
    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    /// All labels in index order
    pub fn labels(&self) -> &[u8] {
        let start = self.header.class_offset as usize;
        &self.blob[start..start + self.len()]
    }

    /// Label of sample `n`; panics if `n >= len()`
    pub fn label(&self, n: usize) -> u8 {
        self.labels()[n]
    }

    /// Feature grid of sample `n`; panics if `n >= len()`
    pub fn grid(&self, n: usize) -> GridView<'_> {
        assert!(n < self.len(), "sample {} out of {}", n, self.len());
        let start = self.header.feature_offset as usize + n * GRID_BYTES;
        GridView::new(&self.blob[start..start + GRID_BYTES])
    }

    /// `(label, grid)` pairs in index order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u8, GridView<'_>)> + '_ {
        (0..self.len()).map(move |n| (self.label(n), self.grid(n)))
    }

    /// A new database of the samples at `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> RecogResult<Self> {
        let samples: Vec<Sample> = indices
            .iter()
            .map(|&n| {
                if n >= self.len() {
                    return Err(RecogError::InvalidParameter(format!(
                        "sample {} out of {}",
                        n,
                        self.len()
                    )));
                }
                Ok(Sample::new(self.label(n), self.grid(n).to_grid()))
            })
            .collect::<RecogResult<_>>()?;
        Self::from_samples(&samples)
    }

    /// The serialized blob
    pub fn as_bytes(&self) -> &[u8] {
        &self.blob
    }

    /// Write the blob to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RecogResult<()> {
        let path = path.as_ref();
        let mut file = fs::File::create(path)?;
        file.write_all(&self.blob)?;
        file.sync_all()?;
        debug!(path = %path.display(), samples = self.len(), "database saved");
        Ok(())
    }

    /// Read and check a blob from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> RecogResult<Self> {
        let path = path.as_ref();
        let blob = fs::read(path)?;
        let db = Self::from_bytes(blob)?;
        debug!(path = %path.display(), samples = db.len(), "database loaded");
        Ok(db)
    }
}

/// True when `path` starts with a valid database header
///
/// Only the header is read.
pub fn is_valid_database<P: AsRef<Path>>(path: P) -> bool {
    let mut header = [0u8; HEADER_SIZE];
    let read = fs::File::open(path).and_then(|mut f| f.read_exact(&mut header));
    read.is_ok() && DatabaseHeader::parse(&header).is_ok()
}
