//! Training list files
//!
//! One sample per line, in either of two forms:
//!
//! ```text
//! a-0001.png            class 'a', the line itself is the path
//! images/0001.png a     class 'a' after the last space
//! ```
//!
//! Paths are relative to the directory holding the list. Every line must
//! be printable ASCII. A line that matches neither form has no class; it
//! counts as found but is never packed into a database.

use crate::{RecogError, RecogOptions, RecogResult};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// One line of a training list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 1-based line number
    pub line_no: usize,
    /// The line without its newline
    pub line: String,
    /// Image path resolved against the list directory
    pub path: PathBuf,
    /// Class byte, or `None` for an unrecognized line
    pub class: Option<u8>,
}

fn parse_line(line_no: usize, line: &str, base_dir: &Path) -> ListEntry {
    let bytes = line.as_bytes();
    let (class, rel) = match line.rfind(' ') {
        Some(sp) => match bytes.get(sp + 1) {
            Some(&c) => (Some(c), &line[..sp]),
            None => (None, line),
        },
        None if bytes.len() >= 2 && bytes[1] == b'-' => (Some(bytes[0]), line),
        None => (None, line),
    };
    ListEntry {
        line_no,
        line: line.to_string(),
        path: base_dir.join(rel),
        class,
    }
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

/// A parsed training list
#[derive(Debug, Clone)]
pub struct TrainingList {
    base_dir: PathBuf,
    entries: Vec<ListEntry>,
}

impl TrainingList {
    /// Read and parse a list file
    ///
    /// # Errors
    ///
    /// * [`RecogError::ListFileNotFound`] if the file cannot be read.
    /// * [`RecogError::ListFileMalformed`] for a non-printable byte or a
    ///   list without lines.
    pub fn read<P: AsRef<Path>>(path: P) -> RecogResult<Self> {
        let path = path.as_ref();
        let text = fs::read(path).map_err(|_| RecogError::ListFileNotFound {
            path: path.to_path_buf(),
        })?;
        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::parse(&text, base_dir)
    }

    /// Parse list text whose paths are relative to `base_dir`
    pub fn parse(text: &[u8], base_dir: impl Into<PathBuf>) -> RecogResult<Self> {
        let base_dir = base_dir.into();
        let mut lines: Vec<&[u8]> = text.split(|&b| b == b'\n').collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let mut entries = Vec::with_capacity(lines.len());
        for (i, raw) in lines.into_iter().enumerate() {
            let line_no = i + 1;
            if let Some(pos) = raw.iter().position(|&b| !is_printable(b)) {
                return Err(RecogError::ListFileMalformed {
                    line: line_no,
                    reason: format!("unprintable byte {:#04x} at column {}", raw[pos], pos + 1),
                });
            }
            // printable ASCII is valid UTF-8
            let line = String::from_utf8_lossy(raw);
            entries.push(parse_line(line_no, &line, &base_dir));
        }

        if entries.is_empty() {
            return Err(RecogError::ListFileMalformed {
                line: 0,
                reason: "no entries found".to_string(),
            });
        }
        Ok(Self { base_dir, entries })
    }

    /// Directory that entry paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Every line, in file order
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a parsed list
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that carry a class
    pub fn classified(&self) -> impl Iterator<Item = &ListEntry> {
        self.entries.iter().filter(|e| e.class.is_some())
    }
}

/// Source list line of each database sample
///
/// Built by training from the entries that were actually packed, so index
/// `n` names the line of sample `n` even when earlier entries were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSources {
    lines: Vec<String>,
}

impl SampleSources {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Rebuild the source lines of a database trained from a list file
    ///
    /// Entries that training skipped, for lacking a class or failing
    /// extraction, are skipped again. `options` must be the ones the
    /// database was trained with.
    pub fn from_list_file<P: AsRef<Path>>(path: P, options: &RecogOptions) -> RecogResult<Self> {
        crate::train::packed_sources(&TrainingList::read(path)?, options)
    }

    pub(crate) fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Line of sample `n`, or `#n` when unknown
    pub fn line(&self, n: usize) -> Cow<'_, str> {
        match self.lines.get(n) {
            Some(line) => Cow::Borrowed(line),
            None => Cow::Owned(format!("#{n}")),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Replace the extension of `path`
///
/// `companion_path("chars.lst", "db")` is `chars.db`.
pub fn companion_path<P: AsRef<Path>>(path: P, ext: &str) -> PathBuf {
    path.as_ref().with_extension(ext)
}
