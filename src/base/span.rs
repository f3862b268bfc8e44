//! Source locations attached to tree nodes.

use super::FileId;

pub use text_size::{TextRange, TextSize};

/// A byte range inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Loc {
    pub file: FileId,
    pub range: TextRange,
}

impl Loc {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// Create a location from raw byte offsets.
    pub fn from_offsets(file: FileId, start: u32, end: u32) -> Self {
        Self {
            file,
            range: TextRange::new(start.into(), end.into()),
        }
    }

    /// An empty location at the start of `file`, for synthesized nodes.
    pub fn none(file: FileId) -> Self {
        Self {
            file,
            range: TextRange::empty(0.into()),
        }
    }

    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.range.end()
    }

    /// Check if `other` lies within this location (same file, nested range).
    pub fn contains(&self, other: Loc) -> bool {
        self.file == other.file && self.range.contains_range(other.range)
    }

    /// Smallest location covering both `self` and `other`.
    ///
    /// Locations from different files cannot be joined; `self` is returned.
    pub fn join(self, other: Loc) -> Loc {
        if self.file != other.file {
            return self;
        }
        Loc {
            file: self.file,
            range: self.range.cover(other.range),
        }
    }
}
