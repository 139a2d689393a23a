//! Byte-range descriptors handed to readers by the partitioning host.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A contiguous byte range of a source.
///
/// A split owns every block whose magic marker starts inside
/// `start..start + length`; the block body may run past the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitRange {
    pub start: u64,
    pub length: u64,
}

impl SplitRange {
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    /// Whole-source range for a source of `len` bytes.
    pub fn whole(len: u64) -> Self {
        Self { start: 0, length: len }
    }

    /// Exclusive end: the first offset owned by the following split.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// `true` if a marker at `offset` belongs to this split.
    pub fn owns(&self, offset: u64) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// A split of a named file, as produced by a host planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSplit {
    pub path: PathBuf,
    #[serde(flatten)]
    pub range: SplitRange,
}

impl FileSplit {
    pub fn new(path: impl Into<PathBuf>, start: u64, length: u64) -> Self {
        Self {
            path: path.into(),
            range: SplitRange::new(start, length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_is_half_open() {
        let r = SplitRange::new(100, 50);
        assert!(!r.owns(99));
        assert!(r.owns(100));
        assert!(r.owns(149));
        assert!(!r.owns(150));
        assert_eq!(r.end(), 150);
    }

    #[test]
    fn adjacent_ranges_never_both_own() {
        let a = SplitRange::new(0, 64);
        let b = SplitRange::new(64, 64);
        for offset in 0..128 {
            assert!(!(a.owns(offset) && b.owns(offset)));
            assert!(a.owns(offset) || b.owns(offset));
        }
    }

    #[test]
    fn empty_range_owns_nothing() {
        let r = SplitRange::new(10, 0);
        assert!(r.is_empty());
        assert!(!r.owns(10));
    }
}
