//! Split planning: cut a file into contiguous byte ranges without looking
//! at its contents.

use chainsplit_core::split::SplitRange;

/// Default split size: 128 MiB, the usual distributed-filesystem block size.
pub const DEFAULT_SPLIT_SIZE: u64 = 128 * 1024 * 1024;

/// Contiguous, non-overlapping ranges of at most `split_size` bytes covering
/// `0..file_len`. A `split_size` of 0 yields a single whole-file split.
pub fn plan_splits(file_len: u64, split_size: u64) -> Vec<SplitRange> {
    if file_len == 0 {
        return Vec::new();
    }
    if split_size == 0 || split_size >= file_len {
        return vec![SplitRange::whole(file_len)];
    }

    let mut splits = Vec::with_capacity(file_len.div_ceil(split_size) as usize);
    let mut start = 0;
    while start < file_len {
        let length = split_size.min(file_len - start);
        splits.push(SplitRange::new(start, length));
        start += length;
    }
    splits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_file_contiguously() {
        let splits = plan_splits(1_000, 300);
        assert_eq!(
            splits,
            vec![
                SplitRange::new(0, 300),
                SplitRange::new(300, 300),
                SplitRange::new(600, 300),
                SplitRange::new(900, 100),
            ]
        );
        for pair in splits.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert!(plan_splits(0, 10).is_empty());
        assert_eq!(plan_splits(50, 0), vec![SplitRange::whole(50)]);
        assert_eq!(plan_splits(50, 50), vec![SplitRange::whole(50)]);
        assert_eq!(plan_splits(50, 1).len(), 50);
    }
}
