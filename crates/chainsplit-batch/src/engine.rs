//! `BatchEngine` — runs one independent reader per split on a Rayon pool.
//!
//! Readers share nothing: each opens its own file handle and decides block
//! ownership from its own range alone. Results are merged afterwards.

use crate::plan::plan_splits;
use crate::request::BatchRequest;
use chainsplit_core::{
    config::CodecConfig,
    error::BatchError,
    record::RecordReader,
    split::{FileSplit, SplitRange},
    types::Block,
};
use chainsplit_reader::BlockRecordReader;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Per-split outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    pub range: SplitRange,
    /// Blocks whose marker lies in this split
    pub blocks: u64,
    /// Transactions across those blocks
    pub transactions: u64,
    /// Blocks skipped as undecodable
    pub skipped: u64,
    /// Bytes consumed past `range.start`, including the tail of a spanning block
    pub bytes_read: u64,
}

/// Result of a batch job.
pub struct BatchResult {
    /// Every decoded block, ordered by offset
    pub blocks: Vec<Block>,
    /// One entry per split, in file order
    pub splits: Vec<SplitStats>,
    /// Size of the input file
    pub file_len: u64,
}

impl BatchResult {
    pub fn transaction_count(&self) -> u64 {
        self.splits.iter().map(|s| s.transactions).sum()
    }

    pub fn skipped_count(&self) -> u64 {
        self.splits.iter().map(|s| s.skipped).sum()
    }
}

/// Batch decode engine.
#[derive(Debug, Default)]
pub struct BatchEngine;

impl BatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Plan splits over `req.path` and decode them in parallel.
    pub fn run(&self, req: &BatchRequest) -> Result<BatchResult, BatchError> {
        let config = req.config.validate()?;
        let file_len = std::fs::metadata(&req.path)
            .map_err(|source| BatchError::Open {
                path: req.path.display().to_string(),
                source,
            })?
            .len();
        let splits: Vec<FileSplit> = plan_splits(file_len, req.split_size)
            .into_iter()
            .map(|range| FileSplit::new(&req.path, range.start, range.length))
            .collect();
        let total = splits.len();

        info!(
            path = %req.path.display(),
            file_len,
            splits = total,
            split_size = req.split_size,
            "BatchEngine: starting"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(req.concurrency)
            .build()
            .map_err(|e| BatchError::ThreadPool(e.to_string()))?;

        let done = AtomicUsize::new(0);
        let outcomes: Vec<(Vec<Block>, SplitStats)> = pool.install(|| {
            splits
                .par_iter()
                .map(|split| {
                    let outcome = read_split(split, &config)?;
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(cb) = &req.on_progress {
                        cb(finished, total);
                    }
                    Ok(outcome)
                })
                .collect::<Result<_, BatchError>>()
        })?;

        let mut blocks = Vec::new();
        let mut stats = Vec::with_capacity(outcomes.len());
        for (split_blocks, split_stats) in outcomes {
            blocks.extend(split_blocks);
            stats.push(split_stats);
        }
        // Splits are already in file order; sort anyway so the contract does
        // not depend on how the pool collected.
        blocks.sort_by_key(|b| b.offset);

        let result = BatchResult { blocks, splits: stats, file_len };
        info!(
            blocks = result.blocks.len(),
            transactions = result.transaction_count(),
            skipped = result.skipped_count(),
            "BatchEngine: complete"
        );
        Ok(result)
    }
}

/// Decode one split through its own file handle.
fn read_split(
    split: &FileSplit,
    config: &CodecConfig,
) -> Result<(Vec<Block>, SplitStats), BatchError> {
    let range = split.range;
    let read_err = |source| BatchError::Read { start: range.start, source };

    let file = File::open(&split.path).map_err(|source| BatchError::Open {
        path: split.path.display().to_string(),
        source,
    })?;
    let mut reader = BlockRecordReader::open(file, range, config).map_err(read_err)?;

    let mut key = reader.create_key();
    let mut value = reader.create_value();
    let mut blocks = Vec::new();
    let mut transactions = 0u64;
    while reader.next(&mut key, &mut value).map_err(read_err)? {
        transactions += value.transaction_count() as u64;
        blocks.push(std::mem::take(&mut value));
    }

    let split = reader.split_reader();
    let stats = SplitStats {
        range,
        blocks: split.blocks_read(),
        transactions,
        skipped: split.blocks_skipped(),
        bytes_read: reader.position().saturating_sub(range.start),
    };
    reader.close().map_err(read_err)?;

    debug!(
        split_start = range.start,
        split_end = range.end(),
        blocks = stats.blocks,
        skipped = stats.skipped,
        "split finished"
    );
    Ok((blocks, stats))
}
