//! `chainsplit decode` — decode every block of a file through parallel splits.

use anyhow::{Context, Result};
use chainsplit_batch::{BatchEngine, BatchRequest};
use chainsplit_core::config::ReaderConfig;
use chainsplit_reader::project_all;
use serde_json::json;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// How decoded records are written.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// One record per transaction instead of per block
    pub transactions: bool,
    /// JSON lines instead of text
    pub json: bool,
    /// No summary line on stderr
    pub quiet: bool,
}

pub fn run(
    file: &Path,
    split_size: u64,
    threads: usize,
    output: Output,
    config: &ReaderConfig,
) -> Result<()> {
    let Output { transactions, json: as_json, quiet } = output;
    let req = BatchRequest::new(file)
        .config(config.clone())
        .split_size(split_size)
        .concurrency(threads)
        .on_progress(|done, total| info!(done, total, "split finished"));
    let result = BatchEngine::new()
        .run(&req)
        .with_context(|| format!("decoding '{}'", file.display()))?;

    let skipped = result.skipped_count();
    let block_count = result.blocks.len();
    let mut out = BufWriter::new(io::stdout().lock());

    if transactions {
        for (key, tx) in project_all(result.blocks) {
            if as_json {
                let record = json!({ "key": hex::encode(key), "transaction": tx });
                writeln!(out, "{}", serde_json::to_string(&record)?)?;
            } else {
                writeln!(
                    out,
                    "{}  in={:<4} out={:<4} value={}",
                    tx.txid_hex(),
                    tx.inputs.len(),
                    tx.outputs.len(),
                    tx.total_output_value()
                )?;
            }
        }
    } else {
        for block in &result.blocks {
            if as_json {
                writeln!(out, "{}", serde_json::to_string(block)?)?;
            } else {
                let time = block
                    .timestamp()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| block.time.to_string());
                writeln!(
                    out,
                    "{:>12}  {}  {}  {} txs",
                    block.offset,
                    block.hash_hex(),
                    time,
                    block.transaction_count()
                )?;
            }
        }
    }
    out.flush()?;

    if !as_json && !quiet {
        eprintln!("✓ {} blocks decoded, {} skipped", block_count, skipped);
    }
    Ok(())
}
