//! `chainsplit stats` — per-split ownership and throughput summary.

use anyhow::{Context, Result};
use chainsplit_batch::{BatchEngine, BatchRequest};
use chainsplit_core::config::ReaderConfig;
use serde_json::json;
use std::path::Path;
use std::time::Instant;

pub fn run(
    file: &Path,
    split_size: u64,
    threads: usize,
    as_json: bool,
    config: &ReaderConfig,
) -> Result<()> {
    let req = BatchRequest::new(file)
        .config(config.clone())
        .split_size(split_size)
        .concurrency(threads);

    let started = Instant::now();
    let result = BatchEngine::new()
        .run(&req)
        .with_context(|| format!("decoding '{}'", file.display()))?;
    let elapsed = started.elapsed();

    if as_json {
        let report = json!({
            "file_len": result.file_len,
            "blocks": result.blocks.len(),
            "transactions": result.transaction_count(),
            "skipped": result.skipped_count(),
            "elapsed_ms": elapsed.as_millis() as u64,
            "splits": result.splits,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:>12} {:>12} {:>8} {:>8} {:>8}", "start", "length", "blocks", "txs", "skipped");
    for s in &result.splits {
        println!(
            "{:>12} {:>12} {:>8} {:>8} {:>8}",
            s.range.start, s.range.length, s.blocks, s.transactions, s.skipped
        );
    }

    let mb = result.file_len as f64 / (1024.0 * 1024.0);
    println!("Results:");
    println!("  File:         {:.1} MiB in {} splits", mb, result.splits.len());
    println!("  Blocks:       {}", result.blocks.len());
    println!("  Transactions: {}", result.transaction_count());
    println!("  Skipped:      {}", result.skipped_count());
    println!("  Duration:     {:.3}s", elapsed.as_secs_f64());
    println!("  Throughput:   {:.1} MiB/sec", mb / elapsed.as_secs_f64().max(f64::EPSILON));
    Ok(())
}
