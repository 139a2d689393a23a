//! `chainsplit scan` — list marker offsets without decoding.

use anyhow::{Context, Result};
use chainsplit_codec::{ByteSource, MagicScanner};
use chainsplit_core::config::ReaderConfig;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

pub fn run(
    file: &Path,
    start: u64,
    length: Option<u64>,
    limit: Option<usize>,
    quiet: bool,
    config: &ReaderConfig,
) -> Result<()> {
    let config = config.validate()?;
    let mut handle =
        File::open(file).with_context(|| format!("opening '{}'", file.display()))?;
    handle.seek(SeekFrom::Start(start))?;

    let scanner = MagicScanner::from_config(&config);
    let mut source = ByteSource::new(handle, config.buffer_size(), start);
    let end = length.map(|len| start.saturating_add(len));

    let mut found = 0usize;
    for m in scanner.matches(&mut source, end).take(limit.unwrap_or(usize::MAX)) {
        let m = m.context("reading file")?;
        println!("{:>12}  {}", m.offset, m.magic);
        found += 1;
    }
    if !quiet {
        eprintln!("✓ {} markers", found);
    }
    Ok(())
}
