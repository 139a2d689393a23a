//! ChainSplit CLI — decode block dump files split the way a cluster would.
//!
//! # Commands
//! ```text
//! chainsplit decode --file <blk.dat> [--split-size N] [--transactions] [--json]
//! chainsplit scan   --file <blk.dat> [--start N] [--length N]
//! chainsplit stats  --file <blk.dat> [--split-size N]
//! chainsplit info
//! ```

use anyhow::{Context, Result};
use chainsplit_core::{config::ReaderConfig, Magic};
use chainsplit_observability::{init_tracing, LogConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cmd_decode;
mod cmd_scan;
mod cmd_stats;

#[derive(Parser)]
#[command(
    name = "chainsplit",
    about = "Split-aware block file decoder — ChainSplit CLI",
    long_about = "
ChainSplit CLI: decode concatenated block dump files (blk*.dat) into blocks
and transactions. Files are cut into byte ranges that are decoded
independently and in parallel; every block is decoded exactly once.

ENVIRONMENT VARIABLES:
  RUST_LOG    Overrides the log filter (e.g. chainsplit_reader=debug)
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Suppress summary lines on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Codec options shared by every command that reads a file.
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// JSON configuration file (ReaderConfig); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Accepted markers: network names (mainnet, testnet3, regtest, namecoin) or 8-digit hex
    #[arg(long, num_args = 1..)]
    magic: Vec<String>,
    /// Maximum declared block size in bytes
    #[arg(long)]
    max_block_size: Option<u64>,
    /// Read buffer size in bytes
    #[arg(long)]
    buffer_size: Option<usize>,
}

impl CodecArgs {
    pub fn reader_config(&self) -> Result<ReaderConfig> {
        let mut config = match &self.config {
            Some(path) => ReaderConfig::from_json_file(path)
                .with_context(|| format!("loading config from '{}'", path.display()))?,
            None => ReaderConfig::default(),
        };
        if !self.magic.is_empty() {
            config = config.with_markers(self.magic.iter().map(|m| {
                Magic::for_network(m).map_or_else(|| m.clone(), |magic| magic.to_string())
            }));
        }
        if let Some(n) = self.max_block_size {
            config = config.max_block_size(n);
        }
        if let Some(n) = self.buffer_size {
            config = config.buffer_size(n);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every block (or transaction) in a file
    Decode {
        /// Block dump file
        #[arg(short, long)]
        file: PathBuf,
        /// Bytes per split (0 = whole file)
        #[arg(long, default_value_t = chainsplit_batch::DEFAULT_SPLIT_SIZE)]
        split_size: u64,
        /// Number of parallel Rayon threads (0 = use default)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Emit one record per transaction instead of per block
        #[arg(long)]
        transactions: bool,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        codec: CodecArgs,
    },

    /// List magic marker offsets within a byte range
    Scan {
        /// Block dump file
        #[arg(short, long)]
        file: PathBuf,
        /// First byte to scan
        #[arg(long, default_value_t = 0)]
        start: u64,
        /// Bytes to scan (default: to end of file)
        #[arg(long)]
        length: Option<u64>,
        /// Stop after this many markers
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Per-split block counts and totals
    Stats {
        /// Block dump file
        #[arg(short, long)]
        file: PathBuf,
        /// Bytes per split (0 = whole file)
        #[arg(long, default_value_t = chainsplit_batch::DEFAULT_SPLIT_SIZE)]
        split_size: u64,
        /// Number of parallel Rayon threads (0 = use default)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Show ChainSplit build and default configuration
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = LogConfig::default()
        .with_level(if cli.verbose { "debug" } else { "warn" })
        .json(cli.log_json);
    init_tracing(&log).context("initialising logging")?;

    match cli.command {
        Commands::Decode { file, split_size, threads, transactions, json, codec } => {
            let output = cmd_decode::Output { transactions, json, quiet: cli.quiet };
            cmd_decode::run(&file, split_size, threads, output, &codec.reader_config()?)
        }

        Commands::Scan { file, start, length, limit, codec } => {
            cmd_scan::run(&file, start, length, limit, cli.quiet, &codec.reader_config()?)
        }

        Commands::Stats { file, split_size, threads, json, codec } => {
            cmd_stats::run(&file, split_size, threads, json, &codec.reader_config()?)
        }

        Commands::Info => cmd_info(),
    }
}

fn cmd_info() -> Result<()> {
    println!("ChainSplit v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Networks:");
    for name in ["mainnet", "testnet3", "regtest", "namecoin"] {
        if let Some(magic) = Magic::for_network(name) {
            println!("  {name:<10} {magic}");
        }
    }
    println!();
    println!("Default reader configuration:");
    println!("{}", serde_json::to_string_pretty(&ReaderConfig::default())?);
    println!();
    println!("Default split size: {} bytes", chainsplit_batch::DEFAULT_SPLIT_SIZE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_is_global() {
        let cli = Cli::try_parse_from(["chainsplit", "scan", "--file", "blk.dat", "-q"]).unwrap();
        assert!(cli.quiet);
        let cli = Cli::try_parse_from(["chainsplit", "info"]).unwrap();
        assert!(!cli.quiet);
    }

    #[test]
    fn network_names_become_marker_hex() {
        let cli = Cli::try_parse_from([
            "chainsplit", "decode", "--file", "blk.dat", "--magic", "testnet3", "FABFB5DA",
        ])
        .unwrap();
        let Commands::Decode { codec, .. } = cli.command else {
            panic!("expected decode");
        };
        let config = codec.reader_config().unwrap();
        assert_eq!(config.magic_markers, vec![Magic::TESTNET3.to_string(), "FABFB5DA".to_string()]);
        assert!(config.validate().is_ok());
    }
}
