//! Error types for the ChainSplit decode pipeline.

use thiserror::Error;

/// Errors raised while validating a reader configuration.
///
/// These are fatal: a reader is never constructed from an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Magic marker #{index} ({value:?}) is invalid: {reason}")]
    InvalidMarker {
        index: usize,
        value: String,
        reason: String,
    },

    #[error("At least one magic marker must be configured")]
    NoMarkers,

    #[error("Maximum block size must be in 1..=4294967295, got {0}")]
    InvalidMaxBlockSize(u64),

    #[error("Buffer size must be positive")]
    InvalidBufferSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while decoding a single block.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source ended before `field` could be read in full.
    #[error("Truncated input at offset {offset} while reading {field}")]
    TruncatedInput { offset: u64, field: &'static str },

    #[error("Block at offset {offset} declares {declared} bytes, above the limit of {max}")]
    BlockTooLarge { offset: u64, declared: u32, max: u32 },

    #[error("No configured magic marker at offset {offset} (found {})", hex::encode(.found))]
    UnknownMagic { offset: u64, found: [u8; 4] },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Returns `true` if the reader may skip the failed block and keep
    /// scanning for the next marker.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Byte offset the failure was detected at, when known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::TruncatedInput { offset, .. }
            | Self::BlockTooLarge { offset, .. }
            | Self::UnknownMagic { offset, .. } => Some(*offset),
            Self::Io(_) => None,
        }
    }
}

/// Errors from the batch (multi-split) engine.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Read failed in split starting at {start}: {source}")]
    Read {
        start: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
