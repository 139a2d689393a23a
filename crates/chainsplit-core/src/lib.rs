//! # chainsplit-core
//!
//! Core records, errors, configuration, and the record-reader protocol shared
//! across all ChainSplit crates. The codec, the split reader, and the batch
//! engine are all built on the types defined here.

pub mod config;
pub mod error;
pub mod magic;
pub mod record;
pub mod split;
pub mod types;

pub use config::{CodecConfig, ReaderConfig};
pub use error::{BatchError, ConfigError, DecodeError};
pub use magic::Magic;
pub use record::{RecordKey, RecordReader};
pub use split::{FileSplit, SplitRange};
pub use types::{display_hash, Block, Hash256, Transaction, TxInput, TxOutput};
