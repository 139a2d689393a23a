//! # chainsplit-codec
//!
//! Wire codec for concatenated block dump files (`blk*.dat` layout).
//!
//! ## Layers
//! ```text
//! ByteSource (buffered Read, logical position)
//!       │
//!       ├── MagicScanner      realign onto the next 4-byte marker
//!       │
//!       ▼
//! BlockDecoder                magic | size | header | varint | txs
//!       │
//!       ▼
//! TransactionDecoder          inputs, outputs, lock time
//!       │
//!       ▼
//! varint / WireRead           compact integers, LE primitives
//! ```

pub mod block;
pub mod hash;
pub mod scanner;
pub mod source;
pub mod transaction;
pub mod varint;
pub mod wire;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use block::BlockDecoder;
pub use scanner::{MagicScanner, MarkerMatch, Matches};
pub use source::ByteSource;
pub use transaction::TransactionDecoder;
pub use varint::{read_varint, varint_len};
pub use wire::{SliceReader, WireRead};
