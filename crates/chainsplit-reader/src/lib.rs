//! # chainsplit-reader
//!
//! Split-aware record readers over block dump files.
//!
//! A host cuts a file into byte ranges without looking at its contents.
//! Each range gets its own reader; every reader realigns onto the first
//! magic marker inside its range and decodes blocks until the next marker
//! falls outside it. Since a block belongs to the range holding its marker,
//! the union of all readers yields every block exactly once.
//!
//! ```no_run
//! use chainsplit_core::{RecordReader, ReaderConfig, SplitRange};
//! use chainsplit_reader::BlockRecordReader;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReaderConfig::default().validate()?;
//! let file = File::open("blk00000.dat")?;
//! let mut reader = BlockRecordReader::open(file, SplitRange::new(0, 64 << 20), &config)?;
//! let (mut key, mut block) = (reader.create_key(), reader.create_value());
//! while reader.next(&mut key, &mut block)? {
//!     println!("{} {} txs", block.hash_hex(), block.transaction_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod block_reader;
pub mod projection;
pub mod split_reader;
pub mod tx_reader;

pub use block_reader::BlockRecordReader;
pub use projection::{
    block_key, project, project_all, transaction_key, BlockTransactions, BLOCK_KEY_LEN,
    TRANSACTION_KEY_LEN,
};
pub use split_reader::SplitReader;
pub use tx_reader::TransactionRecordReader;
