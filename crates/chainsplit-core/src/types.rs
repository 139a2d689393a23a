//! Decoded block and transaction records.
//!
//! Records are built in one pass by the codec and handed to the caller by
//! value. Hashes are kept in wire (little-endian) byte order; use
//! [`display_hash`] for the conventional reversed hex rendering.

use crate::magic::Magic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 32-byte hash in wire byte order.
pub type Hash256 = [u8; 32];

/// Render a wire-order hash the way block explorers print it (byte-reversed hex).
pub fn display_hash(hash: &Hash256) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// One framed block from a dump file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Byte offset of the magic marker in the underlying source
    pub offset: u64,
    pub magic: Magic,
    /// Byte length of everything following the size field, as declared on the wire
    pub declared_size: u32,
    pub version: i32,
    #[serde(with = "hex")]
    pub hash_prev_block: Hash256,
    #[serde(with = "hex")]
    pub hash_merkle_root: Hash256,
    /// Unix seconds
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub transactions: Vec<Transaction>,
    /// Double SHA-256 of the 80-byte header, wire byte order
    #[serde(with = "hex")]
    pub hash: Hash256,
}

impl Block {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Header time as a UTC timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.time), 0)
    }

    /// Block hash in explorer notation.
    pub fn hash_hex(&self) -> String {
        display_hash(&self.hash)
    }

    /// Sum of all output values in the block, in the smallest currency unit.
    pub fn total_output_value(&self) -> i64 {
        self.transactions
            .iter()
            .map(Transaction::total_output_value)
            .fold(0i64, i64::saturating_add)
    }
}

/// One transaction inside a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
    /// Double SHA-256 of the raw transaction bytes, wire byte order
    #[serde(with = "hex")]
    pub txid: Hash256,
}

impl Transaction {
    /// A coinbase spends the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        matches!(
            self.inputs.as_slice(),
            [only] if only.previous_tx_hash == [0u8; 32] && only.previous_tx_out_index == u32::MAX
        )
    }

    pub fn total_output_value(&self) -> i64 {
        self.outputs
            .iter()
            .map(|o| o.value)
            .fold(0i64, i64::saturating_add)
    }

    pub fn txid_hex(&self) -> String {
        display_hash(&self.txid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(with = "hex")]
    pub previous_tx_hash: Hash256,
    pub previous_tx_out_index: u32,
    /// Opaque unlocking script
    #[serde(with = "hex")]
    pub script: Vec<u8>,
    pub sequence: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Amount in the smallest currency unit
    pub value: i64,
    /// Opaque locking script
    #[serde(with = "hex")]
    pub script: Vec<u8>,
}
