//! Transaction-level view of decoded blocks.
//!
//! Each transaction gets a synthetic key
//! `hash_merkle_root (32) ++ hash_prev_block (32) ++ index (4, big-endian)`,
//! unique per transaction as long as blocks are. The index restarts at 0
//! for every block.

use chainsplit_core::types::{Block, Transaction};

pub const BLOCK_KEY_LEN: usize = 64;
pub const TRANSACTION_KEY_LEN: usize = BLOCK_KEY_LEN + 4;

pub type BlockKey = [u8; BLOCK_KEY_LEN];
pub type TransactionKey = [u8; TRANSACTION_KEY_LEN];

/// `hash_merkle_root ++ hash_prev_block`.
pub fn block_key(block: &Block) -> BlockKey {
    let mut key = [0u8; BLOCK_KEY_LEN];
    key[..32].copy_from_slice(&block.hash_merkle_root);
    key[32..].copy_from_slice(&block.hash_prev_block);
    key
}

pub fn transaction_key(block_key: &BlockKey, index: u32) -> TransactionKey {
    let mut key = [0u8; TRANSACTION_KEY_LEN];
    key[..BLOCK_KEY_LEN].copy_from_slice(block_key);
    key[BLOCK_KEY_LEN..].copy_from_slice(&index.to_be_bytes());
    key
}

/// Take ownership of a block and yield its transactions with synthetic keys.
pub fn project(block: Block) -> BlockTransactions {
    BlockTransactions {
        block_key: block_key(&block),
        index: 0,
        transactions: block.transactions.into_iter(),
    }
}

/// Flatten a sequence of blocks into `(key, transaction)` pairs in order.
pub fn project_all<I>(blocks: I) -> impl Iterator<Item = (TransactionKey, Transaction)>
where
    I: IntoIterator<Item = Block>,
{
    blocks.into_iter().flat_map(project)
}

pub struct BlockTransactions {
    block_key: BlockKey,
    index: u32,
    transactions: std::vec::IntoIter<Transaction>,
}

impl BlockTransactions {
    /// Transactions not yet yielded.
    pub fn remaining(&self) -> usize {
        self.transactions.len()
    }
}

impl Iterator for BlockTransactions {
    type Item = (TransactionKey, Transaction);

    fn next(&mut self) -> Option<Self::Item> {
        let tx = self.transactions.next()?;
        let key = transaction_key(&self.block_key, self.index);
        self.index = self.index.wrapping_add(1);
        Some((key, tx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.transactions.size_hint()
    }
}

impl ExactSizeIterator for BlockTransactions {}
