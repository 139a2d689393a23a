//! Transaction-level `RecordReader`.
//!
//! Decodes owned blocks one at a time and emits each of their transactions
//! as a separate record. A block whose marker is owned by the split is
//! drained completely even when its body crosses the split end. Blocks with
//! no transactions produce no records.

use crate::projection::{project, BlockTransactions, TransactionKey};
use crate::split_reader::SplitReader;
use chainsplit_core::{
    config::CodecConfig,
    record::{RecordKey, RecordReader},
    split::SplitRange,
    types::Transaction,
};
use std::io::{self, Read, Seek};

/// Key: `hash_merkle_root ++ hash_prev_block ++ index_be` (68 bytes).
/// Value: the transaction.
pub struct TransactionRecordReader<R> {
    inner: SplitReader<R>,
    current: Option<BlockTransactions>,
}

impl<R: Read + Seek> TransactionRecordReader<R> {
    pub fn open(source: R, range: SplitRange, config: &CodecConfig) -> io::Result<Self> {
        Ok(Self::from_split_reader(SplitReader::open(source, range, config)?))
    }
}

impl<R: Read> TransactionRecordReader<R> {
    pub fn from_split_reader(inner: SplitReader<R>) -> Self {
        Self { inner, current: None }
    }

    pub fn split_reader(&self) -> &SplitReader<R> {
        &self.inner
    }

    /// Next `(key, transaction)` pair, pulling a new block when the
    /// current one is drained.
    pub fn next_transaction(&mut self) -> io::Result<Option<(RecordKey, Transaction)>> {
        Ok(self
            .advance()?
            .map(|(key, tx)| (RecordKey::from(key.to_vec()), tx)))
    }

    fn advance(&mut self) -> io::Result<Option<(TransactionKey, Transaction)>> {
        loop {
            if let Some(record) = self.current.as_mut().and_then(Iterator::next) {
                return Ok(Some(record));
            }
            match self.inner.next_block()? {
                Some(block) => self.current = Some(project(block)),
                None => {
                    self.current = None;
                    return Ok(None);
                }
            }
        }
    }
}

impl<R: Read> RecordReader for TransactionRecordReader<R> {
    type Key = RecordKey;
    type Value = Transaction;

    fn create_key(&self) -> RecordKey {
        RecordKey::new()
    }

    fn create_value(&self) -> Transaction {
        Transaction::default()
    }

    fn next(&mut self, key: &mut RecordKey, value: &mut Transaction) -> io::Result<bool> {
        match self.advance()? {
            Some((k, tx)) => {
                key.set(&k);
                *value = tx;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn progress(&self) -> f32 {
        self.inner.progress()
    }

    fn position(&self) -> u64 {
        self.inner.position()
    }

    fn close(&mut self) -> io::Result<()> {
        self.current = None;
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{BLOCK_KEY_LEN, TRANSACTION_KEY_LEN};
    use chainsplit_codec::testkit::{encode_block, sample_block, stream_of};
    use chainsplit_core::config::ReaderConfig;
    use std::io::Cursor;

    fn reader_over(blocks: &[chainsplit_core::types::Block]) -> TransactionRecordReader<Cursor<Vec<u8>>> {
        let framed: Vec<Vec<u8>> = blocks.iter().map(|b| encode_block(b, None)).collect();
        let (data, _) = stream_of(&framed);
        let len = data.len() as u64;
        let cfg = ReaderConfig::default().buffer_size(16).validate().unwrap();
        TransactionRecordReader::open(Cursor::new(data), SplitRange::whole(len), &cfg).unwrap()
    }

    #[test]
    fn emits_one_record_per_transaction() {
        let blocks = [sample_block(1, 3), sample_block(2, 2)];
        let mut reader = reader_over(&blocks);
        let mut key = reader.create_key();
        let mut value = reader.create_value();

        let mut seen = Vec::new();
        while reader.next(&mut key, &mut value).unwrap() {
            assert_eq!(key.len(), TRANSACTION_KEY_LEN);
            let index = u32::from_be_bytes(key.as_bytes()[BLOCK_KEY_LEN..].try_into().unwrap());
            seen.push((key.as_bytes()[0], index, value.txid));
        }

        let expected: Vec<_> = blocks
            .iter()
            .flat_map(|b| {
                b.transactions
                    .iter()
                    .enumerate()
                    .map(move |(i, tx)| (b.hash_merkle_root[0], i as u32, tx.txid))
            })
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn empty_blocks_are_skipped() {
        let blocks = [sample_block(1, 0), sample_block(2, 1), sample_block(3, 0)];
        let mut reader = reader_over(&blocks);
        let (key, tx) = reader.next_transaction().unwrap().unwrap();
        assert_eq!(&key.as_bytes()[..32], &blocks[1].hash_merkle_root);
        assert_eq!(tx, blocks[1].transactions[0]);
        assert!(reader.next_transaction().unwrap().is_none());
        assert_eq!(reader.split_reader().blocks_read(), 3);
    }

    #[test]
    fn close_drops_pending_transactions() {
        let mut reader = reader_over(&[sample_block(5, 4)]);
        assert!(reader.next_transaction().unwrap().is_some());
        reader.close().unwrap();
        let (mut key, mut value) = (reader.create_key(), reader.create_value());
        assert!(!reader.next(&mut key, &mut value).unwrap());
    }
}
