//! Block-level `RecordReader`: one record per block owned by the split.

use crate::projection::block_key;
use crate::split_reader::SplitReader;
use chainsplit_core::{
    config::CodecConfig,
    record::{RecordKey, RecordReader},
    split::SplitRange,
    types::Block,
};
use std::io::{self, Read, Seek};

/// Key: `hash_merkle_root ++ hash_prev_block` (64 bytes). Value: the block.
pub struct BlockRecordReader<R> {
    inner: SplitReader<R>,
}

impl<R: Read + Seek> BlockRecordReader<R> {
    pub fn open(source: R, range: SplitRange, config: &CodecConfig) -> io::Result<Self> {
        Ok(Self { inner: SplitReader::open(source, range, config)? })
    }
}

impl<R: Read> BlockRecordReader<R> {
    pub fn from_split_reader(inner: SplitReader<R>) -> Self {
        Self { inner }
    }

    pub fn split_reader(&self) -> &SplitReader<R> {
        &self.inner
    }
}

impl<R: Read> RecordReader for BlockRecordReader<R> {
    type Key = RecordKey;
    type Value = Block;

    fn create_key(&self) -> RecordKey {
        RecordKey::new()
    }

    fn create_value(&self) -> Block {
        Block::default()
    }

    fn next(&mut self, key: &mut RecordKey, value: &mut Block) -> io::Result<bool> {
        match self.inner.next_block()? {
            Some(block) => {
                key.set(&block_key(&block));
                *value = block;
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
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::BLOCK_KEY_LEN;
    use chainsplit_codec::testkit::{encode_block, sample_block, stream_of};
    use chainsplit_core::config::ReaderConfig;
    use std::io::Cursor;

    #[test]
    fn drives_through_record_protocol() {
        let blocks = [sample_block(1, 2), sample_block(2, 1)];
        let (data, starts) = stream_of(&[encode_block(&blocks[0], None), encode_block(&blocks[1], None)]);
        let len = data.len() as u64;
        let cfg = ReaderConfig::default().validate().unwrap();
        let mut reader = BlockRecordReader::open(Cursor::new(data), SplitRange::whole(len), &cfg).unwrap();

        let mut key = reader.create_key();
        let mut value = reader.create_value();
        assert_eq!(reader.progress(), 0.0);

        for (expected, start) in blocks.iter().zip(&starts) {
            assert!(reader.next(&mut key, &mut value).unwrap());
            assert_eq!(key.len(), BLOCK_KEY_LEN);
            assert_eq!(&key.as_bytes()[..32], &expected.hash_merkle_root);
            assert_eq!(value.offset, *start);
            assert_eq!(value.hash, expected.hash);
            assert_eq!(value.transactions, expected.transactions);
        }
        assert!(!reader.next(&mut key, &mut value).unwrap());
        assert_eq!(reader.progress(), 1.0);
        assert_eq!(reader.position(), len);

        reader.close().unwrap();
        assert!(!reader.next(&mut key, &mut value).unwrap());
    }
}
