//! Block decoding.
//!
//! A block on the wire is `magic (4) | size (4, LE) | body (size bytes)`.
//! The frame is peeked from the source, bounded by the configured
//! maximum, and the body is decoded in memory:
//!
//! ```text
//! version           i32 LE
//! hash prev block   32 bytes
//! hash merkle root  32 bytes
//! time              u32 LE
//! bits              u32 LE
//! nonce             u32 LE
//! tx count          varint
//! transactions      tx count × Transaction
//! ```

use crate::hash::sha256d;
use crate::source::ByteSource;
use crate::transaction::{capacity_hint, TransactionDecoder, MIN_TX_LEN};
use crate::varint::read_varint;
use crate::wire::{SliceReader, WireRead};
use chainsplit_core::{config::CodecConfig, error::DecodeError, magic::Magic, types::Block};
use std::io::Read;
use tracing::warn;

pub const HEADER_LEN: usize = 80;

/// Marker plus size field.
pub const FRAME_PREFIX_LEN: usize = 8;

pub struct BlockDecoder {
    markers: Vec<Magic>,
    max_block_size: u32,
}

impl BlockDecoder {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            markers: config.markers().to_vec(),
            max_block_size: config.max_block_size(),
        }
    }

    pub fn max_block_size(&self) -> u32 {
        self.max_block_size
    }

    /// Decode the block whose magic marker is the next thing in `source`.
    ///
    /// The whole frame is peeked and only consumed once the block decodes.
    /// On any error the source is left at the marker, so the caller can
    /// step one byte past it and resume scanning without losing markers
    /// that sat inside a false frame.
    pub fn decode<R: Read>(&self, source: &mut ByteSource<R>) -> Result<Block, DecodeError> {
        let offset = source.position();
        let (magic, declared_size) = match source.peek(FRAME_PREFIX_LEN)? {
            Some(prefix) => {
                let mut r = SliceReader::new(prefix, offset);
                (
                    Magic(r.read_array::<4>("magic")?),
                    r.read_u32_le("block size")?,
                )
            }
            None => {
                return Err(DecodeError::TruncatedInput {
                    offset: offset + source.buffered() as u64,
                    field: "block size",
                })
            }
        };

        if !self.markers.contains(&magic) {
            return Err(DecodeError::UnknownMagic {
                offset,
                found: magic.0,
            });
        }
        if declared_size > self.max_block_size {
            return Err(DecodeError::BlockTooLarge {
                offset,
                declared: declared_size,
                max: self.max_block_size,
            });
        }

        let frame_len = FRAME_PREFIX_LEN + declared_size as usize;
        let block = match source.peek(frame_len)? {
            Some(frame) => decode_body(
                offset,
                magic,
                declared_size,
                offset + FRAME_PREFIX_LEN as u64,
                &frame[FRAME_PREFIX_LEN..],
            )?,
            None => {
                return Err(DecodeError::TruncatedInput {
                    offset: offset + source.buffered() as u64,
                    field: "block body",
                })
            }
        };
        source.consume(frame_len);
        Ok(block)
    }
}

/// Decode a block body that has already been framed.
///
/// `body_offset` is the absolute offset of `body[0]`, used in error reports.
pub fn decode_body(
    offset: u64,
    magic: Magic,
    declared_size: u32,
    body_offset: u64,
    body: &[u8],
) -> Result<Block, DecodeError> {
    let mut r = SliceReader::new(body, body_offset);

    let version = r.read_i32_le("block version")?;
    let hash_prev_block = r.read_array::<32>("hash prev block")?;
    let hash_merkle_root = r.read_array::<32>("hash merkle root")?;
    let time = r.read_u32_le("time")?;
    let bits = r.read_u32_le("bits")?;
    let nonce = r.read_u32_le("nonce")?;
    let hash = sha256d(&body[..HEADER_LEN]);

    let tx_count = read_varint(&mut r, "transaction count")?;
    let mut transactions = Vec::with_capacity(capacity_hint(tx_count, r.remaining(), MIN_TX_LEN));
    for _ in 0..tx_count {
        transactions.push(TransactionDecoder::decode(&mut r)?);
    }

    if r.remaining() > 0 {
        warn!(
            offset,
            declared = declared_size,
            consumed = r.position(),
            "declared block size larger than decoded content"
        );
    }

    Ok(Block {
        offset,
        magic,
        declared_size,
        version,
        hash_prev_block,
        hash_merkle_root,
        time,
        bits,
        nonce,
        transactions,
        hash,
    })
}
