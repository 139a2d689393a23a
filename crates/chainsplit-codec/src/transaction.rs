//! Transaction decoding.
//!
//! ```text
//! version      i32 LE
//! input count  varint
//!   prev hash    32 bytes
//!   prev index   u32 LE
//!   script len   varint
//!   script       script len bytes
//!   sequence     u32 LE
//! output count varint
//!   value        i64 LE
//!   script len   varint
//!   script       script len bytes
//! lock time    u32 LE
//! ```

use crate::hash::sha256d;
use crate::varint::read_varint;
use crate::wire::{SliceReader, WireRead};
use chainsplit_core::{
    error::DecodeError,
    types::{Transaction, TxInput, TxOutput},
};

/// Smallest possible encodings, used to cap pre-allocation from untrusted counts.
pub(crate) const MIN_TX_LEN: usize = 4 + 1 + 1 + 4;
const MIN_INPUT_LEN: usize = 32 + 4 + 1 + 4;
const MIN_OUTPUT_LEN: usize = 8 + 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionDecoder;

impl TransactionDecoder {
    /// Decode one transaction starting at the reader's position.
    ///
    /// Scripts are copied out verbatim; their contents are not inspected.
    pub fn decode(r: &mut SliceReader<'_>) -> Result<Transaction, DecodeError> {
        let start = r.position();
        let version = r.read_i32_le("tx version")?;

        let input_count = read_varint(r, "input count")?;
        let mut inputs = Vec::with_capacity(capacity_hint(input_count, r.remaining(), MIN_INPUT_LEN));
        for _ in 0..input_count {
            inputs.push(decode_input(r)?);
        }

        let output_count = read_varint(r, "output count")?;
        let mut outputs =
            Vec::with_capacity(capacity_hint(output_count, r.remaining(), MIN_OUTPUT_LEN));
        for _ in 0..output_count {
            outputs.push(decode_output(r)?);
        }

        let lock_time = r.read_u32_le("lock time")?;
        let txid = sha256d(r.consumed_since(start));

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
            txid,
        })
    }
}

fn decode_input(r: &mut SliceReader<'_>) -> Result<TxInput, DecodeError> {
    let previous_tx_hash = r.read_array::<32>("previous tx hash")?;
    let previous_tx_out_index = r.read_u32_le("previous tx out index")?;
    let script_len = script_len_to_usize(read_varint(r, "input script length")?, r)?;
    let script = r.read_bytes(script_len, "input script")?;
    let sequence = r.read_u32_le("sequence")?;
    Ok(TxInput {
        previous_tx_hash,
        previous_tx_out_index,
        script,
        sequence,
    })
}

fn decode_output(r: &mut SliceReader<'_>) -> Result<TxOutput, DecodeError> {
    let value = r.read_i64_le("output value")?;
    let script_len = script_len_to_usize(read_varint(r, "output script length")?, r)?;
    let script = r.read_bytes(script_len, "output script")?;
    Ok(TxOutput { value, script })
}

/// A length that cannot fit in memory cannot fit in the remaining bytes either.
fn script_len_to_usize(len: u64, r: &SliceReader<'_>) -> Result<usize, DecodeError> {
    usize::try_from(len).map_err(|_| DecodeError::TruncatedInput {
        offset: r.offset(),
        field: "script",
    })
}

/// Never reserve more elements than the remaining bytes could hold.
pub(crate) fn capacity_hint(count: u64, remaining: usize, min_len: usize) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(remaining / min_len)
}
