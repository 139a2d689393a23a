//! Synthetic block streams for tests and benches.
//!
//! Seeds are small integers; generated bytes never contain the mainnet
//! marker, so a scanner only ever finds the markers written here.

use crate::hash::sha256d;
use crate::varint::encode_varint;
use chainsplit_core::{
    magic::Magic,
    types::{Block, Transaction, TxInput, TxOutput},
};

pub fn encode_transaction(tx: &Transaction, out: &mut Vec<u8>) {
    out.extend_from_slice(&tx.version.to_le_bytes());
    encode_varint(tx.inputs.len() as u64, out);
    for input in &tx.inputs {
        out.extend_from_slice(&input.previous_tx_hash);
        out.extend_from_slice(&input.previous_tx_out_index.to_le_bytes());
        encode_varint(input.script.len() as u64, out);
        out.extend_from_slice(&input.script);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }
    encode_varint(tx.outputs.len() as u64, out);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        encode_varint(output.script.len() as u64, out);
        out.extend_from_slice(&output.script);
    }
    out.extend_from_slice(&tx.lock_time.to_le_bytes());
}

fn encode_header(block: &Block, out: &mut Vec<u8>) {
    out.extend_from_slice(&block.version.to_le_bytes());
    out.extend_from_slice(&block.hash_prev_block);
    out.extend_from_slice(&block.hash_merkle_root);
    out.extend_from_slice(&block.time.to_le_bytes());
    out.extend_from_slice(&block.bits.to_le_bytes());
    out.extend_from_slice(&block.nonce.to_le_bytes());
}

/// Frame a block as `magic | size | body`.
///
/// `declared_size` overrides the size field; when it exceeds the body the
/// body is zero-padded up to it.
pub fn encode_block(block: &Block, declared_size: Option<u32>) -> Vec<u8> {
    let mut body = Vec::new();
    encode_header(block, &mut body);
    encode_varint(block.transactions.len() as u64, &mut body);
    for tx in &block.transactions {
        encode_transaction(tx, &mut body);
    }
    let size = declared_size.unwrap_or(body.len() as u32);
    if (size as usize) > body.len() {
        body.resize(size as usize, 0);
    }

    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(block.magic.as_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// A transaction with `inputs` inputs and `outputs` outputs, txid filled in.
pub fn sample_transaction(seed: u8, inputs: usize, outputs: usize) -> Transaction {
    let mut tx = Transaction {
        version: 1,
        inputs: (0..inputs)
            .map(|i| TxInput {
                previous_tx_hash: [seed.wrapping_add(i as u8) & 0x7f; 32],
                previous_tx_out_index: i as u32,
                script: vec![0x51; 1 + i % 5],
                sequence: u32::MAX,
            })
            .collect(),
        outputs: (0..outputs)
            .map(|i| TxOutput {
                value: 1_000 * (i as i64 + 1) + i64::from(seed),
                script: vec![0x76, 0xa9, 0x14, seed & 0x7f, 0x88, 0xac],
            })
            .collect(),
        lock_time: u32::from(seed),
        txid: [0u8; 32],
    };
    let mut raw = Vec::new();
    encode_transaction(&tx, &mut raw);
    tx.txid = sha256d(&raw);
    tx
}

/// A mainnet-marked block with `tx_count` transactions, hashes filled in.
pub fn sample_block(seed: u8, tx_count: usize) -> Block {
    let transactions: Vec<Transaction> = (0..tx_count)
        .map(|i| sample_transaction(seed.wrapping_add(i as u8), 1 + i % 2, 1 + i % 3))
        .collect();
    let mut block = Block {
        offset: 0,
        magic: Magic::MAINNET,
        declared_size: 0,
        version: 1,
        hash_prev_block: [seed & 0x7f; 32],
        hash_merkle_root: [(seed ^ 0x55) & 0x7f; 32],
        time: 1_600_000_000 + u32::from(seed),
        bits: 0x1d00_ffff,
        nonce: u32::from(seed) * 1_000,
        transactions,
        hash: [0u8; 32],
    };
    let mut header = Vec::new();
    encode_header(&block, &mut header);
    block.hash = sha256d(&header);
    block.declared_size = (encode_block(&block, None).len() - 8) as u32;
    block
}

/// Concatenate framed blocks; returns the stream and each block's marker offset.
pub fn stream_of(blocks: &[Vec<u8>]) -> (Vec<u8>, Vec<u64>) {
    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(blocks.len());
    for framed in blocks {
        offsets.push(data.len() as u64);
        data.extend_from_slice(framed);
    }
    (data, offsets)
}
