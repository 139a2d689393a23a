//! Exactly-once decoding across arbitrary split boundaries.

use chainsplit_codec::testkit::{encode_block, sample_block, stream_of};
use chainsplit_core::{
    config::{CodecConfig, ReaderConfig},
    types::{Block, Transaction, TxOutput},
    Magic, RecordReader, SplitRange,
};
use chainsplit_reader::{BlockRecordReader, SplitReader, TransactionRecordReader};
use std::io::Cursor;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn config() -> CodecConfig {
    ReaderConfig::default().buffer_size(16).validate().unwrap()
}

fn offsets_in(data: &[u8], range: SplitRange, cfg: &CodecConfig) -> Vec<u64> {
    SplitReader::open(Cursor::new(data.to_vec()), range, cfg)
        .unwrap()
        .map(|b| b.unwrap().offset)
        .collect()
}

fn splits_of(len: u64, size: u64) -> Vec<SplitRange> {
    (0..len)
        .step_by(size as usize)
        .map(|start| SplitRange::new(start, size.min(len - start)))
        .collect()
}

fn four_blocks() -> (Vec<u8>, Vec<u64>) {
    let mut framed = vec![b"\x00\xF9\xBE\x00junk".to_vec()];
    framed.extend([
        encode_block(&sample_block(1, 1), None),
        encode_block(&sample_block(2, 4), None),
        encode_block(&sample_block(3, 0), None),
        encode_block(&sample_block(4, 2), Some(400)),
    ]);
    let (data, mut starts) = stream_of(&framed);
    starts.remove(0);
    (data, starts)
}

/// Two blocks with declared sizes 100 and 150: the first holds one
/// transaction with no inputs or outputs, the second two transactions
/// with one output each. Both bodies are zero-padded.
fn two_block_scenario() -> (Vec<u8>, Vec<u64>) {
    let empty_tx = Transaction { version: 1, ..Default::default() };
    let paying_tx = |value| Transaction {
        version: 1,
        outputs: vec![TxOutput { value, script: vec![0x51] }],
        ..Default::default()
    };
    let first = Block {
        hash_merkle_root: [0x11; 32],
        transactions: vec![empty_tx],
        ..sample_block(7, 0)
    };
    let second = Block {
        hash_merkle_root: [0x22; 32],
        transactions: vec![paying_tx(50), paying_tx(60)],
        ..sample_block(8, 0)
    };
    stream_of(&[encode_block(&first, Some(100)), encode_block(&second, Some(150))])
}

/// A marker followed by a size field, as it might appear inside a script.
fn marker_with_size(size: u32) -> Vec<u8> {
    let mut bytes = Magic::MAINNET.as_bytes().to_vec();
    bytes.extend_from_slice(&size.to_le_bytes());
    bytes
}

/// Three blocks whose scripts contain markers that frame undecodable data.
/// The frame inside the first block covers the second block's real marker.
fn false_marker_blocks() -> (Vec<u8>, Vec<u64>) {
    let mut first = sample_block(1, 1);
    // Header-sized frame: the transaction count is missing.
    first.transactions[0].outputs[0].script = marker_with_size(80);
    let mut second = sample_block(2, 2);
    second.transactions[1].inputs[0].script = marker_with_size(16);
    stream_of(&[
        encode_block(&first, None),
        encode_block(&second, None),
        encode_block(&sample_block(3, 1), None),
    ])
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn every_two_way_cut_yields_each_block_once() {
    let (data, starts) = four_blocks();
    let len = data.len() as u64;
    let cfg = config();

    for m in 0..=len {
        let mut got = offsets_in(&data, SplitRange::new(0, m), &cfg);
        got.extend(offsets_in(&data, SplitRange::new(m, len - m), &cfg));
        assert_eq!(got, starts, "cut at {m}");
    }
}

#[test]
fn many_way_splits_yield_each_block_once() {
    let (data, starts) = four_blocks();
    let len = data.len() as u64;
    let cfg = config();

    for size in [1, 3, 7, 8, 13, 64, 100, 257, len] {
        let got: Vec<u64> = splits_of(len, size)
            .into_iter()
            .flat_map(|range| offsets_in(&data, range, &cfg))
            .collect();
        assert_eq!(got, starts, "split size {size}");
    }
}

#[test]
fn two_block_stream_yields_two_blocks_and_three_transactions() {
    let (data, starts) = two_block_scenario();
    assert_eq!(data.len(), 8 + 100 + 8 + 150);
    let len = data.len() as u64;
    let cfg = config();

    let mut blocks = BlockRecordReader::open(Cursor::new(data.clone()), SplitRange::whole(len), &cfg).unwrap();
    let (mut key, mut block) = (blocks.create_key(), blocks.create_value());
    let mut seen = Vec::new();
    while blocks.next(&mut key, &mut block).unwrap() {
        seen.push((block.offset, block.transaction_count()));
    }
    assert_eq!(seen, vec![(starts[0], 1), (starts[1], 2)]);

    let mut txs = TransactionRecordReader::open(Cursor::new(data), SplitRange::whole(len), &cfg).unwrap();
    let (mut key, mut tx) = (txs.create_key(), txs.create_value());
    let mut records = Vec::new();
    while txs.next(&mut key, &mut tx).unwrap() {
        records.push((key.as_bytes()[0], key.as_bytes()[67], tx.total_output_value()));
    }
    assert_eq!(records, vec![(0x11, 0, 0), (0x22, 0, 50), (0x22, 1, 60)]);
}

#[test]
fn split_end_inside_first_body_owns_only_first_block() {
    let (data, starts) = two_block_scenario();
    let cfg = config();
    let got = offsets_in(&data, SplitRange::new(0, starts[0] + 50), &cfg);
    assert_eq!(got, vec![starts[0]]);
}

#[test]
fn split_end_inside_second_body_owns_both_blocks() {
    let (data, starts) = two_block_scenario();
    let cfg = config();
    let got = offsets_in(&data, SplitRange::new(0, starts[1] + 50), &cfg);
    assert_eq!(got, starts);
}

#[test]
fn transactions_of_spanning_block_are_all_emitted_by_its_owner() {
    let (data, starts) = four_blocks();
    let len = data.len() as u64;
    let cfg = config();
    // Cut one byte after block 1's marker; block 1 has four transactions.
    let cut = starts[1] + 1;

    let count = |range| {
        let mut reader = TransactionRecordReader::open(Cursor::new(data.clone()), range, &cfg).unwrap();
        let (mut key, mut tx) = (reader.create_key(), reader.create_value());
        let mut n = 0;
        while reader.next(&mut key, &mut tx).unwrap() {
            n += 1;
        }
        n
    };
    assert_eq!(count(SplitRange::new(0, cut)), 1 + 4);
    assert_eq!(count(SplitRange::new(cut, len - cut)), 2);
}

#[test]
fn truncated_final_block_is_dropped_from_every_split() {
    let (mut data, starts) = four_blocks();
    data.truncate(data.len() - 10);
    let len = data.len() as u64;
    let cfg = config();

    for size in [5, 50, len] {
        let got: Vec<u64> = splits_of(len, size)
            .into_iter()
            .flat_map(|range| offsets_in(&data, range, &cfg))
            .collect();
        assert_eq!(got, starts[..3].to_vec(), "split size {size}");
    }
}

#[test]
fn markers_inside_scripts_never_hide_real_blocks() {
    let (data, starts) = false_marker_blocks();
    let len = data.len() as u64;
    let cfg = config();

    for m in 0..=len {
        let mut got = offsets_in(&data, SplitRange::new(0, m), &cfg);
        got.extend(offsets_in(&data, SplitRange::new(m, len - m), &cfg));
        assert_eq!(got, starts, "cut at {m}");
    }
    for size in [1, 9, 64, 150] {
        let got: Vec<u64> = splits_of(len, size)
            .into_iter()
            .flat_map(|range| offsets_in(&data, range, &cfg))
            .collect();
        assert_eq!(got, starts, "split size {size}");
    }
}

#[test]
fn failed_frame_is_skipped_one_byte_at_a_time() {
    let (data, starts) = false_marker_blocks();
    let len = data.len() as u64;
    let range = SplitRange::new(starts[0] + 1, len - starts[0] - 1);
    let mut reader = SplitReader::open(Cursor::new(data), range, &config()).unwrap();

    let got: Vec<u64> = reader.by_ref().map(|b| b.unwrap().offset).collect();
    assert_eq!(got, starts[1..].to_vec());
    assert_eq!(reader.blocks_skipped(), 1);
}
