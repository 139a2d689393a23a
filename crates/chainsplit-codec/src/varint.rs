//! Compact variable-length unsigned integers.
//!
//! | first byte | value                 | bytes |
//! |------------|-----------------------|-------|
//! | `< 0xFD`   | the byte itself       | 1     |
//! | `0xFD`     | next 2 bytes, LE      | 3     |
//! | `0xFE`     | next 4 bytes, LE      | 5     |
//! | `0xFF`     | next 8 bytes, LE      | 9     |

use crate::wire::WireRead;
use chainsplit_core::error::DecodeError;

/// Decode one variable-length integer.
pub fn read_varint<W: WireRead>(r: &mut W, field: &'static str) -> Result<u64, DecodeError> {
    match r.read_u8(field)? {
        0xFD => Ok(u64::from(r.read_u16_le(field)?)),
        0xFE => Ok(u64::from(r.read_u32_le(field)?)),
        0xFF => r.read_u64_le(field),
        b => Ok(u64::from(b)),
    }
}

/// Encoded width of `value` in bytes.
pub fn varint_len(value: u64) -> usize {
    match value {
        0..=0xFC => 1,
        0xFD..=0xFFFF => 3,
        0x1_0000..=0xFFFF_FFFF => 5,
        _ => 9,
    }
}

/// Append the encoding of `value` to `out`.
#[cfg(any(test, feature = "testkit"))]
pub fn encode_varint(value: u64, out: &mut Vec<u8>) {
    match varint_len(value) {
        1 => out.push(value as u8),
        3 => {
            out.push(0xFD);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        5 => {
            out.push(0xFE);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xFF);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::SliceReader;

    fn roundtrip(v: u64) -> usize {
        let mut buf = Vec::new();
        encode_varint(v, &mut buf);
        let mut r = SliceReader::new(&buf, 0);
        assert_eq!(read_varint(&mut r, "n").unwrap(), v, "value {v}");
        assert_eq!(r.remaining(), 0);
        buf.len()
    }

    #[test]
    fn size_classes() {
        for v in [0, 1, 100, 252] {
            assert_eq!(roundtrip(v), 1);
        }
        for v in [253, 254, 0x1234, 65_535] {
            assert_eq!(roundtrip(v), 3);
        }
        for v in [65_536, 0x00AB_CDEF, u64::from(u32::MAX)] {
            assert_eq!(roundtrip(v), 5);
        }
        for v in [1u64 << 32, 0x0123_4567_89AB_CDEF, u64::MAX] {
            assert_eq!(roundtrip(v), 9);
        }
    }

    #[test]
    fn wire_examples() {
        let cases: &[(&[u8], u64)] = &[
            (&[0x4d], 77),
            (&[0xfd, 0xfd, 0x00], 253),
            (&[0xfe, 0x00, 0x00, 0x01, 0x00], 65_536),
            (&[0xff, 0, 0, 0, 0, 1, 0, 0, 0], 1u64 << 32),
        ];
        for (bytes, expected) in cases {
            let mut r = SliceReader::new(bytes, 0);
            assert_eq!(read_varint(&mut r, "n").unwrap(), *expected);
            assert_eq!(varint_len(*expected), bytes.len());
        }
    }

    #[test]
    fn truncated_prefix_fails() {
        for bytes in [&[0u8; 0][..], &[0xfd, 0x01][..], &[0xfe, 0, 0, 0][..], &[0xff, 0, 0][..]] {
            let mut r = SliceReader::new(bytes, 0);
            assert!(matches!(
                read_varint(&mut r, "input count"),
                Err(DecodeError::TruncatedInput { field: "input count", .. })
            ));
        }
    }
}
