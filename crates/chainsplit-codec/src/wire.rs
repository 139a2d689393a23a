//! Fixed-width little-endian primitives.
//!
//! `WireRead` is implemented by `SliceReader`, which walks a frame already
//! peeked from the stream. Every read names the field it is decoding so
//! truncation errors say what was being read and where.

use chainsplit_core::error::DecodeError;

/// A cursor that yields fixed-width fields.
pub trait WireRead {
    /// Absolute offset of the next unread byte.
    fn offset(&self) -> u64;

    /// Fill `buf` completely or fail with `TruncatedInput`.
    fn read_into(&mut self, buf: &mut [u8], field: &'static str) -> Result<(), DecodeError>;

    /// Read exactly `len` opaque bytes.
    ///
    /// The default reads in bounded chunks so a corrupt length cannot force
    /// a huge allocation before the source runs dry.
    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(len.min(CHUNK));
        let mut chunk = [0u8; CHUNK];
        let mut left = len;
        while left > 0 {
            let n = left.min(CHUNK);
            self.read_into(&mut chunk[..n], field)?;
            out.extend_from_slice(&chunk[..n]);
            left -= n;
        }
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError>
    where
        Self: Sized,
    {
        let mut buf = [0u8; N];
        self.read_into(&mut buf, field)?;
        Ok(buf)
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError>
    where
        Self: Sized,
    {
        Ok(self.read_array::<1>(field)?[0])
    }

    fn read_u16_le(&mut self, field: &'static str) -> Result<u16, DecodeError>
    where
        Self: Sized,
    {
        Ok(u16::from_le_bytes(self.read_array(field)?))
    }

    fn read_u32_le(&mut self, field: &'static str) -> Result<u32, DecodeError>
    where
        Self: Sized,
    {
        Ok(u32::from_le_bytes(self.read_array(field)?))
    }

    fn read_i32_le(&mut self, field: &'static str) -> Result<i32, DecodeError>
    where
        Self: Sized,
    {
        Ok(i32::from_le_bytes(self.read_array(field)?))
    }

    fn read_u64_le(&mut self, field: &'static str) -> Result<u64, DecodeError>
    where
        Self: Sized,
    {
        Ok(u64::from_le_bytes(self.read_array(field)?))
    }

    fn read_i64_le(&mut self, field: &'static str) -> Result<i64, DecodeError>
    where
        Self: Sized,
    {
        Ok(i64::from_le_bytes(self.read_array(field)?))
    }
}

const CHUNK: usize = 4096;

/// A bounds-checked cursor over an in-memory byte slice.
///
/// `base` is the absolute offset of `data[0]` in the original source, so
/// errors report file offsets rather than slice offsets.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8], base: u64) -> Self {
        Self { data, pos: 0, base }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The bytes consumed since an earlier `position()`.
    pub fn consumed_since(&self, mark: usize) -> &'a [u8] {
        &self.data[mark.min(self.pos)..self.pos]
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::TruncatedInput {
                offset: self.offset(),
                field,
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }
}

impl WireRead for SliceReader<'_> {
    fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    fn read_into(&mut self, buf: &mut [u8], field: &'static str) -> Result<(), DecodeError> {
        buf.copy_from_slice(self.take(buf.len(), field)?);
        Ok(())
    }

    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        Ok(self.take(len, field)?.to_vec())
    }
}
