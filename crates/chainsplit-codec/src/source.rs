//! `ByteSource` — a buffered, position-tracking reader over any `Read`.
//!
//! The scanner needs to look at four bytes without consuming them and then
//! step forward one byte at a time. `peek` compacts and refills the buffer
//! whenever a window would straddle its end, so markers are found no
//! matter where a refill boundary falls. The block decoder peeks a whole
//! frame the same way, so a failed decode leaves the source untouched.

use std::io::{self, Read};

pub struct ByteSource<R> {
    inner: R,
    buf: Vec<u8>,
    head: usize,
    tail: usize,
    position: u64,
    eof: bool,
}

impl<R: Read> ByteSource<R> {
    /// Smallest buffer the source will allocate; a marker window must fit.
    pub const MIN_CAPACITY: usize = 8;

    /// Wrap `inner`, whose next byte sits at logical offset `position`.
    pub fn new(inner: R, capacity: usize, position: u64) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(Self::MIN_CAPACITY)],
            head: 0,
            tail: 0,
            position,
            eof: false,
        }
    }

    /// Logical offset of the next unconsumed byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes currently held in the buffer.
    pub fn buffered(&self) -> usize {
        self.tail - self.head
    }

    /// `true` once the inner reader is drained and the buffer is empty.
    pub fn is_exhausted(&self) -> bool {
        self.eof && self.head == self.tail
    }

    /// Make at least `n` bytes available, growing the buffer if `n` exceeds
    /// it. Returns `false` if the inner reader ends first.
    pub fn fill(&mut self, n: usize) -> io::Result<bool> {
        if self.buffered() >= n {
            return Ok(true);
        }
        if self.head > 0 {
            self.buf.copy_within(self.head..self.tail, 0);
            self.tail -= self.head;
            self.head = 0;
        }
        if n > self.buf.len() {
            self.buf.resize(n, 0);
        }
        while self.tail < n && !self.eof {
            match self.inner.read(&mut self.buf[self.tail..]) {
                Ok(0) => self.eof = true,
                Ok(k) => self.tail += k,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.buffered() >= n)
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek(&mut self, n: usize) -> io::Result<Option<&[u8]>> {
        if self.fill(n)? {
            Ok(Some(&self.buf[self.head..self.head + n]))
        } else {
            Ok(None)
        }
    }

    /// Drop `n` already-buffered bytes.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.buffered());
        self.head += n;
        self.position += n as u64;
    }

    /// Drop whatever is left in the buffer.
    pub fn consume_buffered(&mut self) {
        self.consume(self.buffered());
    }
}
