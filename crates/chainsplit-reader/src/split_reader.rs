//! `SplitReader` — sequences the scanner and block decoder over one split.
//!
//! Ownership rule: a block belongs to the split whose range contains the
//! offset of its magic marker. The body may run past the split's end; the
//! reader still decodes it in full, and the next split's reader never sees
//! that marker because its own scan starts after it. Readers over adjacent
//! splits therefore decode every block exactly once without coordinating.

use chainsplit_codec::{BlockDecoder, ByteSource, MagicScanner};
use chainsplit_core::{
    config::CodecConfig, error::DecodeError, split::SplitRange, types::Block,
};
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{debug, warn};

pub struct SplitReader<R> {
    /// `None` once closed
    source: Option<ByteSource<R>>,
    scanner: MagicScanner,
    decoder: BlockDecoder,
    range: SplitRange,
    pos: u64,
    blocks_read: u64,
    blocks_skipped: u64,
}

impl<R: Read + Seek> SplitReader<R> {
    /// Seek `inner` to the split start and realign onto the first marker.
    pub fn open(mut inner: R, range: SplitRange, config: &CodecConfig) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(range.start))?;
        Self::positioned(inner, range, config)
    }
}

impl<R: Read> SplitReader<R> {
    /// Build a reader over a source whose next byte is already `range.start`
    /// (e.g. a stream handed over by a decompressor).
    pub fn positioned(inner: R, range: SplitRange, config: &CodecConfig) -> io::Result<Self> {
        let mut source = ByteSource::new(inner, config.buffer_size(), range.start);
        let scanner = MagicScanner::from_config(config);

        // The split boundary was chosen without knowledge of block
        // boundaries; skip forward to the first marker this split owns.
        let first = scanner.seek(&mut source, Some(range.end()))?;
        debug!(
            split_start = range.start,
            split_end = range.end(),
            first_marker = ?first.map(|m| m.offset),
            "split reader initialised"
        );

        Ok(Self {
            pos: source.position(),
            source: Some(source),
            scanner,
            decoder: BlockDecoder::new(config),
            range,
            blocks_read: 0,
            blocks_skipped: 0,
        })
    }

    /// Decode the next block owned by this split.
    ///
    /// Corrupt or oversized blocks are logged and skipped; scanning resumes
    /// one byte after the failed marker. Returns `Ok(None)` once no marker
    /// remains inside the split.
    pub fn next_block(&mut self) -> io::Result<Option<Block>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        let end = self.range.end();

        loop {
            // A block belongs to the split holding its marker.
            let owned = self
                .scanner
                .seek(source, Some(end))?
                .filter(|m| self.range.owns(m.offset));
            let Some(marker) = owned else {
                self.pos = source.position();
                return Ok(None);
            };

            match self.decoder.decode(source) {
                Ok(block) => {
                    self.pos = source.position();
                    self.blocks_read += 1;
                    return Ok(Some(block));
                }
                Err(DecodeError::Io(e)) => return Err(e),
                Err(e) => {
                    // The failed frame is still unconsumed; real markers
                    // may sit inside it, so step over the marker only.
                    source.consume(1);
                    self.pos = source.position();
                    self.blocks_skipped += 1;
                    warn!(
                        offset = marker.offset,
                        marker = %marker.magic,
                        split_start = self.range.start,
                        error = %e,
                        "skipping undecodable block"
                    );
                }
            }
        }
    }

    pub fn range(&self) -> SplitRange {
        self.range
    }

    /// Logical position in the underlying source.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Fraction of the split consumed, clamped to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.range.length == 0 {
            return 0.0;
        }
        let done = self.pos.saturating_sub(self.range.start) as f64;
        (done / self.range.length as f64).clamp(0.0, 1.0) as f32
    }

    pub fn blocks_read(&self) -> u64 {
        self.blocks_read
    }

    pub fn blocks_skipped(&self) -> u64 {
        self.blocks_skipped
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Release the underlying source.
    pub fn close(&mut self) -> io::Result<()> {
        if self.source.take().is_some() {
            debug!(
                split_start = self.range.start,
                blocks = self.blocks_read,
                skipped = self.blocks_skipped,
                "split reader closed"
            );
        }
        Ok(())
    }
}

impl<R: Read> Iterator for SplitReader<R> {
    type Item = io::Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}
