//! `MagicScanner` — realigns a byte source onto the next block marker.
//!
//! The scanner slides a 4-byte window forward one byte at a time. It never
//! tests a window that starts at or after the caller's `end` offset: a
//! marker there belongs to the next split's reader.

use crate::source::ByteSource;
use chainsplit_core::{config::CodecConfig, error::ConfigError, magic::Magic};
use std::io::{self, Read};
use tracing::trace;

/// Where a marker was found and which one it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Offset of the marker's first byte
    pub offset: u64,
    /// Index into the configured marker list
    pub index: usize,
    pub magic: Magic,
}

#[derive(Debug, Clone)]
pub struct MagicScanner {
    markers: Vec<Magic>,
}

impl MagicScanner {
    pub fn new(markers: Vec<Magic>) -> Result<Self, ConfigError> {
        if markers.is_empty() {
            return Err(ConfigError::NoMarkers);
        }
        Ok(Self { markers })
    }

    /// Build a scanner from raw marker byte strings, each of which must be
    /// exactly four bytes long.
    pub fn from_raw<B: AsRef<[u8]>>(markers: &[B]) -> Result<Self, ConfigError> {
        let parsed = markers
            .iter()
            .enumerate()
            .map(|(index, m)| {
                let bytes = m.as_ref();
                <[u8; 4]>::try_from(bytes)
                    .map(Magic)
                    .map_err(|_| ConfigError::InvalidMarker {
                        index,
                        value: format!("{bytes:02x?}"),
                        reason: format!("expected 4 bytes, got {}", bytes.len()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            markers: config.markers().to_vec(),
        }
    }

    pub fn markers(&self) -> &[Magic] {
        &self.markers
    }

    /// Index of the configured marker equal to `window`, if any.
    pub fn match_at(&self, window: &[u8]) -> Option<usize> {
        self.markers.iter().position(|m| m.as_bytes() == window)
    }

    /// Advance `source` until its next four bytes are a configured marker.
    ///
    /// On a match the source is left positioned *at* the marker. Returns
    /// `Ok(None)` when the source is exhausted or the position reaches `end`
    /// (exclusive) first. Pass `end = None` to scan without a bound.
    pub fn seek<R: Read>(
        &self,
        source: &mut ByteSource<R>,
        end: Option<u64>,
    ) -> io::Result<Option<MarkerMatch>> {
        loop {
            if end.is_some_and(|end| source.position() >= end) {
                return Ok(None);
            }
            let index = match source.peek(4)? {
                Some(window) => self.match_at(window),
                None => {
                    source.consume_buffered();
                    return Ok(None);
                }
            };
            if let Some(index) = index {
                let offset = source.position();
                trace!(offset, marker = %self.markers[index], "magic marker found");
                return Ok(Some(MarkerMatch {
                    offset,
                    index,
                    magic: self.markers[index],
                }));
            }
            source.consume(1);
        }
    }

    /// Lazily yield every marker before `end`, stepping one byte past each
    /// match. The sequence is finite and can be restarted by calling
    /// `matches` again on the same source.
    pub fn matches<'a, R: Read>(
        &'a self,
        source: &'a mut ByteSource<R>,
        end: Option<u64>,
    ) -> Matches<'a, R> {
        Matches {
            scanner: self,
            source,
            end,
            done: false,
        }
    }
}

pub struct Matches<'a, R> {
    scanner: &'a MagicScanner,
    source: &'a mut ByteSource<R>,
    end: Option<u64>,
    done: bool,
}

impl<R: Read> Iterator for Matches<'_, R> {
    type Item = io::Result<MarkerMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.seek(self.source, self.end) {
            Ok(Some(m)) => {
                self.source.consume(1);
                Some(Ok(m))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
