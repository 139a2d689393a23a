//! The `RecordReader` protocol a host framework drives a reader through.
//!
//! A host creates empty key/value shells once, then calls `next` repeatedly,
//! which overwrites the shells in place until it returns `false`. Progress
//! and position may be polled between calls; `close` releases the source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-agnostic record reader.
///
/// Decode failures inside a reader are logged and skipped; `next` only
/// returns `Err` for I/O failures of the underlying source.
pub trait RecordReader {
    type Key;
    type Value;

    /// An empty key shell to pass to `next`.
    fn create_key(&self) -> Self::Key;

    /// An empty value shell to pass to `next`.
    fn create_value(&self) -> Self::Value;

    /// Fill `key` and `value` with the next record.
    /// Returns `Ok(false)` once the reader's range is exhausted.
    fn next(&mut self, key: &mut Self::Key, value: &mut Self::Value) -> std::io::Result<bool>;

    /// Fraction of the assigned range consumed, in `[0, 1]`.
    fn progress(&self) -> f32;

    /// Current logical byte position in the underlying source.
    fn position(&self) -> u64;

    /// Release the underlying source. Further `next` calls return `Ok(false)`.
    fn close(&mut self) -> std::io::Result<()>;
}

/// An opaque binary record key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey(#[serde(with = "hex")] Vec<u8>);

impl RecordKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the key contents, reusing the allocation.
    pub fn set(&mut self, bytes: &[u8]) {
        self.0.clear();
        self.0.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RecordKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_previous_contents() {
        let mut key = RecordKey::new();
        assert!(key.is_empty());
        key.set(&[1, 2, 3, 4]);
        key.set(&[9, 9]);
        assert_eq!(key.as_bytes(), &[9, 9]);
        assert_eq!(key.len(), 2);
        assert_eq!(key.to_string(), "0909");
    }
}
