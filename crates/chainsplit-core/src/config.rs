//! Reader configuration.
//!
//! `ReaderConfig` is the loose configuration bag handed over by the host
//! (deserializable from JSON). `validate()` turns it into the immutable
//! `CodecConfig` every reader is constructed with.

use crate::error::ConfigError;
use crate::magic::Magic;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_BLOCK_SIZE: u64 = 1024 * 1024;
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
pub const DEFAULT_MAGIC: &str = "F9BEB4D9";

/// Host-facing configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Upper bound for a block's declared size in bytes
    #[serde(default = "default_max_block_size")]
    pub max_block_size: u64,
    /// Accepted block markers as hex strings, e.g. `["F9BEB4D9", "0B110907"]`
    #[serde(default = "default_magic_markers")]
    pub magic_markers: Vec<String>,
    /// Read buffer capacity in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Accepted for compatibility; has no effect on this implementation
    #[serde(default)]
    pub use_direct_buffer: bool,
}

fn default_max_block_size() -> u64 { DEFAULT_MAX_BLOCK_SIZE }
fn default_magic_markers() -> Vec<String> { vec![DEFAULT_MAGIC.to_string()] }
fn default_buffer_size() -> usize { DEFAULT_BUFFER_SIZE }

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            magic_markers: default_magic_markers(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            use_direct_buffer: false,
        }
    }
}

impl ReaderConfig {
    /// Load a configuration bag from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.magic_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_block_size(mut self, n: u64) -> Self {
        self.max_block_size = n;
        self
    }

    pub fn buffer_size(mut self, n: usize) -> Self {
        self.buffer_size = n;
        self
    }

    /// Check every option and produce the immutable codec configuration.
    ///
    /// An empty marker list falls back to the mainnet marker.
    pub fn validate(&self) -> Result<CodecConfig, ConfigError> {
        if self.max_block_size == 0 || self.max_block_size > u64::from(u32::MAX) {
            return Err(ConfigError::InvalidMaxBlockSize(self.max_block_size));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }

        let raw: Vec<&str> = if self.magic_markers.is_empty() {
            vec![DEFAULT_MAGIC]
        } else {
            self.magic_markers.iter().map(String::as_str).collect()
        };

        let mut markers = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            let magic = value
                .parse::<Magic>()
                .map_err(|reason| ConfigError::InvalidMarker {
                    index,
                    value: value.to_string(),
                    reason,
                })?;
            markers.push(magic);
        }

        CodecConfig::new(markers, self.max_block_size as u32, self.buffer_size)
    }
}

/// Validated, immutable codec settings shared by the scanner, the block
/// decoder, and the split reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    markers: Vec<Magic>,
    max_block_size: u32,
    buffer_size: usize,
}

impl CodecConfig {
    pub fn new(
        markers: Vec<Magic>,
        max_block_size: u32,
        buffer_size: usize,
    ) -> Result<Self, ConfigError> {
        if markers.is_empty() {
            return Err(ConfigError::NoMarkers);
        }
        if max_block_size == 0 {
            return Err(ConfigError::InvalidMaxBlockSize(0));
        }
        if buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(Self {
            markers,
            max_block_size,
            buffer_size,
        })
    }

    /// Mainnet marker with default limits.
    pub fn mainnet() -> Self {
        Self {
            markers: vec![Magic::MAINNET],
            max_block_size: DEFAULT_MAX_BLOCK_SIZE as u32,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn markers(&self) -> &[Magic] {
        &self.markers
    }

    pub fn max_block_size(&self) -> u32 {
        self.max_block_size
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ReaderConfig::default().validate().unwrap();
        assert_eq!(cfg.markers(), &[Magic::MAINNET]);
        assert_eq!(cfg.max_block_size(), 1024 * 1024);
        assert_eq!(cfg.buffer_size(), 64 * 1024);
        assert_eq!(cfg, CodecConfig::mainnet());
    }

    #[test]
    fn empty_marker_list_falls_back_to_default() {
        let cfg = ReaderConfig::default()
            .with_markers(Vec::<String>::new())
            .validate()
            .unwrap();
        assert_eq!(cfg.markers(), &[Magic::MAINNET]);
    }

    #[test]
    fn multiple_markers_keep_order() {
        let cfg = ReaderConfig::default()
            .with_markers(["F9BEB4D9", "FABFB5DA", "0B110907"])
            .validate()
            .unwrap();
        assert_eq!(
            cfg.markers(),
            &[Magic::MAINNET, Magic::REGTEST, Magic::TESTNET3]
        );
    }

    #[test]
    fn short_marker_is_configuration_error() {
        let err = ReaderConfig::default()
            .with_markers(["F9BEB4D9", "F9BE"])
            .validate()
            .unwrap_err();
        match err {
            ConfigError::InvalidMarker { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_positive_bounds_rejected() {
        assert!(matches!(
            ReaderConfig::default().max_block_size(0).validate(),
            Err(ConfigError::InvalidMaxBlockSize(0))
        ));
        assert!(matches!(
            ReaderConfig::default().buffer_size(0).validate(),
            Err(ConfigError::InvalidBufferSize)
        ));
        assert!(matches!(
            CodecConfig::new(vec![], 10, 10),
            Err(ConfigError::NoMarkers)
        ));
    }

    #[test]
    fn json_bag_uses_defaults_for_missing_keys() {
        let cfg: ReaderConfig =
            serde_json::from_str(r#"{"magic_markers": ["0B110907"], "use_direct_buffer": true}"#)
                .unwrap();
        assert_eq!(cfg.max_block_size, DEFAULT_MAX_BLOCK_SIZE);
        assert_eq!(cfg.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!(cfg.use_direct_buffer);
        assert_eq!(cfg.validate().unwrap().markers(), &[Magic::TESTNET3]);
    }
}
