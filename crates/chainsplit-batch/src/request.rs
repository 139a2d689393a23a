//! Batch job configuration.

use crate::plan::DEFAULT_SPLIT_SIZE;
use chainsplit_core::config::ReaderConfig;
use std::path::PathBuf;

/// Progress callback: `(splits_done, splits_total)`.
pub type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Configuration for a batch job over one file.
pub struct BatchRequest {
    /// The block dump file to read
    pub path: PathBuf,
    /// Codec settings shared by every split's reader
    pub config: ReaderConfig,
    /// Bytes per split (0 = whole file as one split)
    pub split_size: u64,
    /// Number of parallel Rayon workers (0 = use all available CPUs)
    pub concurrency: usize,
    /// Optional progress callback, invoked once per finished split
    pub on_progress: Option<ProgressFn>,
}

impl BatchRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: ReaderConfig::default(),
            split_size: DEFAULT_SPLIT_SIZE,
            concurrency: 0,
            on_progress: None,
        }
    }

    pub fn config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn split_size(mut self, n: u64) -> Self {
        self.split_size = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}
