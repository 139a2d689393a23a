//! # chainsplit-batch
//!
//! Local-file host for the split readers.
//!
//! ## Features
//! - Split planning over a file of known length
//! - One independent `BlockRecordReader` per split, run on a Rayon pool
//! - Progress callbacks (for progress bars / ETAs)
//! - Per-split statistics
//!
//! ## Usage
//! ```no_run
//! use chainsplit_batch::{BatchEngine, BatchRequest};
//!
//! let req = BatchRequest::new("blk00000.dat").split_size(32 << 20).concurrency(8);
//! let result = BatchEngine::new().run(&req)?;
//! println!("{} blocks", result.blocks.len());
//! # Ok::<(), chainsplit_core::BatchError>(())
//! ```

pub mod engine;
pub mod plan;
pub mod request;

pub use engine::{BatchEngine, BatchResult, SplitStats};
pub use plan::{plan_splits, DEFAULT_SPLIT_SIZE};
pub use request::{BatchRequest, ProgressFn};
