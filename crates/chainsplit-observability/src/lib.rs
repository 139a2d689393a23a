//! # chainsplit-observability
//!
//! Structured logging for ChainSplit.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`init_tracing`] once to install a subscriber. Logs go to stderr so that
//! record output on stdout stays machine-readable. Levels are configurable
//! globally and per component, and `RUST_LOG` overrides both.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
