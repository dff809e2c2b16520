#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]

//! # memlog
//!
//! Samples process memory usage on a fixed interval and accumulates
//! mean/max statistics for benchmark comparison.
//!
//! A harness enables logging via [`LoggingConfig`], runs its workload while
//! the background sampler ticks, then calls
//! [`flush`](SamplingStatsCollector::flush) to append the accumulated
//! statistics to a plain-text log file tagged with an experiment label.
//! When logging is disabled the collector is inert: it holds no resources
//! and every operation is a defined no-op.

pub mod collector;
pub mod config;
pub mod error;
pub mod memory;
pub mod stats;

pub use collector::SamplingStatsCollector;
pub use config::{ExperimentLabel, LoggingConfig};
pub use error::{MemlogError, Result};
pub use stats::RunningStats;
