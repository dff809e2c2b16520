#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Sampling statistics collector with a background timer

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{ExperimentLabel, LoggingConfig};
use crate::error::{MemlogError, Result};
use crate::memory;
use crate::stats::RunningStats;

/// Delay before the first sample is taken
const INITIAL_DELAY: Duration = Duration::from_millis(50);

/// Interval between samples
const SAMPLING_PERIOD: Duration = Duration::from_millis(100);

/// Accumulator state shared between the sampler thread and the caller
#[derive(Debug, Default)]
struct SampleState {
    /// Statistics over valid readings
    stats: RunningStats,

    /// Readings rejected as not well-formed numbers; survives `reset()`
    invalid_samples: u64,
}

/// Samples process memory usage on a fixed interval and accumulates
/// mean/max statistics for later persistence
///
/// Constructed once per process from a [`LoggingConfig`]. When disabled it
/// holds no resources and every operation is a no-op. When enabled it owns
/// an append-mode log file and a background sampler thread which ticks every
/// 100 ms after an initial 50 ms delay; the thread is stopped and joined on
/// [`shutdown`](Self::shutdown) or drop.
pub struct SamplingStatsCollector {
    inner: Option<Inner>,
}

struct Inner {
    label: ExperimentLabel,
    state: Arc<Mutex<SampleState>>,
    log_file: Mutex<File>,
    stop: Arc<AtomicBool>,
    sampler: Option<thread::JoinHandle<()>>,
}

impl SamplingStatsCollector {
    /// Create a collector from the given configuration
    ///
    /// # Errors
    ///
    /// Returns error (and no collector starts) if logging is enabled and:
    /// - any of the three mandatory label keys is missing or empty
    /// - the log destination cannot be created or opened
    /// - the sampler thread cannot be spawned
    ///
    /// A disabled configuration never fails.
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        if !config.is_enabled() {
            info!("memory logging not activated");
            return Ok(Self { inner: None });
        }

        let label = config.experiment_label()?;
        let log_file = open_log_destination(config.output_path())?;

        info!(
            path = %config.output_path().display(),
            label = %label,
            "memory logging activated"
        );

        let state = Arc::new(Mutex::new(SampleState::default()));
        let stop = Arc::new(AtomicBool::new(false));
        let sampler = spawn_sampler(Arc::clone(&state), Arc::clone(&stop))?;

        Ok(Self {
            inner: Some(Inner {
                label,
                state,
                log_file: Mutex::new(log_file),
                stop,
                sampler: Some(sampler),
            }),
        })
    }

    /// Whether the collector is actively logging
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Take one memory reading on demand
    ///
    /// Reads current usage and folds it into the accumulator exactly as a
    /// timer tick would; unreadable or non-finite readings increment the
    /// invalid-sample counter instead. No-op when disabled.
    pub fn sample(&self) {
        if let Some(inner) = &self.inner {
            record_reading(&inner.state);
        }
    }

    /// Fold one externally measured reading into the accumulator
    ///
    /// For harnesses that probe memory at their own event boundaries. Applies
    /// the same invalid-sample filtering as [`sample`](Self::sample). No-op
    /// when disabled.
    pub fn record(&self, value: f64) {
        if let Some(inner) = &self.inner {
            fold_value(&inner.state, Ok(value));
        }
    }

    /// Clear the statistics accumulator back to empty
    ///
    /// The invalid-sample counter is deliberately left untouched, matching
    /// the harness contract. No-op when disabled.
    pub fn reset(&self) {
        if let Some(inner) = &self.inner {
            lock(&inner.state).stats.reset();
        }
    }

    /// Append accumulated statistics to the log file
    ///
    /// Writes `"<label> MEMORY (mean/max) <mean> <max>"` when at least one
    /// valid sample has been taken, and `"<label> NaN (totalCount) <n>"` when
    /// any invalid samples were seen. Data is synced to disk before this
    /// returns. `match_count` is accepted for call-site compatibility with
    /// richer log formats and is not part of the current output. No-op when
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns error if appending or syncing the log file fails.
    pub fn flush(&self, match_count: u64) -> Result<()> {
        let Some(inner) = &self.inner else {
            return Ok(());
        };
        let _ = match_count;

        let (stats, invalid_samples) = {
            let state = lock(&inner.state);
            (state.stats, state.invalid_samples)
        };

        let label = &inner.label;
        let mut file = lock(&inner.log_file);

        if let (Some(mean), Some(max)) = (stats.mean(), stats.max()) {
            writeln!(file, "{label} MEMORY (mean/max) {mean:.1} {max:.1}")
                .map_err(|e| MemlogError::LogWriteFailed(e.to_string()))?;
        }

        if invalid_samples > 0 {
            writeln!(file, "{label} NaN (totalCount) {invalid_samples}")
                .map_err(|e| MemlogError::LogWriteFailed(e.to_string()))?;
        }

        file.sync_all()
            .map_err(|e| MemlogError::LogWriteFailed(e.to_string()))?;

        debug!(
            samples = stats.count(),
            invalid = invalid_samples,
            "flushed memory statistics"
        );

        Ok(())
    }

    /// Stop the background sampler and join its thread
    ///
    /// Idempotent; also invoked on drop. No-op when disabled.
    pub fn shutdown(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.stop.store(true, Ordering::Relaxed);
            if let Some(handle) = inner.sampler.take() {
                if handle.join().is_err() {
                    warn!("sampler thread panicked during shutdown");
                }
                debug!("sampler thread stopped");
            }
        }
    }

    /// Number of valid samples accumulated so far (0 when disabled)
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| lock(&inner.state).stats.count())
    }

    /// Number of invalid samples seen so far (0 when disabled)
    #[must_use]
    pub fn invalid_samples(&self) -> u64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| lock(&inner.state).invalid_samples)
    }
}

impl Drop for SamplingStatsCollector {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Create the log file's parent directory and open it in append mode
fn open_log_destination(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MemlogError::log_open_failed(path, e.to_string()))
}

/// Spawn the background sampler thread
fn spawn_sampler(
    state: Arc<Mutex<SampleState>>,
    stop: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("memlog-sampler".to_string())
        .spawn(move || {
            thread::sleep(INITIAL_DELAY);
            while !stop.load(Ordering::Relaxed) {
                record_reading(&state);
                thread::sleep(SAMPLING_PERIOD);
            }
        })
        .map_err(|e| MemlogError::SamplerSpawnFailed(e.to_string()))
}

/// Take one reading and fold it into the shared state
fn record_reading(state: &Mutex<SampleState>) {
    let reading = memory::used_memory_mb();
    if let Err(e) = &reading {
        warn!("failed to read memory usage: {e}");
    }
    fold_value(state, reading);
}

/// Fold a reading into the accumulator, counting invalid values instead of
/// surfacing them
fn fold_value(state: &Mutex<SampleState>, reading: Result<f64>) {
    let mut state = lock(state);
    match reading {
        Ok(value) if value.is_finite() => state.stats.add(value),
        Ok(_) | Err(_) => state.invalid_samples += 1,
    }
}

/// Lock a mutex, recovering the data from a poisoned lock
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
