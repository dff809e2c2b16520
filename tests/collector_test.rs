#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! End-to-end scenarios for the sampling statistics collector

use std::thread;
use std::time::Duration;

use memlog::{LoggingConfig, MemlogError, SamplingStatsCollector};

#[test]
fn disabled_collector_is_inert() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mem.log");
    let config = LoggingConfig::disabled().with_output_path(path.clone());

    let mut collector = SamplingStatsCollector::new(&config).unwrap();
    assert!(!collector.is_enabled());

    // Every operation is a defined no-op
    collector.sample();
    collector.record(42.0);
    collector.reset();
    collector.flush(3).unwrap();
    collector.shutdown();

    assert_eq!(collector.sample_count(), 0);
    assert_eq!(collector.invalid_samples(), 0);
    assert!(!path.exists());
}

#[test]
fn enabled_collector_samples_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mem.log");
    let config =
        LoggingConfig::enabled("run-7", "suite-a", "window=5").with_output_path(path.clone());

    let mut collector = SamplingStatsCollector::new(&config).unwrap();
    assert!(collector.is_enabled());

    // 50ms initial delay + 100ms period: several ticks fit in this window
    thread::sleep(Duration::from_millis(400));
    collector.shutdown();

    // Every tick lands either in the stats or in the invalid counter
    assert!(collector.sample_count() + collector.invalid_samples() > 0);

    collector.flush(0).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.is_empty());
    for line in contents.lines() {
        assert!(line.starts_with("run-7 suite-a window=5 "));
    }
}

#[test]
fn on_demand_sample_uses_same_accumulator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mem.log");
    let config = LoggingConfig::enabled("run-1", "suite-b", "n=10").with_output_path(path);

    let mut collector = SamplingStatsCollector::new(&config).unwrap();
    collector.sample();
    collector.shutdown();

    assert!(collector.sample_count() + collector.invalid_samples() > 0);
}

#[test]
fn log_directory_is_created_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("baseline-mem.log");
    let config =
        LoggingConfig::enabled("run-2", "suite-c", "depth=2").with_output_path(path.clone());

    let mut collector = SamplingStatsCollector::new(&config).unwrap();
    collector.record(12.0);
    collector.flush(0).unwrap();
    collector.shutdown();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "run-2 suite-c depth=2 MEMORY (mean/max) 12.0 12.0\n"
    );
}

#[test]
fn unopenable_destination_aborts_construction() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the destination path makes the append-open fail
    let path = dir.path().join("mem.log");
    std::fs::create_dir(&path).unwrap();

    let config = LoggingConfig::enabled("run-3", "suite-d", "k=1").with_output_path(path);
    let collector = SamplingStatsCollector::new(&config);

    assert!(matches!(collector, Err(MemlogError::LogOpenFailed { .. })));
}

#[test]
fn shutdown_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig::enabled("run-4", "suite-e", "m=8")
        .with_output_path(dir.path().join("mem.log"));

    let mut collector = SamplingStatsCollector::new(&config).unwrap();
    collector.shutdown();
    collector.shutdown();
}
