//! Prometheus counters for station runs.
//!
//! The station is a one-shot process, so metrics are rendered in text format
//! on exit rather than served.

use fmm_spine::PartOutcome;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

/// Process metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Runs attempted, by mode (`manual` or `recipe`)
pub static RUNS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("fmm_runs_total", "Station runs attempted, by mode"),
        &["mode"],
    )
    .unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Parts accepted
pub static GOOD_PARTS: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new("fmm_good_parts_total", "Parts accepted").unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Parts rejected by validation or an aborted run
pub static BAD_PARTS: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "fmm_bad_parts_total",
        "Parts rejected by validation or an aborted run",
    )
    .unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Runs that ended in an error instead of a part
pub static RUN_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "fmm_run_failures_total",
        "Runs that ended in an error (start, configuration or file access)",
    )
    .unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Simulated seconds executed by the station
pub static SECONDS_EXECUTED: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "fmm_seconds_executed_total",
        "Simulated seconds executed by the station",
    )
    .unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

pub fn init() {
    // Touch each metric to force registration
    let _ = RUNS.with_label_values(&["manual"]).get();
    let _ = RUNS.with_label_values(&["recipe"]).get();
    let _ = GOOD_PARTS.get();
    let _ = BAD_PARTS.get();
    let _ = RUN_FAILURES.get();
    let _ = SECONDS_EXECUTED.get();
}

pub fn record_run<E>(mode: &str, result: &Result<PartOutcome, E>) {
    RUNS.with_label_values(&[mode]).inc();
    match result {
        Ok(outcome) if outcome.is_good() => GOOD_PARTS.inc(),
        Ok(_) => BAD_PARTS.inc(),
        Err(_) => RUN_FAILURES.inc(),
    }
}

pub fn record_seconds(seconds: u64) {
    SECONDS_EXECUTED.inc_by(seconds);
}

pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        return format!("# metrics encoding failed: {e}\n");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
