//! Lightweight atomic counters (C9), grounded on the teacher's
//! `graphstore/metrics.rs` — the same pattern of a struct of `AtomicU64`s
//! with a `snapshot()` method returning a plain-data copy for callers that
//! want to log or export it without touching atomics themselves.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    pub(crate) edges_hydrated: AtomicU64,
    pub(crate) hydration_runs: AtomicU64,
    pub(crate) compactions: AtomicU64,
    pub(crate) traversals: AtomicU64,
    pub(crate) matches: AtomicU64,
    pub(crate) snapshot_saves: AtomicU64,
    pub(crate) snapshot_loads: AtomicU64,
}

/// Plain-data copy of [`Metrics`] at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub edges_hydrated: u64,
    pub hydration_runs: u64,
    pub compactions: u64,
    pub traversals: u64,
    pub matches: u64,
    pub snapshot_saves: u64,
    pub snapshot_loads: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            edges_hydrated: self.edges_hydrated.load(Ordering::Relaxed),
            hydration_runs: self.hydration_runs.load(Ordering::Relaxed),
            compactions: self.compactions.load(Ordering::Relaxed),
            traversals: self.traversals.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            snapshot_saves: self.snapshot_saves.load(Ordering::Relaxed),
            snapshot_loads: self.snapshot_loads.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_traversal(&self) {
        self.traversals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_snapshot_save(&self) {
        self.snapshot_saves.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_snapshot_load(&self) {
        self.snapshot_loads.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
