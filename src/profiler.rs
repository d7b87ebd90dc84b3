//! Single-threaded phase timing and hash-table statistics capture.
//!
//! Mirrors the teacher's `MetricsCollector` in spirit (a small owned struct
//! accumulating observations the caller pulls out later via a snapshot
//! accessor) but is phase-timed rather than free-form: a join has exactly
//! two phases, build and probe, and the profiler only ever measures one join.

use crate::hash::HashTableStats;
use std::time::{Duration, Instant};

/// A snapshot of one join's timing and selectivity, returned by [`Profiler::data`].
#[derive(Debug, Clone, Default)]
pub struct ProfileData {
    /// Time from `start()` to `mark_build_complete()`.
    pub build_time: Duration,
    /// Time from `mark_build_complete()` to `mark_probe_complete()`.
    pub probe_time: Duration,
    /// `build_time + probe_time`.
    pub total_time: Duration,
    /// The build-side hash table's final statistics, if recorded.
    pub hash_stats: Option<HashTableStats>,
    /// The running maximum of every recorded `hash_stats.memory_usage`.
    pub peak_memory_usage: usize,
    /// Rows emitted by the join.
    pub result_rows: usize,
    /// `left_rows * right_rows`, the Cartesian-product baseline.
    pub cartesian_rows: usize,
    /// `result_rows / cartesian_rows` as a percentage, or `0.0` if the
    /// Cartesian baseline is zero.
    pub selectivity_pct: f64,
}

/// Phase-timed observer for a single [`crate::join::JoinEngine::hash_join`] call.
///
/// Operations are meant to be called in order: `start`, `mark_build_complete`,
/// `mark_probe_complete`, `record_hash_stats` (zero or more times),
/// `record_results`, `stop`. Calling them out of order does not panic; a
/// phase boundary that was never marked simply reports a zero duration.
#[derive(Debug, Default)]
pub struct Profiler {
    started_at: Option<Instant>,
    build_complete_at: Option<Instant>,
    probe_complete_at: Option<Instant>,
    data: ProfileData,
}

impl Profiler {
    /// A profiler with no recorded timings yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of the build phase.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Marks the build phase complete, starting the probe phase's clock.
    pub fn mark_build_complete(&mut self) {
        self.build_complete_at = Some(Instant::now());
    }

    /// Marks the probe phase complete.
    pub fn mark_probe_complete(&mut self) {
        self.probe_complete_at = Some(Instant::now());
    }

    /// Records a hash-table statistics snapshot, updating peak memory usage.
    pub fn record_hash_stats(&mut self, stats: HashTableStats) {
        self.data.peak_memory_usage = self.data.peak_memory_usage.max(stats.memory_usage);
        self.data.hash_stats = Some(stats);
    }

    /// Records the join's output size against its Cartesian-product baseline.
    pub fn record_results(&mut self, result_rows: usize, cartesian_rows: usize) {
        self.data.result_rows = result_rows;
        self.data.cartesian_rows = cartesian_rows;
        self.data.selectivity_pct = if cartesian_rows > 0 {
            result_rows as f64 / cartesian_rows as f64 * 100.0
        } else {
            0.0
        };
    }

    /// Finalizes the timing fields from the recorded instants. Safe to call
    /// more than once; later calls simply recompute from the same instants.
    pub fn stop(&mut self) {
        let build_time = match (self.started_at, self.build_complete_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        };
        let probe_time = match (self.build_complete_at, self.probe_complete_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        };
        self.data.build_time = build_time;
        self.data.probe_time = probe_time;
        self.data.total_time = build_time + probe_time;
    }

    /// The current snapshot. Call `stop()` first to ensure timings are finalized.
    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    /// Prints a human-readable report of the current snapshot. If `start()`
    /// was never called, prints a single "no data" line and returns.
    pub fn print_report(&self) {
        if self.started_at.is_none() {
            println!("Profiler: no data recorded");
            return;
        }
        println!("--- Profile Report ---");
        println!("build time:   {:?}", self.data.build_time);
        println!("probe time:   {:?}", self.data.probe_time);
        println!("total time:   {:?}", self.data.total_time);
        if let Some(stats) = &self.data.hash_stats {
            println!(
                "hash table:   {} buckets, {} used, {} entries, {} collisions, load factor {:.3}",
                stats.total_buckets,
                stats.used_buckets,
                stats.total_entries,
                stats.collisions,
                stats.load_factor
            );
        }
        println!("peak memory:  {} bytes", self.data.peak_memory_usage);
        println!(
            "result rows:  {} / {} ({:.2}% selectivity)",
            self.data.result_rows, self.data.cartesian_rows, self.data.selectivity_pct
        );
        println!("----------------------");
    }
}
