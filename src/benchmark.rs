//! Parameter-sweep benchmarks over the join engine and hash table.
//!
//! Grounded in `original_source/src/benchmark_suite.cpp`'s three sweeps.
//! This is harness code, not library surface other crates would consume —
//! it exists so the CLI's `benchmark` subcommand and the criterion group in
//! `benches/hash_join_bench.rs` share one definition of what gets measured.

use crate::hash::CollisionStrategy;
use crate::join::{JoinEngine, JoinType};
use crate::loader::DataLoader;

/// For table sizes `{1_000, 10_000, 100_000}` x both collision strategies,
/// joins a left table of that size against a right table of half that size
/// on `"value"` under `Inner`, printing build/probe/total time, load
/// factor, and collision count per combination.
pub fn run_hash_table_benchmark() {
    println!("-- hash table benchmark --");
    for &size in &[1_000usize, 10_000, 100_000] {
        let left = DataLoader::generate_test_table("left", size, 101);
        let right = DataLoader::generate_test_table("right", size / 2, 103);
        for strategy in [CollisionStrategy::Chaining, CollisionStrategy::LinearProbing] {
            let mut engine = JoinEngine::new();
            engine
                .hash_join(&left, "value", &right, "value", JoinType::Inner, strategy)
                .expect("generated tables always have a 'value' column");
            let data = engine.profiler().data();
            let stats = data.hash_stats.as_ref();
            println!(
                "size={size:>7} strategy={strategy:?} build={:?} probe={:?} total={:?} load_factor={:.3} collisions={}",
                data.build_time,
                data.probe_time,
                data.total_time,
                stats.map(|s| s.load_factor).unwrap_or(0.0),
                stats.map(|s| s.collisions).unwrap_or(0),
            );
        }
    }
}

/// Fixed 10,000-row left / 5,000-row right tables, run under all four
/// [`JoinType`]s, printing timings, result row count, and selectivity.
pub fn run_join_type_benchmark() {
    println!("-- join type benchmark --");
    let left = DataLoader::generate_test_table("left", 10_000, 107);
    let right = DataLoader::generate_test_table("right", 5_000, 109);
    for join_type in [JoinType::Inner, JoinType::LeftOuter, JoinType::RightOuter, JoinType::FullOuter] {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(&left, "value", &right, "value", join_type, CollisionStrategy::Chaining)
            .expect("generated tables always have a 'value' column");
        let data = engine.profiler().data();
        println!(
            "{join_type:?}: total={:?} rows={} selectivity={:.2}%",
            data.total_time,
            result.row_count(),
            data.selectivity_pct,
        );
    }
}

/// A cross product of left/right sizes `{1_000, 5_000, 10_000, 50_000}`,
/// joined on `"value"` under the default `Inner` / `Chaining` combination,
/// printing total time, memory usage, result rows, and throughput (rows/ms).
pub fn run_scalability_benchmark() {
    println!("-- scalability benchmark --");
    let sizes = [1_000usize, 5_000, 10_000, 50_000];
    for &left_size in &sizes {
        for &right_size in &sizes {
            let left = DataLoader::generate_test_table("left", left_size, 113);
            let right = DataLoader::generate_test_table("right", right_size, 127);
            let mut engine = JoinEngine::new();
            let result = engine
                .hash_join(&left, "value", &right, "value", JoinType::Inner, CollisionStrategy::Chaining)
                .expect("generated tables always have a 'value' column");
            let data = engine.profiler().data();
            let millis = data.total_time.as_secs_f64() * 1000.0;
            let throughput = if millis > 0.0 {
                result.row_count() as f64 / millis
            } else {
                0.0
            };
            println!(
                "left={left_size:>6} right={right_size:>6}: total={:?} memory={}B rows={} throughput={:.1} rows/ms",
                data.total_time,
                data.peak_memory_usage,
                result.row_count(),
                throughput,
            );
        }
    }
}
