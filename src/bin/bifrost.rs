//! Command-line harness around the Bifrost join engine.
//!
//! Dispatches on the first argument: `demo` runs small inline joins under
//! every join type, `advanced` exercises every `JoinType` x
//! `CollisionStrategy` combination over generated tables, `benchmark` runs
//! the three parameter sweeps in [`bifrost::benchmark`], `memory` stresses
//! a 100k-row join, and `all` runs the four in sequence. No subcommand, or
//! an unrecognised one, prints usage to stderr and exits `1`. Any uncaught
//! error also prints to stderr and exits `1`.

use bifrost::{benchmark, CollisionStrategy, DataLoader, JoinEngine, JoinType, Row, Table};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bifrost", about = "In-memory relational hash join engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Small inline tables, every join type, under the chaining strategy.
    Demo,
    /// Every JoinType x CollisionStrategy combination over generated tables.
    Advanced,
    /// The three parameter-sweep benchmarks.
    Benchmark,
    /// A 100,000-row stress join, reporting peak memory usage.
    Memory,
    /// Demo, then advanced, then benchmark, then memory.
    All,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("usage: bifrost <demo|advanced|benchmark|memory|all>");
        std::process::exit(1);
    };

    let result = match command {
        Command::Demo => run_demo(),
        Command::Advanced => run_advanced(),
        Command::Benchmark => run_benchmark(),
        Command::Memory => run_memory(),
        Command::All => run_demo()
            .and_then(|_| run_advanced())
            .and_then(|_| run_benchmark())
            .and_then(|_| run_memory()),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn inline_left() -> anyhow::Result<Table> {
    use bifrost::DataType;
    let mut t = Table::new("employees");
    t.add_column("id", DataType::Integer);
    t.add_column("name", DataType::String);
    for (id, name) in [(1i64, "Alice"), (2, "Bob"), (2, "Bruce"), (9, "Zara")] {
        let mut row = Row::new();
        row.push(id);
        row.push(name);
        t.add_row(row)?;
    }
    Ok(t)
}

fn inline_right() -> anyhow::Result<Table> {
    use bifrost::DataType;
    let mut t = Table::new("departments");
    t.add_column("emp_id", DataType::Integer);
    t.add_column("department", DataType::String);
    for (emp_id, department) in [(1i64, "Engineering"), (2, "Sales"), (4, "Marketing")] {
        let mut row = Row::new();
        row.push(emp_id);
        row.push(department);
        t.add_row(row)?;
    }
    Ok(t)
}

fn run_demo() -> anyhow::Result<()> {
    println!("Database Query Processing System");
    println!("=================================\n");
    println!("--- demo ---");

    let left = inline_left()?;
    let right = inline_right()?;

    for join_type in [JoinType::Inner, JoinType::LeftOuter, JoinType::RightOuter, JoinType::FullOuter] {
        let mut engine = JoinEngine::new();
        let result = engine.hash_join(
            &left,
            "id",
            &right,
            "emp_id",
            join_type,
            CollisionStrategy::Chaining,
        )?;
        println!("\n{join_type:?}:");
        result.print_sample(10);
        engine.profiler().print_report();
    }
    Ok(())
}

fn run_advanced() -> anyhow::Result<()> {
    println!("--- advanced ---");
    let left = DataLoader::generate_test_table("left", 200, 1);
    let right = DataLoader::generate_test_table("right", 150, 2);

    for join_type in [JoinType::Inner, JoinType::LeftOuter, JoinType::RightOuter, JoinType::FullOuter] {
        for strategy in [CollisionStrategy::Chaining, CollisionStrategy::LinearProbing] {
            let mut engine = JoinEngine::new();
            let result = engine.hash_join(&left, "id", &right, "id", join_type, strategy)?;
            println!(
                "{join_type:?} / {strategy:?}: {} rows, selectivity {:.2}%",
                result.row_count(),
                engine.profiler().data().selectivity_pct
            );
        }
    }
    Ok(())
}

fn run_benchmark() -> anyhow::Result<()> {
    println!("--- benchmark ---");
    benchmark::run_hash_table_benchmark();
    benchmark::run_join_type_benchmark();
    benchmark::run_scalability_benchmark();
    Ok(())
}

fn run_memory() -> anyhow::Result<()> {
    println!("--- memory ---");
    let left = DataLoader::generate_test_table("left", 100_000, 21);
    let right = DataLoader::generate_test_table("right", 100_000, 22);
    let mut engine = JoinEngine::new();
    let result = engine.hash_join(&left, "id", &right, "id", JoinType::Inner, CollisionStrategy::Chaining)?;
    println!("result rows: {}", result.row_count());
    engine.profiler().print_report();
    Ok(())
}
