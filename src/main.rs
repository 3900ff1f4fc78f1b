use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use canopy::profiling::{CpuProfiler, HeapProfiler};
use canopy::{BenchConfig, Benchmark};

#[cfg(feature = "heap-profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[derive(Parser, Debug)]
#[command(
    name = "canopy",
    about = "Measures region-backed against per-node allocation on short-lived binary trees"
)]
struct Cli {
    /// Depth of the deepest tree bucket.
    #[arg(default_value_t = 21)]
    depth: u32,

    /// Megabytes a region may serve before its task replaces it.
    #[arg(long, default_value_t = 1.0, value_name = "MB")]
    min_alloc: f64,

    /// Build only the stretch tree, in a single task.
    #[arg(long)]
    single: bool,

    /// Allocate every node individually instead of carving from regions.
    #[arg(long)]
    per_node: bool,

    /// Write a CPU profile (flamegraph SVG) to this path.
    #[arg(long, value_name = "FILE")]
    cpu_profile: Option<PathBuf>,

    /// Write a heap profile to this path (needs the heap-profile feature).
    #[arg(long, value_name = "FILE")]
    mem_profile: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr so stdout carries only the report lines.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = BenchConfig {
        max_depth: cli.depth,
        min_alloc_mb: cli.min_alloc,
        single: cli.single,
        per_node: cli.per_node,
        cpu_profile: cli.cpu_profile,
        mem_profile: cli.mem_profile,
    };

    // Profilers bracket the run; failing to arm one is fatal before any
    // work happens.
    let heap_profiler = config
        .mem_profile
        .as_deref()
        .map(HeapProfiler::start)
        .transpose()
        .context("could not start heap profile")?;
    let cpu_profiler = config
        .cpu_profile
        .as_deref()
        .map(CpuProfiler::start)
        .transpose()
        .context("could not start CPU profile")?;

    let report = Benchmark::new(config).run();
    for line in &report {
        println!("{line}");
    }

    if let Some(profiler) = cpu_profiler {
        profiler.stop().context("could not write CPU profile")?;
    }
    // The heap profile is written when its guard drops.
    drop(heap_profiler);

    Ok(())
}
