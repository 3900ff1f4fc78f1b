//! # Canopy
//!
//! A micro-benchmark that measures the cost of building and tearing
//! down large numbers of small, short-lived complete binary trees under
//! two memory-management disciplines: per-node individual allocation
//! and region-backed bulk allocation with wholesale release.
//!
//! ## Workload
//!
//! One task builds a stretch tree one level deeper than the deepest
//! sampled depth. One task builds a tree that stays alive until the run
//! ends. One task per sampled depth builds trees in a loop, recycling
//! its region whenever the region has served more than a configured
//! volume of allocation. Shallow buckets run exponentially more
//! iterations, which spreads the total work roughly evenly across
//! depths.
//!
//! ## Usage
//!
//! ```
//! use canopy::{BenchConfig, Benchmark};
//!
//! let report = Benchmark::new(BenchConfig::for_depth(6)).run();
//! for line in &report {
//!     println!("{line}");
//! }
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod profiling;
pub mod region;
pub mod report;
pub mod tree;

pub use region::{Region, RegionCycle};
pub use report::{Category, ReportLine};
pub use tree::{build, BoxedNode, Tree, TreeNode, NODE_FOOTPRINT};

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Shallowest sampled depth; buckets step by 2 from here.
pub const MIN_DEPTH: u32 = 4;

/// Configuration for one run, fixed at startup and passed into the
/// orchestrator. Replaces the flag-driven globals of the reference
/// workload with explicit state.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Requested depth of the deepest bucket. Clamped up to
    /// [`MIN_DEPTH`]` + 2` so the depth loop always runs at least once
    /// and the long-lived tree stays meaningfully deeper than the
    /// smallest bucket.
    pub max_depth: u32,
    /// Megabytes a region may serve before its task replaces it.
    pub min_alloc_mb: f64,
    /// Build only the stretch tree, in a single task.
    pub single: bool,
    /// Allocate every node individually instead of carving from
    /// regions.
    pub per_node: bool,
    /// Where to write a CPU profile, if anywhere.
    pub cpu_profile: Option<PathBuf>,
    /// Where to write a heap profile, if anywhere.
    pub mem_profile: Option<PathBuf>,
}

impl BenchConfig {
    /// Defaults for a given bucket depth: 1 MiB region budget, full
    /// run, region discipline, no profiling.
    pub fn for_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            min_alloc_mb: 1.0,
            single: false,
            per_node: false,
            cpu_profile: None,
            mem_profile: None,
        }
    }

    /// Region byte budget derived from [`min_alloc_mb`](Self::min_alloc_mb).
    pub fn budget_bytes(&self) -> u64 {
        (self.min_alloc_mb * f64::from(1u32 << 20)) as u64
    }
}

/// Failures surfaced before or after a run.
///
/// The run itself has none: construction is deterministic, memory
/// exhaustion aborts, and a panic in any task is fatal to the whole
/// benchmark.
#[derive(Error, Debug)]
pub enum BenchError {
    /// A profile output file could not be created.
    #[error("could not create profile file {}", path.display())]
    ProfileCreate {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
    /// The CPU profiler failed to start or to produce its report.
    #[error("cpu profiler failed")]
    CpuProfiler(#[from] pprof::Error),
    /// Heap profiling was requested from a build without the
    /// `heap-profile` feature.
    #[error("heap profiling requires building with the heap-profile feature")]
    HeapProfileDisabled,
}

/// Iterations for one depth bucket: `2^(max_depth - depth + MIN_DEPTH)`.
///
/// Shallower buckets repeat exponentially more often, balancing total
/// work across depths despite node counts growing exponentially with
/// depth. `depth` must lie in `MIN_DEPTH..=max_depth`.
pub fn iterations_for(max_depth: u32, depth: u32) -> u64 {
    1u64 << (max_depth - depth + MIN_DEPTH)
}

/// Drives one run: fans the tasks out, joins them, and assembles the
/// report lines in slot order.
#[derive(Debug)]
pub struct Benchmark {
    config: BenchConfig,
}

impl Benchmark {
    /// Create a runner for `config`.
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Run to completion and return the report lines in slot order:
    /// stretch tree first, depth buckets in ascending depth, long-lived
    /// tree last.
    ///
    /// Every task writes exactly one line into its own slot. Tasks run
    /// concurrently and join once; the long-lived tree is counted only
    /// after that join, when all construction pressure has subsided.
    pub fn run(&self) -> Vec<ReportLine> {
        let max_depth = self.config.max_depth.max(MIN_DEPTH + 2);
        let budget_bytes = self.config.budget_bytes();
        let per_node = self.config.per_node;

        debug!(
            max_depth,
            single = self.config.single,
            per_node,
            "starting run"
        );

        if self.config.single {
            let mut slot = None;
            rayon::scope(|s| {
                s.spawn(|_| slot = Some(stretch_task(max_depth, per_node)));
            });
            return vec![slot.expect("the stretch task writes its slot")];
        }

        let slot_count = 3 + ((max_depth - MIN_DEPTH) / 2) as usize;
        let mut slots: Vec<Option<ReportLine>> = vec![None; slot_count];

        // The long-lived tree outlives the task that builds it. Its
        // region and root live in this frame so the count can happen
        // after the join; the region is released when the frame ends.
        let mut long_region = Region::new();
        let mut long_tree: Option<Tree<'_>> = None;

        let [stretch_slot, bucket_slots @ .., long_slot] = slots.as_mut_slice() else {
            unreachable!("a full run always has at least four slots");
        };

        let long_region_ref = &mut long_region;
        let long_tree_ref = &mut long_tree;

        rayon::scope(|s| {
            s.spawn(move |_| {
                *stretch_slot = Some(stretch_task(max_depth, per_node));
            });

            s.spawn(move |_| {
                let region = if per_node {
                    None
                } else {
                    Some(&*long_region_ref)
                };
                *long_tree_ref = Some(tree::build(max_depth, region));
            });

            for (index, slot) in bucket_slots.iter_mut().enumerate() {
                let depth = MIN_DEPTH + 2 * index as u32;
                let iterations = iterations_for(max_depth, depth);
                s.spawn(move |_| {
                    *slot = Some(bucket_task(depth, iterations, budget_bytes, per_node));
                });
            }
        });

        // Only now, with every task joined, count the long-lived tree.
        let nodes = long_tree
            .as_ref()
            .expect("the long-lived task writes its tree")
            .count();
        *long_slot = Some(ReportLine {
            category: Category::LongLived,
            depth: max_depth,
            regions: 1,
            nodes,
        });

        slots
            .into_iter()
            .map(|slot| slot.expect("every task writes its slot"))
            .collect()
    }
}

/// Build the stretch tree once in its own dedicated region, count it,
/// and release the region.
fn stretch_task(max_depth: u32, per_node: bool) -> ReportLine {
    let depth = max_depth + 1;
    let nodes = if per_node {
        tree::build(depth, None).count()
    } else {
        let region = Region::new();
        let nodes = tree::build(depth, Some(&region)).count();
        region.release();
        nodes
    };
    ReportLine {
        category: Category::Stretch,
        depth,
        regions: 1,
        nodes,
    }
}

/// Build `iterations` trees of `depth`, recycling the region between
/// trees per the byte budget, and tally the node counts.
fn bucket_task(depth: u32, iterations: u64, budget_bytes: u64, per_node: bool) -> ReportLine {
    let mut nodes = 0;
    let regions = if per_node {
        for _ in 0..iterations {
            nodes += tree::build(depth, None).count();
        }
        1
    } else {
        let mut cycle = RegionCycle::new(budget_bytes);
        for _ in 0..iterations {
            cycle.recycle_if_spent();
            nodes += tree::build(depth, Some(cycle.region())).count();
        }
        // The final region is released when the cycle drops.
        cycle.generation()
    };
    ReportLine {
        category: Category::Bucket { iterations },
        depth,
        regions,
        nodes,
    }
}
