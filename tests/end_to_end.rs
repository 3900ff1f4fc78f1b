//! End-to-end runs through the public orchestrator.

use canopy::{BenchConfig, Benchmark, Category};

#[test]
fn depth_zero_clamps_to_the_minimum_run() {
    let report = Benchmark::new(BenchConfig::for_depth(0)).run();

    // The deepest bucket clamps to 6: stretch, two buckets, long-lived.
    assert_eq!(report.len(), 4);
    assert_eq!(report[0].category, Category::Stretch);
    assert_eq!(report[0].depth, 7);
    assert_eq!(report[0].nodes, 255);
    assert_eq!(report[3].category, Category::LongLived);
    assert_eq!(report[3].depth, 6);
    assert_eq!(report[3].nodes, 127);
}

#[test]
fn bucket_totals_match_the_closed_form() {
    let report = Benchmark::new(BenchConfig::for_depth(6)).run();

    assert_eq!(report[1].category, Category::Bucket { iterations: 64 });
    assert_eq!(report[1].depth, 4);
    assert_eq!(report[1].nodes, 64 * 31);
    assert_eq!(report[2].category, Category::Bucket { iterations: 16 });
    assert_eq!(report[2].depth, 6);
    assert_eq!(report[2].nodes, 16 * 127);

    // The whole workload fits one default budget per task.
    assert_eq!(report[1].regions, 1);
    assert_eq!(report[2].regions, 1);
}

#[test]
fn single_mode_reports_only_the_stretch_tree() {
    let mut config = BenchConfig::for_depth(0);
    config.single = true;
    let report = Benchmark::new(config).run();

    assert_eq!(report.len(), 1);
    assert_eq!(report[0].category, Category::Stretch);
    assert_eq!(report[0].depth, 7);
    assert_eq!(report[0].nodes, 255);
}

#[test]
fn per_node_run_matches_the_region_run() {
    let region_run = Benchmark::new(BenchConfig::for_depth(8)).run();
    let mut config = BenchConfig::for_depth(8);
    config.per_node = true;
    let per_node_run = Benchmark::new(config).run();

    assert_eq!(region_run.len(), per_node_run.len());
    for (carved, boxed) in region_run.iter().zip(&per_node_run) {
        assert_eq!(carved.category, boxed.category);
        assert_eq!(carved.depth, boxed.depth);
        assert_eq!(carved.nodes, boxed.nodes);
        assert_eq!(boxed.regions, 1);
    }
}

#[test]
fn identical_configs_produce_identical_lines() {
    let config = BenchConfig::for_depth(6);
    let first = Benchmark::new(config.clone()).run();
    let second = Benchmark::new(config).run();
    assert_eq!(first, second);
}

#[test]
fn tight_budget_consumes_multiple_regions() {
    let mut config = BenchConfig::for_depth(6);
    // Roughly 1 KiB: a couple of depth-4 trees spend it.
    config.min_alloc_mb = 0.001;
    let report = Benchmark::new(config).run();

    assert!(report[1].regions > 1);
    // Region turnover never changes what was built.
    assert_eq!(report[1].nodes, 64 * 31);
}
