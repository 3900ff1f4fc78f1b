//! Criterion benchmarks comparing the two allocation disciplines.

use canopy::tree::{build, build_in};
use canopy::{Region, NODE_FOOTPRINT};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

fn bench_disciplines(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_and_count");
    for depth in [8u32, 12, 16] {
        group.bench_function(format!("region/depth_{depth}"), |b| {
            b.iter(|| {
                let region = Region::new();
                black_box(build(black_box(depth), Some(&region)).count())
            })
        });
        group.bench_function(format!("region_presized/depth_{depth}"), |b| {
            let bytes = (((1u64 << (depth + 1)) - 1) * NODE_FOOTPRINT) as usize;
            b.iter(|| {
                let region = Region::with_capacity(bytes);
                black_box(build_in(black_box(depth), &region).count())
            })
        });
        group.bench_function(format!("per_node/depth_{depth}"), |b| {
            b.iter(|| black_box(build(black_box(depth), None).count()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = bench_disciplines
}
criterion_main!(benches);
