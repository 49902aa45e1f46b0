use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use halfedge_graph::prelude::*;

fn random_graph(n: usize, m: usize, seed: u64) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = Graph::new();
    let vs: Vec<NodeId> = (0..n).map(|_| g.new_node()).collect();
    for _ in 0..m {
        let v = vs[rng.gen_range(0..n)];
        let w = vs[rng.gen_range(0..n)];
        g.new_edge(v, w);
    }
    g
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("nodes_edges", n), &n, |b, &n| {
            b.iter(|| random_graph(n, 4 * n, 7));
        });
    }
    group.finish();
}

fn bench_split_unsplit(c: &mut Criterion) {
    c.bench_function("split_unsplit_cycle", |b| {
        // split/unsplit consume fresh ids, so each round gets its own graph
        b.iter_batched_ref(
            || {
                let g = random_graph(1_000, 4_000, 11);
                let edges: Vec<EdgeId> = g.edges().collect();
                (g, edges)
            },
            |(g, edges)| {
                for &e in edges.iter() {
                    let e2 = g.split(e);
                    g.unsplit_edges(e, e2);
                }
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_hide_restore(c: &mut Criterion) {
    c.bench_function("hide_restore_all", |b| {
        let mut g = random_graph(1_000, 8_000, 13);
        let edges: Vec<EdgeId> = g.edges().collect();
        b.iter(|| {
            for &e in &edges {
                g.hide_edge(e);
            }
            g.restore_all_edges();
        });
    });
}

fn bench_components(c: &mut Criterion) {
    c.bench_function("ccs_info", |b| {
        let g = random_graph(10_000, 20_000, 17);
        b.iter(|| CcsInfo::new(&g).num_ccs());
    });
}

fn bench_copy(c: &mut Criterion) {
    c.bench_function("copy_from", |b| {
        let g = random_graph(10_000, 40_000, 19);
        let mut dst = Graph::new();
        b.iter(|| dst.copy_from(&g));
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_split_unsplit,
    bench_hide_restore,
    bench_components,
    bench_copy
);
criterion_main!(benches);
