use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_api::api::traversal::merge_traversal;
use graph_api::{Edge, Node};

fn traversal_result(n: usize) -> (Vec<Node>, Vec<Edge>) {
    // Reverse key order so every element moves
    let nodes = (0..n).rev().map(|i| Node::new(format!("node-{:06}", i), "Person")).collect();
    let edges = (0..n).map(|i| Edge::from(Node::new(format!("edge-{}", i), "Knows"))).collect();
    (nodes, edges)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_traversal");
    for n in [10, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || traversal_result(n),
                |(nodes, edges)| black_box(merge_traversal(nodes, edges)),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
