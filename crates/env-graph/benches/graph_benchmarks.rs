use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use env_graph::DependencyGraph;

/// Layered graph: every node of a layer depends on every node of the
/// previous layer.
fn layered_graph(layers: usize, width: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let name = |layer: usize, i: usize| format!("stack-{layer}-{i}");
    for layer in 0..layers {
        for i in 0..width {
            graph.add_node(name(layer, i));
        }
    }
    for layer in 1..layers {
        for i in 0..width {
            for j in 0..width {
                graph.add_edge(&name(layer - 1, j), &name(layer, i));
            }
        }
    }
    graph
}

fn benchmark_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_graph");

    for (layers, width) in [(10, 10), (50, 10), (20, 50)] {
        let graph = layered_graph(layers, width);
        group.bench_with_input(
            BenchmarkId::new("sort", format!("{layers}x{width}")),
            &graph,
            |b, graph| b.iter(|| graph.sort().unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_sort);
criterion_main!(benches);
