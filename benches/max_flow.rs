//! 最大流与全网聚合基准测试
//!
//! 运行：cargo bench --bench max_flow

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use railflow::{Graph, Station};

/// n×n 网格网络，相邻车站之间为双向线路
fn grid_network(n: usize) -> Graph {
    let mut graph = Graph::new();
    let name = |r: usize, c: usize| format!("S{}_{}", r, c);

    for r in 0..n {
        for c in 0..n {
            graph.add_vertex(Station::new(
                name(r, c),
                format!("D{}", r / 2),
                format!("M{}", c / 2),
                "",
                "",
            ));
        }
    }

    for r in 0..n {
        for c in 0..n {
            let capacity = ((r * 7 + c * 3) % 5 + 1) as u64;
            if c + 1 < n {
                graph.add_bidirectional_edge(&name(r, c), &name(r, c + 1), capacity, "STANDARD");
            }
            if r + 1 < n {
                graph.add_bidirectional_edge(&name(r, c), &name(r + 1, c), capacity, "STANDARD");
            }
        }
    }

    graph
}

fn bench_max_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_flow");

    for n in [8usize, 16, 32] {
        let graph = grid_network(n);
        let dest = format!("S{}_{}", n - 1, n - 1);
        group.bench_with_input(BenchmarkId::new("corner_to_corner", n), &graph, |b, g| {
            b.iter(|| black_box(g.max_flow(black_box("S0_0"), black_box(&dest))))
        });
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    group.sample_size(10);

    let graph = grid_network(6);
    group.bench_function("max_capacity_pairs_6x6", |b| {
        b.iter(|| black_box(graph.max_train_capacity_pairs()))
    });
    group.bench_function("top_regions_6x6", |b| {
        b.iter(|| black_box(graph.find_top_municipalities_and_districts(black_box(3))))
    });

    group.finish();
}

/// 网格四边各挂一个终点站（出度为 1），作为到达能力的列车来源
fn grid_with_terminals(n: usize) -> Graph {
    let mut graph = grid_network(n);
    let anchors = [(0, n / 2), (n - 1, n / 2), (n / 2, 0), (n / 2, n - 1)];

    for (i, (r, c)) in anchors.into_iter().enumerate() {
        let terminal = format!("T{}", i);
        graph.add_vertex(Station::named(terminal.as_str()));
        graph.add_bidirectional_edge(&terminal, &format!("S{}_{}", r, c), 3, "REGIONAL");
    }

    graph
}

fn bench_arrivals(c: &mut Criterion) {
    let graph = grid_with_terminals(16);
    c.bench_function("arrival_capacity_16x16", |b| {
        b.iter(|| black_box(graph.arrival_capacity(black_box("S8_8"))))
    });
}

criterion_group!(benches, bench_max_flow, bench_aggregation, bench_arrivals);
criterion_main!(benches);
