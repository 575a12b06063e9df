use criterion::{criterion_group, criterion_main, Criterion};
use lidar_cloud::knn::{neighbors, KdTree};

fn grid(side: usize) -> Vec<[f64; 3]> {
    let mut positions = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            positions.push([i as f64, j as f64, 0.]);
        }
    }
    positions
}

fn build(c: &mut Criterion) {
    let positions = grid(64);
    c.bench_function("kd_tree_build_4096", |b| {
        b.iter(|| KdTree::new(&positions));
    });
}

fn query(c: &mut Criterion) {
    let positions = grid(64);
    let tree = KdTree::new(&positions);
    c.bench_function("kd_tree_query_k8", |b| {
        b.iter(|| tree.k_nearest(&[32., 32., 0.], 8));
    });
}

fn parallel_neighbors(c: &mut Criterion) {
    let positions = grid(64);
    c.bench_function("neighbors_parallel_k8", |b| {
        b.iter(|| neighbors(&positions, 8));
    });
}

criterion_group!(benches, build, query, parallel_neighbors);
criterion_main!(benches);
