//! Criterion benchmarks for the patch mesh generators.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use planar_kernel_math::Point2;
use planar_kernel_mesh::{MeshGenerator, MeshStrategy};

/// Unit square with `n` points per side, counter-clockwise.
fn square(n: usize) -> Vec<Point2> {
    let corners = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let mut out = Vec::with_capacity(4 * n);
    for s in 0..4 {
        let a = corners[s];
        let b = corners[(s + 1) % 4];
        for k in 0..n {
            out.push(a + (b - a) * (k as f64 / n as f64));
        }
    }
    out
}

fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh");
    for &n in &[4usize, 16, 64] {
        let boundary = square(n);

        let mut bilinear = MeshStrategy::TransfiniteBilinear.generator();
        bilinear.set_loops(&[vec![n; 4]]);
        group.bench_with_input(BenchmarkId::new("bilinear", n), &boundary, |b, pts| {
            b.iter(|| bilinear.generate_mesh(black_box(pts)))
        });

        let mut delaunay = MeshStrategy::Delaunay.generator();
        delaunay.set_loops(&[vec![n; 4]]);
        group.bench_with_input(BenchmarkId::new("delaunay", n), &boundary, |b, pts| {
            b.iter(|| delaunay.generate_mesh(black_box(pts)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mesh);
criterion_main!(benches);
