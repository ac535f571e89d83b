//! Benchmarks for normal synthesis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use shademesh::algo::expand::expand;
use shademesh::algo::incidence::{ExactIndex, ToleranceGrid};
use shademesh::io::stl;
use shademesh::prelude::*;

fn create_grid_mesh(n: usize) -> Mesh {
    let p = |i: usize, j: usize| {
        let (x, y) = (i as f32, j as f32);
        Point3::new(x, y, (x * 0.3).sin() * (y * 0.2).cos())
    };

    let mut facets = Vec::with_capacity(n * n * 2);
    for j in 0..n {
        for i in 0..n {
            facets.push(Facet::from_vertices([p(i, j), p(i + 1, j), p(i + 1, j + 1)]));
            facets.push(Facet::from_vertices([p(i, j), p(i + 1, j + 1), p(i, j + 1)]));
        }
    }
    Mesh::from_facets(facets)
}

fn bench_indexing(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let soup = expand(&mesh);
    let bytes = stl::encode(&mesh);

    c.bench_function("decode_grid_100x100", |b| {
        b.iter(|| stl::decode(black_box(&bytes)).unwrap())
    });

    c.bench_function("exact_index_100x100", |b| {
        b.iter(|| ExactIndex::new(black_box(&soup.positions)))
    });

    c.bench_function("tolerance_grid_100x100", |b| {
        b.iter(|| ToleranceGrid::new(black_box(&soup.positions), 1e-4))
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let small = create_grid_mesh(20);
    let large = create_grid_mesh(100);

    c.bench_function("synthesize_scan_20x20", |b| {
        let options = SynthesisOptions::default().with_strategy(MatchStrategy::Scan);
        b.iter(|| synthesize_normals(black_box(&small), &options).unwrap())
    });

    c.bench_function("synthesize_indexed_20x20", |b| {
        let options = SynthesisOptions::default();
        b.iter(|| synthesize_normals(black_box(&small), &options).unwrap())
    });

    c.bench_function("synthesize_indexed_100x100", |b| {
        let options = SynthesisOptions::default();
        b.iter(|| synthesize_normals(black_box(&large), &options).unwrap())
    });

    c.bench_function("synthesize_indexed_100x100_sequential", |b| {
        let options = SynthesisOptions::default().sequential();
        b.iter(|| synthesize_normals(black_box(&large), &options).unwrap())
    });

    c.bench_function("synthesize_tolerance_100x100", |b| {
        let options = SynthesisOptions::default().with_tolerance(1e-4);
        b.iter(|| synthesize_normals(black_box(&large), &options).unwrap())
    });
}

criterion_group!(benches, bench_indexing, bench_synthesis);
criterion_main!(benches);
