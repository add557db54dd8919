use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spread3::common::points::dist;
use spread3::{Point3, SpatialRangeIndex, select};
use std::hint::black_box;

fn random_points(seed: u64, n: usize) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point3::new(
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
            )
        })
        .collect()
}

fn brute_force_cluster(points: &[Point3], foci: &[Point3], radius: f64) -> Vec<Vec<usize>> {
    foci.iter()
        .map(|f| {
            points
                .iter()
                .enumerate()
                .filter(|(_, p)| dist(*p, f) <= radius)
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

fn range_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_clustering");
    let foci = random_points(2, 200);

    for n in [1_000, 10_000, 100_000] {
        let points = random_points(1, n);

        group.bench_with_input(BenchmarkId::new("index", n), &points, |b, points| {
            b.iter(|| {
                let index = SpatialRangeIndex::build(black_box(points)).unwrap();
                index.cluster(black_box(&foci), 5.0).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("brute_force", n), &points, |b, points| {
            b.iter(|| brute_force_cluster(black_box(points), black_box(&foci), 5.0))
        });
    }

    group.finish();
}

fn spread_selection(c: &mut Criterion) {
    let candidates = random_points(3, 2_000);
    let initial = random_points(4, 5);

    c.bench_function("select_50_of_2000", |b| {
        b.iter(|| select(black_box(&candidates), black_box(&initial), 50).unwrap())
    });
}

criterion_group!(benches, range_clustering, spread_selection);
criterion_main!(benches);
