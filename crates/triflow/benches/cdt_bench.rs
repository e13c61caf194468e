//! Criterion microbenches for the incremental CDT's hot paths: bulk point
//! insertion and single-node constraint insertion on a pre-built grid.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Point2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use triflow::cdt::Cdt;

fn random_points(seed: u64, n: usize) -> Vec<Point2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Point2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0))).collect()
}

fn bench_bulk_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_init");
    for &n in &[64usize, 256, 1024] {
        group.bench_function(BenchmarkId::new("random_points", n), |b| {
            b.iter_batched(|| random_points(42, n), |pts| Cdt::new().bulk_init(&pts).unwrap(), BatchSize::LargeInput)
        });
    }
    group.finish();
}

fn bench_incremental_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_insert");
    group.bench_function(BenchmarkId::new("add_node", "into_1k_point_cdt"), |b| {
        b.iter_batched(
            || {
                let mut cdt = Cdt::new();
                cdt.bulk_init(&random_points(7, 1000)).unwrap();
                let new_point = Point2::new(0.123, 0.456);
                (cdt, new_point)
            },
            |(mut cdt, p)| {
                let _ = cdt.add_node(p, None);
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_bulk_init, bench_incremental_insert);
criterion_main!(benches);
