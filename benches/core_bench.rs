use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kentroid::{determinant, KMeans, Matrix};
use rand::prelude::*;

fn generate_numeric_data(n_samples: usize, n_features: usize) -> Matrix {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..n_samples)
        .map(|_| (0..n_features).map(|_| rng.gen_range(-10.0..10.0)).collect())
        .collect();
    Matrix::from_rows(rows).unwrap()
}

fn bench_determinant(c: &mut Criterion) {
    let mut group = c.benchmark_group("determinant");

    for &n in &[4usize, 6, 8] {
        let matrix = generate_numeric_data(n, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &matrix, |b, matrix| {
            b.iter(|| black_box(determinant(black_box(matrix)).unwrap()));
        });
    }

    group.finish();
}

fn bench_kmeans_fit(c: &mut Criterion) {
    let data = generate_numeric_data(150, 4);

    // Pick a seed whose sampled initialization keeps every cluster
    // populated, so the benchmark measures fits, not retries.
    let seed = (0..32)
        .find(|&s| {
            let mut model = KMeans::new(3).epochs(10).random_state(s);
            model.fit(&data).is_ok()
        })
        .expect("no viable seed");

    c.bench_function("kmeans_fit_150x4_k3", |b| {
        b.iter(|| {
            let mut model = KMeans::new(3).epochs(10).random_state(seed);
            model.fit(black_box(&data)).unwrap();
            black_box(model.score().unwrap())
        });
    });
}

criterion_group!(benches, bench_determinant, bench_kmeans_fit);
criterion_main!(benches);
