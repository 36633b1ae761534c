use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use dense_linalg::svec::{svec, sym_kron_id};
use dense_linalg::{orthogonalize, whiten_using_eig, whiten_using_svd};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::time::Duration;

#[derive(Clone)]
pub struct DenseMatrixConfig {
    seed: u64,
    dimensions: Vec<usize>,
    n_observations: usize,
    measurement_time: u64,
    sample_size: usize,
}

impl Default for DenseMatrixConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dimensions: vec![4, 16, 64],
            n_observations: 2000,
            measurement_time: 5,
            sample_size: 20,
        }
    }
}

fn create_test_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.sample::<f64, _>(StandardNormal))
}

fn configure_group<'a, M: Measurement>(
    c: &'a mut Criterion<M>,
    name: &str,
    config: &DenseMatrixConfig,
) -> BenchmarkGroup<'a, M> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(config.measurement_time));
    group.sample_size(config.sample_size);
    group
}

pub fn bench_whitening(c: &mut Criterion) {
    let config = DenseMatrixConfig::default();
    let mut group = configure_group(c, "Whitening", &config);

    for &dim in config.dimensions.iter() {
        let x = create_test_matrix(dim, config.n_observations, config.seed + dim as u64);

        group.bench_with_input(BenchmarkId::new("svd", dim), &dim, |b, _| {
            b.iter(|| whiten_using_svd(x.view()).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("eig", dim), &dim, |b, _| {
            b.iter(|| whiten_using_eig(x.view()).unwrap());
        });
    }
    group.finish();
}

pub fn bench_orthogonalize(c: &mut Criterion) {
    let config = DenseMatrixConfig::default();
    let mut group = configure_group(c, "Orthogonalize", &config);

    for &dim in config.dimensions.iter() {
        let x = create_test_matrix(dim * 2, dim, config.seed + dim as u64);

        group.bench_with_input(BenchmarkId::new("orthogonalize", dim), &dim, |b, _| {
            b.iter(|| orthogonalize(x.view()).unwrap());
        });
    }
    group.finish();
}

pub fn bench_svec(c: &mut Criterion) {
    let config = DenseMatrixConfig::default();
    let mut group = configure_group(c, "Svec", &config);

    for &dim in config.dimensions.iter() {
        let a = create_test_matrix(dim, dim, config.seed + dim as u64);
        let sym = &a + &a.t();

        group.bench_with_input(BenchmarkId::new("svec", dim), &dim, |b, _| {
            b.iter(|| svec(sym.view()).unwrap());
        });

        if dim <= 16 {
            group.bench_with_input(BenchmarkId::new("sym_kron_id", dim), &dim, |b, _| {
                b.iter(|| sym_kron_id(a.view()).unwrap());
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_whitening, bench_orthogonalize, bench_svec);
criterion_main!(benches);
