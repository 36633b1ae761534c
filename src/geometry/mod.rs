//! # Geometric utilities
//!
//! Random directions on the unit sphere and symmetric orthogonalization of matrix columns.

use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, DataMut, Ix1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::decomposition::{Decomposer, NalgebraDecomposer};
use crate::error::LinAlgError;
use crate::utils::{ensure_valid_tolerance, inverse_sqrt_spectrum, DEFAULT_TOLERANCE};

/// Number of draws [`rand_vector`] makes before giving up on a zero-norm sample.
pub const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Overwrites `v` with a uniformly distributed point on the unit sphere in `R^n`, `n = v.len()`.
///
/// Every coordinate is drawn from a standard normal distribution and the result is divided by
/// its Euclidean norm. The random source is supplied by the caller, so a seeded generator
/// gives reproducible output. `v` is only written once a usable sample has been drawn.
pub fn rand_vector<S, R>(v: &mut ArrayBase<S, Ix1>, rng: &mut R) -> anyhow::Result<()>
where
    S: DataMut<Elem = f64>,
    R: Rng + ?Sized,
{
    if v.is_empty() {
        return Err(LinAlgError::EmptyDimension.into());
    }

    let mut sample = Array1::<f64>::zeros(v.len());
    for attempt in 1..=MAX_SAMPLE_ATTEMPTS {
        sample.mapv_inplace(|_| rng.sample(StandardNormal));

        let norm = sample.dot(&sample).sqrt();
        if norm > 0.0 && norm.is_finite() {
            sample /= norm;
            v.assign(&sample);
            return Ok(());
        }
        warn!("zero-norm sample on attempt {}, drawing again", attempt);
    }

    Err(LinAlgError::DegenerateSample {
        attempts: MAX_SAMPLE_ATTEMPTS,
    }
    .into())
}

pub fn rand_unit_vector<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> anyhow::Result<Array1<f64>> {
    let mut v = Array1::zeros(dim);
    rand_vector(&mut v, rng)?;
    Ok(v)
}

/// Like [`rand_unit_vector`] with a ChaCha generator seeded from `seed`.
pub fn rand_unit_vector_seeded(dim: usize, seed: u64) -> anyhow::Result<Array1<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rand_unit_vector(dim, &mut rng)
}

/// Orthogonalizes the columns of `x` as `W = x · (xᵗx)^-1/2`, using the eigendecomposition of
/// the Gram matrix `xᵗx`.
///
/// `x` must have full column rank; otherwise the Gram matrix is singular and this fails with
/// [`LinAlgError::DegenerateCovariance`], the same condition whitening reports.
pub fn orthogonalize(x: ArrayView2<f64>) -> anyhow::Result<Array2<f64>> {
    orthogonalize_with(x, &NalgebraDecomposer, DEFAULT_TOLERANCE)
}

/// In-place form of [`orthogonalize`]. `x` is left untouched on error.
pub fn orthogonalize_in_place(x: &mut Array2<f64>) -> anyhow::Result<()> {
    let w = orthogonalize(x.view())?;
    *x = w;
    Ok(())
}

/// [`orthogonalize`] with an explicit backend and relative degeneracy tolerance.
pub fn orthogonalize_with<D: Decomposer + ?Sized>(
    x: ArrayView2<f64>,
    decomposer: &D,
    tolerance: f64,
) -> anyhow::Result<Array2<f64>> {
    ensure_valid_tolerance(tolerance)?;
    if x.ncols() == 0 {
        return Err(LinAlgError::EmptyDimension.into());
    }

    let gram = x.t().dot(&x);
    let gram = (&gram + &gram.t()) * 0.5;
    let (values, vectors) = decomposer.symmetric_eigen(gram.view())?.into_parts();
    let inv_sqrt = inverse_sqrt_spectrum(values.view(), tolerance)?;

    debug!("orthogonalizing {} columns of length {}", x.ncols(), x.nrows());
    let inv_sqrt_gram = (&vectors * &inv_sqrt).dot(&vectors.t());
    Ok(x.dot(&inv_sqrt_gram))
}
