//! # Whitening
//!
//! Computes a symmetric whitening matrix `W = V · diag(λ^-1/2) · Vᵗ` from the covariance of a
//! data matrix (columns are observations) and applies it, so that the covariance of `W · x`
//! is the identity. The factors come either from an SVD or from a symmetric
//! eigendecomposition of the covariance.
//!
//! Rank-deficient covariance is never clamped: any spectral value at or below
//! `tolerance * max|λ|` fails with [`LinAlgError::DegenerateCovariance`].

use std::sync::Arc;

use log::debug;
use ndarray::{Array1, Array2, ArrayView2};

use crate::decomposition::{Decomposer, NalgebraDecomposer};
use crate::dense::covariance;
use crate::error::LinAlgError;
use crate::utils::{ensure_valid_tolerance, inverse_sqrt_spectrum, DEFAULT_TOLERANCE};

/// Factorization used to obtain the spectrum of the covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitenMethod {
    #[default]
    Svd,
    Eig,
}

pub struct WhitenerBuilder<D: Decomposer> {
    method: WhitenMethod,
    tolerance: f64,
    decomposer: Arc<D>,
}

impl WhitenerBuilder<NalgebraDecomposer> {
    pub fn new() -> Self {
        Self::with_decomposer(NalgebraDecomposer)
    }
}

impl Default for WhitenerBuilder<NalgebraDecomposer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Decomposer> WhitenerBuilder<D> {
    pub fn with_decomposer(decomposer: D) -> Self {
        WhitenerBuilder {
            method: WhitenMethod::default(),
            tolerance: DEFAULT_TOLERANCE,
            decomposer: Arc::new(decomposer),
        }
    }

    pub fn method(mut self, method: WhitenMethod) -> Self {
        self.method = method;
        self
    }

    /// Relative tolerance for the degeneracy check on the covariance spectrum. A negative or
    /// NaN value makes every whitening call fail with [`LinAlgError::InvalidTolerance`].
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn build(self) -> Whitener<D> {
        Whitener {
            method: self.method,
            tolerance: self.tolerance,
            decomposer: self.decomposer,
        }
    }
}

/// Output of [`Whitener::whiten`].
#[derive(Debug, Clone)]
pub struct Whitened {
    data: Array2<f64>,
    matrix: Array2<f64>,
}

impl Whitened {
    /// The whitened data `W · x`.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// The whitening matrix `W`.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Returns `(whitened data, whitening matrix)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.data, self.matrix)
    }
}

pub struct Whitener<D: Decomposer> {
    method: WhitenMethod,
    tolerance: f64,
    decomposer: Arc<D>,
}

impl<D: Decomposer> Whitener<D> {
    pub fn method(&self) -> WhitenMethod {
        self.method
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Computes the whitening matrix for `x` without applying it.
    pub fn whitening_matrix(&self, x: ArrayView2<f64>) -> anyhow::Result<Array2<f64>> {
        ensure_valid_tolerance(self.tolerance)?;
        if x.nrows() == 0 {
            return Err(LinAlgError::EmptyDimension.into());
        }
        let cov = covariance(x)?;

        let (basis, spectrum): (Array2<f64>, Array1<f64>) = match self.method {
            WhitenMethod::Svd => {
                let (u, s, _vt) = self.decomposer.svd(cov.view())?.into_parts();
                (u, s)
            }
            WhitenMethod::Eig => {
                let (values, vectors) = self.decomposer.symmetric_eigen(cov.view())?.into_parts();
                (vectors, values)
            }
        };

        let inv_sqrt = inverse_sqrt_spectrum(spectrum.view(), self.tolerance)?;
        debug!(
            "whitening {} dimensions with {:?}, smallest spectral value {:e}",
            x.nrows(),
            self.method,
            spectrum.iter().cloned().fold(f64::INFINITY, f64::min)
        );

        // Scaling the columns of the basis is V · diag(λ^-1/2)
        let scaled = &basis * &inv_sqrt;
        Ok(scaled.dot(&basis.t()))
    }

    pub fn whiten(&self, x: ArrayView2<f64>) -> anyhow::Result<Whitened> {
        let matrix = self.whitening_matrix(x)?;
        let data = matrix.dot(&x);
        Ok(Whitened { data, matrix })
    }
}

/// Whitens `x` using the singular value decomposition of its covariance.
pub fn whiten_using_svd(x: ArrayView2<f64>) -> anyhow::Result<Whitened> {
    WhitenerBuilder::new()
        .method(WhitenMethod::Svd)
        .build()
        .whiten(x)
}

/// Whitens `x` using the symmetric eigendecomposition of its covariance.
pub fn whiten_using_eig(x: ArrayView2<f64>) -> anyhow::Result<Whitened> {
    WhitenerBuilder::new()
        .method(WhitenMethod::Eig)
        .build()
        .whiten(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rand_distr::StandardNormal;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn correlated_data(n_obs: usize, seed: u64) -> Array2<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let raw = Array2::from_shape_fn((3, n_obs), |_| rng.sample::<f64, _>(StandardNormal));
        let mixing = array![[2.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.3, -0.4, 0.7]];
        mixing.dot(&raw) + 5.0
    }

    fn assert_identity(m: &Array2<f64>, epsilon: f64) {
        let eye = Array2::<f64>::eye(m.nrows());
        assert_eq!(m.dim(), eye.dim());
        for (x, y) in m.iter().zip(eye.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = epsilon);
        }
    }

    #[test]
    fn test_whiten_using_svd() {
        init();
        let x = correlated_data(500, 7);
        let whitened = whiten_using_svd(x.view()).unwrap();

        assert_eq!(whitened.data().dim(), x.dim());
        assert_eq!(whitened.matrix().dim(), (3, 3));
        assert_identity(&covariance(whitened.data().view()).unwrap(), 1e-6);
    }

    #[test]
    fn test_whiten_using_eig() {
        init();
        let x = correlated_data(500, 11);
        let whitened = whiten_using_eig(x.view()).unwrap();

        assert_identity(&covariance(whitened.data().view()).unwrap(), 1e-6);

        // W · Cov(x) · Wᵗ = I
        let w = whitened.matrix();
        let cov = covariance(x.view()).unwrap();
        assert_identity(&w.dot(&cov).dot(&w.t()), 1e-6);
    }

    #[test]
    fn test_methods_agree() {
        let x = correlated_data(200, 3);
        let (_, w_svd) = whiten_using_svd(x.view()).unwrap().into_parts();
        let (_, w_eig) = whiten_using_eig(x.view()).unwrap().into_parts();

        for (a, b) in w_svd.iter().zip(w_eig.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-8);
        }
        // symmetric whitening matrix
        for (a, b) in w_svd.iter().zip(w_svd.t().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_whitener_builder() {
        let whitener = WhitenerBuilder::new()
            .method(WhitenMethod::Eig)
            .tolerance(1e-6)
            .build();
        assert_eq!(whitener.method(), WhitenMethod::Eig);
        assert_eq!(whitener.tolerance(), 1e-6);

        let x = correlated_data(100, 5);
        let w = whitener.whitening_matrix(x.view()).unwrap();
        assert_eq!(w.dim(), (3, 3));
    }

    #[test]
    fn test_degenerate_covariance() {
        init();
        let x = correlated_data(100, 9);
        let mut degenerate = x.clone();
        let doubled = &x.row(0) * 2.0;
        degenerate.row_mut(2).assign(&doubled);

        for method in [WhitenMethod::Svd, WhitenMethod::Eig] {
            let err = WhitenerBuilder::new()
                .method(method)
                .build()
                .whiten(degenerate.view())
                .unwrap_err();
            let err = err.downcast_ref::<LinAlgError>().unwrap();
            assert!(err.is_degenerate(), "unexpected error {:?}", err);
        }
    }

    #[test]
    fn test_constant_row_is_degenerate() {
        let x = array![[1.0, 2.0, 3.0, 4.0], [5.0, 5.0, 5.0, 5.0]];
        let err = whiten_using_eig(x.view()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LinAlgError>(),
            Some(LinAlgError::DegenerateCovariance { .. })
        ));
    }

    #[test]
    fn test_invalid_tolerance() {
        let x = array![[1.0, 2.0, 3.0, 4.0], [5.0, 5.0, 5.0, 5.0]];

        for tolerance in [-1.0, f64::NAN] {
            let err = WhitenerBuilder::new()
                .tolerance(tolerance)
                .build()
                .whiten(x.view())
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<LinAlgError>(),
                Some(LinAlgError::InvalidTolerance { .. })
            ));
        }
    }

    #[cfg(feature = "faer")]
    #[test]
    fn test_whiten_with_faer() {
        use crate::decomposition::FaerDecomposer;

        let x = correlated_data(400, 13);
        for method in [WhitenMethod::Svd, WhitenMethod::Eig] {
            let whitened = WhitenerBuilder::with_decomposer(FaerDecomposer)
                .method(method)
                .build()
                .whiten(x.view())
                .unwrap();
            assert_identity(&covariance(whitened.data().view()).unwrap(), 1e-6);
        }
    }

    #[test]
    fn test_shape_errors() {
        let x = array![[1.0], [2.0]];
        let err = whiten_using_svd(x.view()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LinAlgError>(),
            Some(LinAlgError::InsufficientObservations { .. })
        ));

        let x = Array2::<f64>::zeros((0, 4));
        let err = whiten_using_svd(x.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LinAlgError>(),
            Some(&LinAlgError::EmptyDimension)
        );
    }
}
