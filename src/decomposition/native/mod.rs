use log::debug;
use nalgebra::linalg::{SymmetricEigen as NaSymmetricEigen, SVD as NaSVD};
use ndarray::{Array1, ArrayView2};
use nshare::{IntoNalgebra, IntoNdarray2};

use super::{ensure_finite, ensure_square, Decomposer, Svd, SymmetricEigen};
use crate::error::LinAlgError;

const MAX_ITERATIONS: usize = 10_000;

/// Pure Rust backend on top of `nalgebra`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraDecomposer;

impl Decomposer for NalgebraDecomposer {
    fn svd(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Svd> {
        ensure_finite(&matrix)?;
        let (rows, cols) = matrix.dim();
        // nalgebra views cannot express negative strides
        let na_matrix = matrix.as_standard_layout().view().into_nalgebra().clone_owned();

        let svd = NaSVD::try_new(na_matrix, true, true, f64::EPSILON, MAX_ITERATIONS)
            .ok_or_else(|| LinAlgError::Decomposition("SVD did not converge".to_string()))?;
        let u = svd
            .u
            .ok_or_else(|| LinAlgError::Decomposition("SVD did not compute U".to_string()))?;
        let vt = svd
            .v_t
            .ok_or_else(|| LinAlgError::Decomposition("SVD did not compute Vᵗ".to_string()))?;
        let s = Array1::from(svd.singular_values.as_slice().to_vec());

        debug!("nalgebra SVD of {}x{} matrix", rows, cols);
        Ok(Svd::new(u.into_ndarray2(), s, vt.into_ndarray2()))
    }

    fn symmetric_eigen(&self, matrix: ArrayView2<f64>) -> anyhow::Result<SymmetricEigen> {
        let n = ensure_square(&matrix)?;
        ensure_finite(&matrix)?;
        let na_matrix = matrix.as_standard_layout().view().into_nalgebra().clone_owned();

        let eig = NaSymmetricEigen::try_new(na_matrix, f64::EPSILON, MAX_ITERATIONS).ok_or_else(
            || LinAlgError::Decomposition("symmetric eigendecomposition did not converge".to_string()),
        )?;
        let eigenvalues = Array1::from(eig.eigenvalues.as_slice().to_vec());

        debug!("nalgebra symmetric eigendecomposition of {}x{} matrix", n, n);
        Ok(SymmetricEigen::new(
            eigenvalues,
            eig.eigenvectors.into_ndarray2(),
        ))
    }
}
