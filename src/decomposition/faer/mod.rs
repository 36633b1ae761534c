use ::faer::Side;
use faer_ext::{IntoFaer, IntoNdarray};
use log::debug;
use ndarray::{Array1, ArrayView2};

use super::{ensure_finite, ensure_square, Decomposer, Svd, SymmetricEigen};

/// Backend on top of `faer`, enabled with the `faer` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerDecomposer;

impl Decomposer for FaerDecomposer {
    fn svd(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Svd> {
        ensure_finite(&matrix)?;
        let faer_mat = matrix.into_faer();
        let svd = faer_mat.thin_svd();

        let u = svd.u().into_ndarray().to_owned();
        let s: Array1<f64> = Array1::from_iter(svd.s_diagonal().iter().cloned());
        let vt = svd.v().into_ndarray().t().to_owned();

        debug!("faer SVD of {}x{} matrix", matrix.nrows(), matrix.ncols());
        Ok(Svd::new(u, s, vt))
    }

    fn symmetric_eigen(&self, matrix: ArrayView2<f64>) -> anyhow::Result<SymmetricEigen> {
        let n = ensure_square(&matrix)?;
        ensure_finite(&matrix)?;
        let faer_mat = matrix.into_faer();
        let eig = faer_mat.selfadjoint_eigendecomposition(Side::Lower);

        let s = eig.s().column_vector();
        let eigenvalues: Array1<f64> = Array1::from_iter((0..n).map(|i| s.read(i)));
        let eigenvectors = eig.u().into_ndarray().to_owned();

        debug!("faer symmetric eigendecomposition of {}x{} matrix", n, n);
        Ok(SymmetricEigen::new(eigenvalues, eigenvectors))
    }
}
