//! # Matrix decompositions
//!
//! Whitening and orthogonalization only combine the factors of a singular value decomposition
//! or a symmetric eigendecomposition; the factorizations themselves come from a backend
//! implementing [`Decomposer`]. [`NalgebraDecomposer`] is always available, the `faer` feature
//! adds [`FaerDecomposer`].

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::LinAlgError;

mod native;
pub use native::NalgebraDecomposer;

#[cfg(feature = "faer")]
mod faer;
#[cfg(feature = "faer")]
pub use self::faer::FaerDecomposer;

/// Backend trait for the dense factorizations the rest of the crate builds on.
pub trait Decomposer: Send + Sync {
    /// Thin singular value decomposition `matrix = U · diag(s) · Vᵗ`.
    fn svd(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Svd>;

    /// Eigendecomposition `matrix = V · diag(λ) · Vᵗ` of a symmetric matrix.
    fn symmetric_eigen(&self, matrix: ArrayView2<f64>) -> anyhow::Result<SymmetricEigen>;
}

#[derive(Debug, Clone)]
pub struct Svd {
    u: Array2<f64>,
    s: Array1<f64>,
    vt: Array2<f64>,
}

impl Svd {
    pub fn new(u: Array2<f64>, s: Array1<f64>, vt: Array2<f64>) -> Self {
        Svd { u, s, vt }
    }

    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    pub fn s(&self) -> &Array1<f64> {
        &self.s
    }

    pub fn vt(&self) -> &Array2<f64> {
        &self.vt
    }

    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>, Array2<f64>) {
        (self.u, self.s, self.vt)
    }

    // Reconstruct the original matrix
    pub fn reconstruct(&self) -> Array2<f64> {
        let s_diag = Array2::from_diag(&self.s);
        self.u.dot(&s_diag).dot(&self.vt)
    }
}

#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
}

impl SymmetricEigen {
    pub fn new(eigenvalues: Array1<f64>, eigenvectors: Array2<f64>) -> Self {
        SymmetricEigen {
            eigenvalues,
            eigenvectors,
        }
    }

    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in the same order as [`Self::eigenvalues`].
    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    /// Returns `(eigenvalues, eigenvectors)`.
    pub fn into_parts(self) -> (Array1<f64>, Array2<f64>) {
        (self.eigenvalues, self.eigenvectors)
    }

    pub fn reconstruct(&self) -> Array2<f64> {
        let v = &self.eigenvectors;
        v.dot(&Array2::from_diag(&self.eigenvalues)).dot(&v.t())
    }
}

/// Returns `n` for an `n x n` matrix, or a [`LinAlgError::NotSquare`] error.
pub(crate) fn ensure_square(matrix: &ArrayView2<f64>) -> anyhow::Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(LinAlgError::not_square(rows, cols).into());
    }
    Ok(rows)
}

pub(crate) fn ensure_finite(matrix: &ArrayView2<f64>) -> anyhow::Result<()> {
    if matrix.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LinAlgError::Decomposition("matrix contains non-finite entries".to_string()).into())
    }
}
