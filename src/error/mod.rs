//! Error types for the dense linear algebra primitives.
//!
//! Every fallible function in this crate returns `anyhow::Result`, and every error it raises
//! is one of the [`LinAlgError`] variants below. Callers that need to react to a specific
//! condition can recover it with `err.downcast_ref::<LinAlgError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinAlgError {
    /// A square matrix was required.
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The length of an svec encoding is not a triangular number n(n+1)/2.
    #[error("Length {len} is not a valid svec length (expected n(n+1)/2 for some n)")]
    InvalidSvecLength { len: usize },

    #[error("Dimension must be at least 1")]
    EmptyDimension,

    /// Covariance estimation needs at least two observations (columns).
    #[error("Insufficient observations: required {required}, actual {actual}")]
    InsufficientObservations { required: usize, actual: usize },

    #[error("Index {index} out of bounds for dimension {bound}")]
    IndexOutOfBounds { index: usize, bound: usize },

    #[error("Duplicate index {index}")]
    DuplicateIndex { index: usize },

    /// `0^p` with `p <= 0` has no finite value.
    #[error("Cannot raise zero element at position {index} to non-positive power {power}")]
    ZeroToNonPositivePower { index: usize, power: f64 },

    /// A covariance or Gram matrix has a spectral value at or below the tolerance, so its
    /// inverse square root does not exist.
    #[error(
        "Degenerate covariance: spectral value {value:e} at position {index} is below tolerance {tolerance:e}"
    )]
    DegenerateCovariance {
        index: usize,
        value: f64,
        tolerance: f64,
    },

    /// Degeneracy tolerances must be non-negative and not NaN.
    #[error("Invalid tolerance {tolerance}: must be a non-negative number")]
    InvalidTolerance { tolerance: f64 },

    #[error("Failed to draw a non-zero sample after {attempts} attempts")]
    DegenerateSample { attempts: usize },

    #[error("Decomposition failed: {0}")]
    Decomposition(String),
}

impl LinAlgError {
    pub fn not_square(rows: usize, cols: usize) -> Self {
        Self::NotSquare { rows, cols }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn index_out_of_bounds(index: usize, bound: usize) -> Self {
        Self::IndexOutOfBounds { index, bound }
    }

    /// Whether this error is one of the numerical degeneracy conditions rather than a shape
    /// or domain problem with the caller's input.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::DegenerateCovariance { .. } | Self::DegenerateSample { .. }
        )
    }
}
