use log::trace;
use ndarray::{Array1, ArrayBase, ArrayView1, DataMut, Ix1};

use crate::error::LinAlgError;

/// Default relative tolerance below which a spectral value counts as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Raises every element to a power while keeping its original sign, i.e. `sign(v) * |v|^power`.
///
/// Useful for eigenvalues that come out slightly negative because of rounding: a plain
/// fractional power of a negative number would be NaN.
pub trait VectorPower {
    /// Fails with [`LinAlgError::ZeroToNonPositivePower`] if `power <= 0` and some element is
    /// zero. Nothing is modified in that case.
    fn vector_power(&mut self, power: f64) -> anyhow::Result<()>;
}

impl<S> VectorPower for ArrayBase<S, Ix1>
where
    S: DataMut<Elem = f64>,
{
    fn vector_power(&mut self, power: f64) -> anyhow::Result<()> {
        if power <= 0.0 {
            if let Some(index) = self.iter().position(|&v| v == 0.0) {
                return Err(LinAlgError::ZeroToNonPositivePower { index, power }.into());
            }
        }
        self.mapv_inplace(|v| v.signum() * v.abs().powf(power));
        Ok(())
    }
}

pub fn vector_power(vec: &mut Array1<f64>, power: f64) -> anyhow::Result<()> {
    vec.vector_power(power)
}

/// Fails with [`LinAlgError::InvalidTolerance`] unless `tolerance` is a non-negative number.
pub(crate) fn ensure_valid_tolerance(tolerance: f64) -> anyhow::Result<()> {
    // Negated comparison so NaN is rejected as well
    if !(tolerance >= 0.0) {
        return Err(LinAlgError::InvalidTolerance { tolerance }.into());
    }
    Ok(())
}

/// Computes `values^-0.5` for the spectrum of a covariance or Gram matrix.
///
/// A value `v` is degenerate when `v <= tolerance * max|values|`; the first one found is
/// reported as [`LinAlgError::DegenerateCovariance`]. Whitening and orthogonalization both go
/// through here so they share one rank-deficiency policy.
pub(crate) fn inverse_sqrt_spectrum(
    values: ArrayView1<f64>,
    tolerance: f64,
) -> anyhow::Result<Array1<f64>> {
    ensure_valid_tolerance(tolerance)?;
    let max_abs = values.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()));
    let threshold = tolerance * max_abs;

    // Negated comparison so NaN is caught as well
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !(**v > threshold)) {
        return Err(LinAlgError::DegenerateCovariance {
            index,
            value,
            tolerance: threshold,
        }
        .into());
    }

    trace!(
        "spectrum of length {} within tolerance (max {:e}, threshold {:e})",
        values.len(),
        max_abs,
        threshold
    );

    let mut result = values.to_owned();
    result.vector_power(-0.5)?;
    Ok(result)
}
