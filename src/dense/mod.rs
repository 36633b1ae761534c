//! # Dense matrix preprocessing
//!
//! Structural and statistical helpers on dense `ndarray` matrices. Throughout the crate the
//! columns of a data matrix are observations and the rows are dimensions (features).

use log::debug;
use ndarray::{Array2, ArrayBase, ArrayView2, Axis, DataMut, Ix2};

use crate::error::LinAlgError;

/// Returns a copy of `x` with the mean over all columns subtracted from every column, so each
/// row of the result has zero mean.
pub fn center(x: ArrayView2<f64>) -> Array2<f64> {
    let mut centered = x.to_owned();
    center_in_place(&mut centered);
    centered
}

/// In-place form of [`center`]. A matrix without columns is left as is.
pub fn center_in_place<S>(x: &mut ArrayBase<S, Ix2>)
where
    S: DataMut<Elem = f64>,
{
    if let Some(mean) = x.mean_axis(Axis(1)) {
        let mean = mean.insert_axis(Axis(1));
        *x -= &mean;
    }
}

/// Sample covariance of `x`, treating columns as observations.
///
/// Computes `(x - mean)(x - mean)ᵗ / (N - 1)` for `N` columns. The result is symmetrized
/// so it is exactly symmetric even when the product picks up rounding error.
pub fn covariance(x: ArrayView2<f64>) -> anyhow::Result<Array2<f64>> {
    let n_obs = x.ncols();
    if n_obs < 2 {
        return Err(LinAlgError::InsufficientObservations {
            required: 2,
            actual: n_obs,
        }
        .into());
    }

    let centered = center(x);
    let mut cov = centered.dot(&centered.t());
    cov /= (n_obs - 1) as f64;

    let cov = (&cov + &cov.t()) * 0.5;
    debug!(
        "covariance of {} dimensions over {} observations",
        x.nrows(),
        n_obs
    );
    Ok(cov)
}

/// Copies `input` without the rows listed in `rows_to_remove`.
///
/// The indices may come in any order, but each must be unique and smaller than the number of
/// rows. Retained rows keep their relative order.
pub fn remove_rows<T: Clone>(
    input: ArrayView2<T>,
    rows_to_remove: &[usize],
) -> anyhow::Result<Array2<T>> {
    let n_rows = input.nrows();
    let mut removed = vec![false; n_rows];

    for &index in rows_to_remove {
        if index >= n_rows {
            return Err(LinAlgError::index_out_of_bounds(index, n_rows).into());
        }
        if removed[index] {
            return Err(LinAlgError::DuplicateIndex { index }.into());
        }
        removed[index] = true;
    }

    let keep: Vec<usize> = (0..n_rows).filter(|&i| !removed[i]).collect();
    Ok(input.select(Axis(0), &keep))
}
