//! # Symmetric matrix vectorization
//!
//! `svec` maps a symmetric `n x n` matrix to a vector of length `n(n+1)/2` holding its upper
//! triangle in row-major order, `(0,0), (0,1), ..., (0,n-1), (1,1), (1,2), ..., (n-1,n-1)`.
//! Off-diagonal entries are multiplied by `√2` so that the Frobenius inner product is preserved:
//! `⟨A, B⟩_F = svec(A) · svec(B)`. `smat` is the inverse.
//!
//! [`sym_kron_id`] builds the matrix of `X ↦ (A·X + X·Aᵗ)/2` acting on svec coordinates, which
//! is how symmetric matrix unknowns are written as plain vectors in semidefinite programs.

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use log::trace;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::decomposition::ensure_square;
use crate::error::LinAlgError;

/// Length of the svec encoding of an `n x n` matrix.
pub fn svec_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// [`svec_len`] that returns `None` instead of overflowing.
fn checked_svec_len(n: usize) -> Option<usize> {
    let m = n.checked_add(1)?;
    // Halve whichever factor is even so the product is exact
    if n % 2 == 0 {
        (n / 2).checked_mul(m)
    } else {
        n.checked_mul(m / 2)
    }
}

/// Inverse of [`svec_len`]: the matrix dimension for an encoding of length `len`.
pub fn smat_dim(len: usize) -> anyhow::Result<usize> {
    // n ≈ √(2·len); fix up the float rounding with exact integer checks
    let mut n = (2.0 * len as f64).sqrt() as usize;
    while n
        .checked_add(1)
        .and_then(checked_svec_len)
        .is_some_and(|l| l <= len)
    {
        n += 1;
    }
    while checked_svec_len(n).map_or(true, |l| l > len) {
        n -= 1;
    }

    if checked_svec_len(n) != Some(len) {
        return Err(LinAlgError::InvalidSvecLength { len }.into());
    }
    Ok(n)
}

/// Position of entry `(i, j)` in the encoding, without bounds checks. The pair is unordered.
#[inline]
pub(crate) fn svec_position(i: usize, j: usize, n: usize) -> usize {
    let (i, j) = if i <= j { (i, j) } else { (j, i) };
    // Rows 0..i of the upper triangle hold n + (n-1) + ... + (n-i+1) entries
    (j - i) + (n * (n + 1) - (n - i) * (n - i + 1)) / 2
}

/// Returns the position `p` in the encoding of an `n x n` matrix such that
/// `A[i, j] == f(i, j) * svec(A)[p]`, where `f(i, j)` is `1/√2` off the diagonal and `1` on it.
///
/// `(i, j)` and `(j, i)` share a position.
pub fn svec_index(i: usize, j: usize, n: usize) -> anyhow::Result<usize> {
    if i >= n {
        return Err(LinAlgError::index_out_of_bounds(i, n).into());
    }
    if j >= n {
        return Err(LinAlgError::index_out_of_bounds(j, n).into());
    }
    Ok(svec_position(i, j, n))
}

/// Encodes a square matrix.
///
/// A non-symmetric input is encoded through its symmetric part `(A + Aᵗ)/2`, i.e. each
/// off-diagonal pair is averaged. For symmetric input this changes nothing.
pub fn svec(input: ArrayView2<f64>) -> anyhow::Result<Array1<f64>> {
    let n = ensure_square(&input)?;
    let mut output = Array1::zeros(svec_len(n));

    let mut idx = 0;
    for i in 0..n {
        output[idx] = input[[i, i]];
        idx += 1;
        for j in (i + 1)..n {
            let value = if input[[i, j]] == input[[j, i]] {
                input[[i, j]]
            } else {
                0.5 * (input[[i, j]] + input[[j, i]])
            };
            output[idx] = SQRT_2 * value;
            idx += 1;
        }
    }

    trace!("svec of {}x{} matrix into {} entries", n, n, output.len());
    Ok(output)
}

/// Decodes an svec vector back into the full symmetric matrix.
///
/// Fails with [`LinAlgError::InvalidSvecLength`] if the length is not `n(n+1)/2` for any `n`.
pub fn smat(input: ArrayView1<f64>) -> anyhow::Result<Array2<f64>> {
    let n = smat_dim(input.len())?;
    let mut output = Array2::zeros((n, n));

    let mut idx = 0;
    for i in 0..n {
        output[[i, i]] = input[idx];
        idx += 1;
        for j in (i + 1)..n {
            let value = input[idx] / SQRT_2;
            output[[i, j]] = value;
            output[[j, i]] = value;
            idx += 1;
        }
    }

    Ok(output)
}

/// Matrix of the symmetric Kronecker product of `a` with the identity on svec coordinates.
///
/// For every symmetric `X`: `sym_kron_id(A) · svec(X) == svec((A·X + X·Aᵗ)/2)`.
///
/// Column `svec_index(p, q)` is the encoding of the image of the basis matrix `E_pq`, where
/// `E_pp = e_p e_pᵗ` and `E_pq = (e_p e_qᵗ + e_q e_pᵗ)/√2`. With `B = A·E_pq` the image is
/// `(B + Bᵗ)/2`, and each nonzero `B[k, c]` lands at position `(k, c)` with weight `1` on
/// the diagonal and `1/√2` off it.
pub fn sym_kron_id(a: ArrayView2<f64>) -> anyhow::Result<Array2<f64>> {
    let n = ensure_square(&a)?;
    let n_bar = svec_len(n);
    let mut op = Array2::zeros((n_bar, n_bar));

    for p in 0..n {
        for q in p..n {
            let col = svec_position(p, q, n);
            if p == q {
                // B = A e_p e_pᵗ: column p of B is column p of A
                scatter_column(&mut op, col, a.column(p), p, false);
            } else {
                // B = A (e_p e_qᵗ + e_q e_pᵗ)/√2
                scatter_column(&mut op, col, a.column(p), q, true);
                scatter_column(&mut op, col, a.column(q), p, true);
            }
        }
    }

    trace!("sym_kron_id operator of size {}x{}", n_bar, n_bar);
    Ok(op)
}

/// Adds the svec image of a single nonzero column `c` of `B` (with entries `source`, scaled
/// by `1/√2` when `off_diagonal_basis`) into column `col` of `op`.
fn scatter_column(
    op: &mut Array2<f64>,
    col: usize,
    source: ArrayView1<f64>,
    c: usize,
    off_diagonal_basis: bool,
) {
    let n = source.len();
    for k in 0..n {
        let weight = match (off_diagonal_basis, k == c) {
            (false, true) => 1.0,
            (false, false) | (true, true) => FRAC_1_SQRT_2,
            // 1/√2 from the basis matrix times 1/√2 from the encoding, kept exact
            (true, false) => 0.5,
        };
        op[[svec_position(k, c, n), col]] += weight * source[k];
    }
}
