//! Structural and algebraic matrix operations
//!
//! Concatenation, multiplication, and the recursive cofactor family:
//! minor, determinant, adjoint, inverse. The determinant is exponential in
//! the matrix order, which is acceptable for the small dense matrices this
//! crate targets; [`Determinant`] keeps the algorithm swappable.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::ops::Axis;

/// Default threshold under which `|det|` is treated as singular by
/// [`inverse`]. Exact-zero comparison under-detects near-singular matrices,
/// so the cutoff is part of the contract; [`inverse_with_tolerance`] accepts
/// a caller-chosen value.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Concatenate two matrices.
///
/// `Axis::Column` appends the columns of `b` to the rows of `a` (equal row
/// counts required); `Axis::Row` stacks the rows of `b` below `a` (equal
/// column counts required). Fails with a `Shape` error on mismatch.
pub fn concat(a: &Matrix, b: &Matrix, axis: Axis) -> Result<Matrix> {
    let (x, y) = (a.numeric()?, b.numeric()?);
    let joined = match axis {
        Axis::Column => {
            if x.nrows() != y.nrows() {
                return Err(Error::shape(format!(
                    "column concat needs equal row counts, got {} and {}",
                    x.nrows(),
                    y.nrows()
                )));
            }
            ndarray::concatenate(ndarray::Axis(1), &[x.view(), y.view()])
        }
        Axis::Row => {
            if x.ncols() != y.ncols() {
                return Err(Error::shape(format!(
                    "row concat needs equal column counts, got {} and {}",
                    x.ncols(),
                    y.ncols()
                )));
            }
            ndarray::concatenate(ndarray::Axis(0), &[x.view(), y.view()])
        }
    };
    Ok(Matrix::from_array(
        joined.map_err(|e| Error::shape(e.to_string()))?,
    ))
}

/// Standard matrix product.
///
/// Requires `a.ncols() == b.nrows()`; the result is `a.nrows() x b.ncols()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let (x, y) = (a.numeric()?, b.numeric()?);
    if x.ncols() != y.nrows() {
        return Err(Error::shape(format!(
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            x.nrows(),
            x.ncols(),
            y.nrows(),
            y.ncols()
        )));
    }
    let mut out = Array2::zeros((x.nrows(), y.ncols()));
    for i in 0..x.nrows() {
        for j in 0..y.ncols() {
            let mut acc = 0.0;
            for k in 0..y.nrows() {
                acc += x[[i, k]] * y[[k, j]];
            }
            out[[i, j]] = acc;
        }
    }
    Ok(Matrix::from_array(out))
}

/// Submatrix obtained by deleting one row and one column, preserving the
/// relative order of the remaining cells.
pub fn minor(m: &Matrix, exclude_row: usize, exclude_col: usize) -> Result<Matrix> {
    let a = m.numeric()?;
    if exclude_row >= a.nrows() || exclude_col >= a.ncols() {
        return Err(Error::index(format!(
            "cell ({}, {}) of a {}x{} matrix",
            exclude_row,
            exclude_col,
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() < 2 || a.ncols() < 2 {
        return Err(Error::shape(format!(
            "minor of a {}x{} matrix is undefined",
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(Matrix::from_array(minor_of(a, exclude_row, exclude_col)))
}

fn minor_of(a: &Array2<f64>, skip_row: usize, skip_col: usize) -> Array2<f64> {
    let (nrows, ncols) = a.dim();
    let mut out = Array2::zeros((nrows - 1, ncols - 1));
    let mut oi = 0;
    for i in 0..nrows {
        if i == skip_row {
            continue;
        }
        let mut oj = 0;
        for j in 0..ncols {
            if j == skip_col {
                continue;
            }
            out[[oi, oj]] = a[[i, j]];
            oj += 1;
        }
        oi += 1;
    }
    out
}

/// Borrow the numeric buffer of a matrix that must be square and non-empty
fn square(m: &Matrix) -> Result<&Array2<f64>> {
    let a = m.numeric()?;
    if a.nrows() != a.ncols() {
        return Err(Error::shape(format!(
            "expected a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() == 0 {
        return Err(Error::shape("determinant of an empty matrix is undefined"));
    }
    Ok(a)
}

/// Cofactor expansion along the first row. Exponential in the matrix order.
fn det_expand(a: &Array2<f64>) -> f64 {
    let n = a.nrows();
    if n == 1 {
        return a[[0, 0]];
    }
    let mut det = 0.0;
    let mut sign = 1.0;
    for f in 0..n {
        let sub = minor_of(a, 0, f);
        det += sign * a[[0, f]] * det_expand(&sub);
        sign = -sign;
    }
    det
}

/// Strategy interface for determinant computation.
///
/// The crate ships [`CofactorExpansion`]; a pivoting or LU-based
/// implementation can be substituted for larger inputs without touching the
/// rest of the public contract.
pub trait Determinant {
    /// Determinant of the square matrix `m`.
    ///
    /// Fails with a `Shape` error if `m` is not square or is empty.
    fn determinant(&self, m: &Matrix) -> Result<f64>;
}

/// Recursive cofactor expansion along the first row
#[derive(Debug, Clone, Copy, Default)]
pub struct CofactorExpansion;

impl Determinant for CofactorExpansion {
    fn determinant(&self, m: &Matrix) -> Result<f64> {
        Ok(det_expand(square(m)?))
    }
}

/// Determinant via the default [`CofactorExpansion`] strategy
pub fn determinant(m: &Matrix) -> Result<f64> {
    CofactorExpansion.determinant(m)
}

/// Adjoint (adjugate): the transpose of the cofactor matrix, computed in a
/// single fused pass. A 1x1 matrix has the degenerate adjoint `[[1]]`.
pub fn adjoint(m: &Matrix) -> Result<Matrix> {
    let a = square(m)?;
    let n = a.nrows();
    if n == 1 {
        return Matrix::from_rows(vec![vec![1.0]]);
    }
    let mut out = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
            let sub = minor_of(a, i, j);
            out[[j, i]] = sign * det_expand(&sub);
        }
    }
    Ok(Matrix::from_array(out))
}

/// Inverse via adjoint over determinant, using [`SINGULAR_TOLERANCE`]
pub fn inverse(m: &Matrix) -> Result<Matrix> {
    inverse_with_tolerance(m, SINGULAR_TOLERANCE)
}

/// Inverse with a caller-chosen singularity cutoff.
///
/// Fails with a `Singular` error carrying the determinant when
/// `|det| <= tolerance`.
pub fn inverse_with_tolerance(m: &Matrix, tolerance: f64) -> Result<Matrix> {
    let det = determinant(m)?;
    if det.abs() <= tolerance {
        return Err(Error::singular(det));
    }
    let adj = adjoint(m)?;
    Ok(Matrix::from_array(adj.numeric()?.mapv(|x| x / det)))
}
