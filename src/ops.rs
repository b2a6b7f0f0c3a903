//! Elementwise and reduction operations over [`Matrix`] values
//!
//! Every operation is a pure function of its arguments and returns a fresh
//! numeric matrix.

use std::str::FromStr;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Axis selector for reductions and concatenation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Reduce each row to a single value; the result is a column vector
    Row,
    /// Reduce each column to a single value; the result is a row vector
    Column,
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" => Ok(Axis::Row),
            "column" => Ok(Axis::Column),
            other => Err(Error::invalid_parameter(format!(
                "unknown axis {:?}, expected \"row\" or \"column\"",
                other
            ))),
        }
    }
}

/// Borrow the numeric buffer of a matrix that must not be empty
fn non_empty(m: &Matrix) -> Result<&Array2<f64>> {
    let a = m.numeric()?;
    if a.nrows() == 0 || a.ncols() == 0 {
        return Err(Error::shape("cannot reduce an empty matrix"));
    }
    Ok(a)
}

/// Elementwise `x^exponent`
pub fn power(m: &Matrix, exponent: f64) -> Result<Matrix> {
    let a = m.numeric()?;
    Ok(Matrix::from_array(a.mapv(|x| x.powf(exponent))))
}

/// Elementwise square root.
///
/// Fails with a `Domain` error if any cell is negative.
pub fn sqrt(m: &Matrix) -> Result<Matrix> {
    let a = m.numeric()?;
    if let Some(bad) = a.iter().find(|x| **x < 0.0) {
        return Err(Error::domain(format!(
            "square root of negative value {}",
            bad
        )));
    }
    Ok(Matrix::from_array(a.mapv(f64::sqrt)))
}

/// Elementwise sum of two matrices of identical shape
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let (x, y) = (a.numeric()?, b.numeric()?);
    if x.dim() != y.dim() {
        return Err(Error::shape(format!(
            "cannot add a {}x{} matrix and a {}x{} matrix",
            x.nrows(),
            x.ncols(),
            y.nrows(),
            y.ncols()
        )));
    }
    Ok(Matrix::from_array(x + y))
}

/// Elementwise difference of two matrices of identical shape
pub fn sub(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let (x, y) = (a.numeric()?, b.numeric()?);
    if x.dim() != y.dim() {
        return Err(Error::shape(format!(
            "cannot subtract a {}x{} matrix from a {}x{} matrix",
            y.nrows(),
            y.ncols(),
            x.nrows(),
            x.ncols()
        )));
    }
    Ok(Matrix::from_array(x - y))
}

/// Sum along an axis.
///
/// `Axis::Row` reduces each row to a scalar (column vector of length
/// `nrows`); `Axis::Column` reduces each column (row vector of length
/// `ncols`). Fails with a `Shape` error on an empty matrix.
pub fn sum(m: &Matrix, axis: Axis) -> Result<Matrix> {
    let a = non_empty(m)?;
    let out = match axis {
        Axis::Row => a.sum_axis(ndarray::Axis(1)).insert_axis(ndarray::Axis(1)),
        Axis::Column => a.sum_axis(ndarray::Axis(0)).insert_axis(ndarray::Axis(0)),
    };
    Ok(Matrix::from_array(out))
}

/// Arithmetic mean along an axis; same result orientation as [`sum`]
pub fn mean(m: &Matrix, axis: Axis) -> Result<Matrix> {
    let a = non_empty(m)?;
    let out = match axis {
        Axis::Row => a
            .mean_axis(ndarray::Axis(1))
            .ok_or_else(|| Error::shape("cannot reduce an empty matrix"))?
            .insert_axis(ndarray::Axis(1)),
        Axis::Column => a
            .mean_axis(ndarray::Axis(0))
            .ok_or_else(|| Error::shape("cannot reduce an empty matrix"))?
            .insert_axis(ndarray::Axis(0)),
    };
    Ok(Matrix::from_array(out))
}

/// Index of the minimum along an axis, ties resolving to the lowest index.
///
/// `Axis::Row` yields, for each row, the column index of its minimum (a
/// column vector of indices); `Axis::Column` yields row indices per column.
pub fn argmin(m: &Matrix, axis: Axis) -> Result<Matrix> {
    let a = non_empty(m)?;
    let out = match axis {
        Axis::Row => {
            let mut indices = Array2::zeros((a.nrows(), 1));
            for (i, row) in a.rows().into_iter().enumerate() {
                indices[[i, 0]] = first_min(row.iter().copied()) as f64;
            }
            indices
        }
        Axis::Column => {
            let mut indices = Array2::zeros((1, a.ncols()));
            for (j, col) in a.columns().into_iter().enumerate() {
                indices[[0, j]] = first_min(col.iter().copied()) as f64;
            }
            indices
        }
    };
    Ok(Matrix::from_array(out))
}

/// First-seen position of the minimum of a non-empty sequence
fn first_min(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::INFINITY;
    for (i, v) in values.enumerate() {
        if v < best_value {
            best_value = v;
            best = i;
        }
    }
    best
}
