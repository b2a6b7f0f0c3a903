//! Dense row-major matrix with dual text/numeric cell storage
//!
//! CSV-style ingestion produces text cells; every numeric operation works on
//! the `f64` side. A [`Matrix`] tracks which representation is authoritative
//! via [`Repr`], and conversions between the two are pure: they return a new
//! value and never mutate during reads.

use std::fmt;

use ndarray::{s, Array1, Array2};

use crate::error::{Error, Result};

/// Which cell representation is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repr {
    /// Only the text buffer is populated
    Text,
    /// Only the numeric buffer is populated
    Numeric,
    /// Both buffers are populated and denote the same values
    Synced,
}

/// Cell storage. The enum makes a buffer-less or half-synced state
/// unrepresentable.
#[derive(Debug, Clone, PartialEq)]
enum Cells {
    Text(Array2<String>),
    Numeric(Array2<f64>),
    Synced {
        text: Array2<String>,
        numeric: Array2<f64>,
    },
}

/// Dense 2-D matrix of double-precision cells with an optional text
/// representation of the same values.
///
/// Matrices are immutable by convention: every operation in [`crate::ops`]
/// and [`crate::linalg`] returns a freshly allocated value. A matrix with
/// zero rows or zero columns is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    cells: Cells,
}

impl Matrix {
    /// Build a numeric matrix from nested rows.
    ///
    /// Fails with a `Shape` error if the rows have uneven lengths. An empty
    /// outer vector yields a valid 0x0 matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::shape(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            flat.extend_from_slice(row);
        }
        let numeric = Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| Error::shape(e.to_string()))?;
        Ok(Self::from_array(numeric))
    }

    /// Build a text matrix from nested rows, e.g. freshly ingested CSV
    /// records. Fails with a `Shape` error if the rows have uneven lengths.
    pub fn from_text_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::shape(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            flat.extend(row);
        }
        let text = Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| Error::shape(e.to_string()))?;
        Ok(Self {
            cells: Cells::Text(text),
        })
    }

    /// Wrap an existing numeric array
    pub fn from_array(numeric: Array2<f64>) -> Self {
        Self {
            cells: Cells::Numeric(numeric),
        }
    }

    /// Fresh zero-filled numeric matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_array(Array2::zeros((nrows, ncols)))
    }

    /// Which representation is authoritative
    pub fn repr(&self) -> Repr {
        match self.cells {
            Cells::Text(_) => Repr::Text,
            Cells::Numeric(_) => Repr::Numeric,
            Cells::Synced { .. } => Repr::Synced,
        }
    }

    /// `(rows, columns)` of the matrix
    pub fn shape(&self) -> (usize, usize) {
        match &self.cells {
            Cells::Text(t) => t.dim(),
            Cells::Numeric(n) | Cells::Synced { numeric: n, .. } => n.dim(),
        }
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    /// True when the matrix has zero rows or zero columns
    pub fn is_empty(&self) -> bool {
        let (r, c) = self.shape();
        r == 0 || c == 0
    }

    /// Borrow the numeric buffer.
    ///
    /// Fails when the matrix holds only a text representation; callers must
    /// convert with [`Matrix::to_numeric`] first, conversions are never
    /// implicit.
    pub fn numeric(&self) -> Result<&Array2<f64>> {
        match &self.cells {
            Cells::Numeric(n) | Cells::Synced { numeric: n, .. } => Ok(n),
            Cells::Text(_) => Err(Error::invalid_parameter(
                "matrix holds only a text representation; call to_numeric first",
            )),
        }
    }

    /// Borrow the text buffer.
    ///
    /// Fails when the matrix holds only a numeric representation.
    pub fn text(&self) -> Result<&Array2<String>> {
        match &self.cells {
            Cells::Text(t) | Cells::Synced { text: t, .. } => Ok(t),
            Cells::Numeric(_) => Err(Error::invalid_parameter(
                "matrix holds only a numeric representation; call to_text first",
            )),
        }
    }

    /// Half-open sub-matrix `[row_start, row_end) x [col_start, col_end)`.
    ///
    /// Zero-length slices are allowed when explicitly requested
    /// (`start == end`); inverted or out-of-bounds bounds fail with a
    /// `Range` error.
    pub fn slice(
        &self,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    ) -> Result<Matrix> {
        let (nrows, ncols) = self.shape();
        if row_start > row_end || col_start > col_end {
            return Err(Error::range(format!(
                "inverted slice bounds {}..{} x {}..{}",
                row_start, row_end, col_start, col_end
            )));
        }
        if row_end > nrows || col_end > ncols {
            return Err(Error::range(format!(
                "slice {}..{} x {}..{} exceeds a {}x{} matrix",
                row_start, row_end, col_start, col_end, nrows, ncols
            )));
        }
        let cells = match &self.cells {
            Cells::Text(t) => Cells::Text(t.slice(s![row_start..row_end, col_start..col_end]).to_owned()),
            Cells::Numeric(n) => {
                Cells::Numeric(n.slice(s![row_start..row_end, col_start..col_end]).to_owned())
            }
            Cells::Synced { text, numeric } => Cells::Synced {
                text: text.slice(s![row_start..row_end, col_start..col_end]).to_owned(),
                numeric: numeric.slice(s![row_start..row_end, col_start..col_end]).to_owned(),
            },
        };
        Ok(Matrix { cells })
    }

    /// Copy of row `index` as a numeric vector
    pub fn row(&self, index: usize) -> Result<Array1<f64>> {
        let a = self.numeric()?;
        if index >= a.nrows() {
            return Err(Error::index(format!(
                "row {} of a {}x{} matrix",
                index,
                a.nrows(),
                a.ncols()
            )));
        }
        Ok(a.row(index).to_owned())
    }

    /// Copy of column `index` as a numeric vector
    pub fn column(&self, index: usize) -> Result<Array1<f64>> {
        let a = self.numeric()?;
        if index >= a.ncols() {
            return Err(Error::index(format!(
                "column {} of a {}x{} matrix",
                index,
                a.nrows(),
                a.ncols()
            )));
        }
        Ok(a.column(index).to_owned())
    }

    /// Single numeric cell at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let a = self.numeric()?;
        if row >= a.nrows() || col >= a.ncols() {
            return Err(Error::index(format!(
                "cell ({}, {}) of a {}x{} matrix",
                row,
                col,
                a.nrows(),
                a.ncols()
            )));
        }
        Ok(a[[row, col]])
    }

    /// Return a matrix whose numeric buffer is populated.
    ///
    /// Parses every text cell when the matrix is text-only; a token that is
    /// not a valid number fails with a `Parse` error, never a silent zero.
    pub fn to_numeric(&self) -> Result<Matrix> {
        match &self.cells {
            Cells::Numeric(_) | Cells::Synced { .. } => Ok(self.clone()),
            Cells::Text(text) => {
                let mut flat = Vec::with_capacity(text.len());
                for ((i, j), cell) in text.indexed_iter() {
                    let value = cell.trim().parse::<f64>().map_err(|_| {
                        Error::parse(format!("cell ({}, {}) {:?} is not a number", i, j, cell))
                    })?;
                    flat.push(value);
                }
                let numeric = Array2::from_shape_vec(text.dim(), flat)
                    .map_err(|e| Error::shape(e.to_string()))?;
                Ok(Matrix {
                    cells: Cells::Synced {
                        text: text.clone(),
                        numeric,
                    },
                })
            }
        }
    }

    /// Return a matrix whose text buffer is populated, formatting numeric
    /// cells when necessary.
    pub fn to_text(&self) -> Matrix {
        match &self.cells {
            Cells::Text(_) | Cells::Synced { .. } => self.clone(),
            Cells::Numeric(numeric) => {
                let text = numeric.mapv(|v| v.to_string());
                Matrix {
                    cells: Cells::Synced {
                        text,
                        numeric: numeric.clone(),
                    },
                }
            }
        }
    }
}

fn fmt_rows<T: fmt::Display>(f: &mut fmt::Formatter<'_>, a: &Array2<T>) -> fmt::Result {
    for row in a.rows() {
        write!(f, "[")?;
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        writeln!(f, "]")?;
    }
    Ok(())
}

impl fmt::Display for Matrix {
    /// Renders the active representation, one bracketed row per line.
    /// Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cells {
            Cells::Text(t) => fmt_rows(f, t),
            Cells::Numeric(n) | Cells::Synced { numeric: n, .. } => fmt_rows(f, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_from_rows_shape() {
        let m = sample();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m.repr(), Repr::Numeric);
        assert!(!m.is_empty());
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn test_empty_matrix_is_valid() {
        let m = Matrix::from_rows(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
    }

    #[test]
    fn test_zeros() {
        let m = Matrix::zeros(2, 4);
        assert_eq!(m.shape(), (2, 4));
        assert_eq!(m.get(1, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_slice() {
        let m = sample();
        let s = m.slice(0, 1, 1, 3).unwrap();
        assert_eq!(s.shape(), (1, 2));
        assert_eq!(s.get(0, 0).unwrap(), 2.0);
        assert_eq!(s.get(0, 1).unwrap(), 3.0);
    }

    #[test]
    fn test_slice_zero_length() {
        let m = sample();
        let s = m.slice(1, 1, 0, 3).unwrap();
        assert_eq!(s.shape(), (0, 3));
    }

    #[test]
    fn test_slice_inverted_bounds() {
        let m = sample();
        let err = m.slice(1, 0, 0, 3).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let m = sample();
        let err = m.slice(0, 3, 0, 3).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn test_row_and_column() {
        let m = sample();
        assert_eq!(m.row(1).unwrap().to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).unwrap().to_vec(), vec![3.0, 6.0]);

        assert!(matches!(m.row(2).unwrap_err(), Error::Index { .. }));
        assert!(matches!(m.column(3).unwrap_err(), Error::Index { .. }));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = sample();
        assert!(matches!(m.get(2, 0).unwrap_err(), Error::Index { .. }));
    }

    #[test]
    fn test_to_numeric_parses_text() {
        let m = Matrix::from_text_rows(vec![
            vec!["1.5".to_string(), " 2 ".to_string()],
            vec!["-3".to_string(), "4e2".to_string()],
        ])
        .unwrap();
        assert_eq!(m.repr(), Repr::Text);

        let n = m.to_numeric().unwrap();
        assert_eq!(n.repr(), Repr::Synced);
        assert_eq!(n.get(0, 0).unwrap(), 1.5);
        assert_eq!(n.get(0, 1).unwrap(), 2.0);
        assert_eq!(n.get(1, 1).unwrap(), 400.0);
    }

    #[test]
    fn test_to_numeric_rejects_bad_token() {
        let m = Matrix::from_text_rows(vec![vec!["1".to_string(), "oops".to_string()]]).unwrap();
        let err = m.to_numeric().unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_text_only_matrix_has_no_numeric_side() {
        let m = Matrix::from_text_rows(vec![vec!["1".to_string()]]).unwrap();
        assert!(m.numeric().is_err());
        assert!(m.row(0).is_err());
    }

    #[test]
    fn test_to_text_formats_numbers() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.5]]).unwrap();
        let t = m.to_text();
        assert_eq!(t.repr(), Repr::Synced);
        assert_eq!(t.text().unwrap()[[0, 0]], "1");
        assert_eq!(t.text().unwrap()[[0, 1]], "2.5");
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.to_string(), "[1, 2]\n[3, 4]\n");
    }
}
