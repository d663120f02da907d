//! Square matrix with Gauss-Jordan inversion.
//!
//! The inversion uses full pivoting: on every elimination step the largest (by absolute value)
//! element of the not yet reduced submatrix becomes the pivot. Its row is swapped onto the diagonal,
//! the row and column indices are remembered, and after the elimination the column swaps are
//! undone in reverse order. A pivot smaller than `SINGULAR_PIVOT` means the matrix is singular.
//! A matrix with NaN or infinite entries is rejected before the elimination.
use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// pivots below this magnitude are treated as zero
pub const SINGULAR_PIVOT: f64 = 1e-10;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Singular matrix: pivot {pivot:e} at elimination step {step}")]
    Singular { step: usize, pivot: f64 },
    #[error("Matrix entry ({row}, {col}) is not finite: {value}")]
    NotFinite { row: usize, col: usize, value: f64 },
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// n x n matrix of f64. Access out of bounds panics (`Index`) or returns None (`get`)
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    data: DMatrix<f64>,
}

impl SquareMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            data: DMatrix::zeros(n, n),
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            data: DMatrix::identity(n, n),
        }
    }

    /// matrix from rows, every row must have as many elements as there are rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let n = rows.len();
        let mut data = DMatrix::zeros(n, n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            for (j, value) in row.iter().enumerate() {
                data[(i, j)] = *value;
            }
        }
        Ok(Self { data })
    }

    pub fn from_dmatrix(data: DMatrix<f64>) -> Result<Self, MatrixError> {
        if !data.is_square() {
            return Err(MatrixError::NotSquare {
                rows: data.nrows(),
                cols: data.ncols(),
            });
        }
        Ok(Self { data })
    }

    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.data.get((i, j)).copied()
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// A*v
    pub fn mul_vector(&self, v: &DVector<f64>) -> Result<DVector<f64>, MatrixError> {
        if v.len() != self.dim() {
            return Err(MatrixError::DimensionMismatch {
                expected: self.dim(),
                found: v.len(),
            });
        }
        Ok(&self.data * v)
    }

    /// A*B
    pub fn mul_matrix(&self, other: &SquareMatrix) -> Result<SquareMatrix, MatrixError> {
        if other.dim() != self.dim() {
            return Err(MatrixError::DimensionMismatch {
                expected: self.dim(),
                found: other.dim(),
            });
        }
        Ok(SquareMatrix {
            data: &self.data * &other.data,
        })
    }

    /// first entry (row by row) that is NaN or infinite
    pub fn find_not_finite(&self) -> Option<(usize, usize, f64)> {
        let n = self.dim();
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, self.data[(i, j)]))
            .find(|(_, _, v)| !v.is_finite())
    }

    /// largest absolute deviation from the identity matrix
    pub fn distance_to_identity(&self) -> f64 {
        let n = self.dim();
        let mut max: f64 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let target = if i == j { 1.0 } else { 0.0 };
                max = max.max((self.data[(i, j)] - target).abs());
            }
        }
        max
    }

    /// inverse matrix by Gauss-Jordan elimination with full pivoting
    pub fn invert(&self) -> Result<SquareMatrix, MatrixError> {
        if let Some((row, col, value)) = self.find_not_finite() {
            return Err(MatrixError::NotFinite { row, col, value });
        }
        let n = self.dim();
        let mut a = self.data.clone();
        // row and column of the pivot chosen on each step
        let mut indxr = vec![0usize; n];
        let mut indxc = vec![0usize; n];
        // columns already used as pivot columns
        let mut used = vec![false; n];

        for step in 0..n {
            let mut big = 0.0;
            let (mut irow, mut icol) = (0, 0);
            for j in (0..n).filter(|&j| !used[j]) {
                for k in (0..n).filter(|&k| !used[k]) {
                    if a[(j, k)].abs() > big {
                        big = a[(j, k)].abs();
                        irow = j;
                        icol = k;
                    }
                }
            }
            if big < SINGULAR_PIVOT {
                return Err(MatrixError::Singular { step, pivot: big });
            }
            used[icol] = true;
            // pivot goes to the diagonal position (icol, icol)
            if irow != icol {
                a.swap_rows(irow, icol);
            }
            indxr[step] = irow;
            indxc[step] = icol;

            let pivinv = 1.0 / a[(icol, icol)];
            // the column of the pivot is overwritten with the column of the inverse
            a[(icol, icol)] = 1.0;
            for l in 0..n {
                a[(icol, l)] *= pivinv;
            }
            for ll in (0..n).filter(|&ll| ll != icol) {
                let dum = a[(ll, icol)];
                a[(ll, icol)] = 0.0;
                for l in 0..n {
                    a[(ll, l)] -= a[(icol, l)] * dum;
                }
            }
        }
        // unscramble: column swaps in reverse order of the row swaps
        for l in (0..n).rev() {
            if indxr[l] != indxc[l] {
                a.swap_columns(indxr[l], indxc[l]);
            }
        }
        Ok(SquareMatrix { data: a })
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;
    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index]
    }
}

impl fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.dim() {
            let row: Vec<String> = (0..self.dim())
                .map(|j| format!("{:.4e}", self.data[(i, j)]))
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
