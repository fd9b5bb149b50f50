//! Dense matrix value type.
//!
//! [`Matrix`] is a small owned wrapper around a dynamically-sized nalgebra
//! matrix. Its dimensions are fixed at construction: every operation returns
//! a new matrix (or overwrites values in place) and never resizes.
//!
//! The operations mirror what multiplicative-update factorization needs:
//!
//! - element-wise multiply ([`Matrix::component_mul`])
//! - element-wise divide with a denominator stabilizer ([`Matrix::component_div_eps`])
//! - matrix product ([`Matrix::matmul`])
//! - transpose ([`Matrix::transpose`])
//! - Frobenius norm ([`Matrix::frobenius_norm`])
//!
//! Binary operations check shapes and report [`NmfError::DimensionMismatch`]
//! instead of panicking.

use crate::{
    error::{NmfError, Result},
    types::{DMatrix, DVector, Scalar},
    utils::parallel_thresholds::parallel_thresholds,
};
use rayon::prelude::*;
use std::fmt;
use std::ops::Index;

/// Owned dense matrix with fixed dimensions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix<T: Scalar> {
    data: DMatrix<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Creates a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: DMatrix::zeros(rows, cols),
        }
    }

    /// Creates a matrix with every element set to `value`.
    pub fn from_element(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: DMatrix::from_element(rows, cols, value),
        }
    }

    /// Creates a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn<F>(rows: usize, cols: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self {
            data: DMatrix::from_fn(rows, cols, f),
        }
    }

    /// Creates a matrix from row-major data.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(NmfError::dimension_mismatch(
                format!("{} elements for a {rows}x{cols} matrix", rows.saturating_mul(cols)),
                format!("{} elements", data.len()),
            ));
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, data),
        })
    }

    /// Creates a matrix from a list of rows.
    ///
    /// All rows must have the same length.
    ///
    /// ```
    /// use nmf_core::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |row| row.as_ref().len());

        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(NmfError::dimension_mismatch(
                    format!("{ncols} columns in every row"),
                    format!("{} columns in row {i}", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }

        Self::from_row_slice(nrows, ncols, &data)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Returns the element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.data.get((row, col)).copied()
    }

    /// Iterates over the elements in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Copies the elements into row-major nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Borrow the underlying nalgebra matrix.
    pub fn as_dmatrix(&self) -> &DMatrix<T> {
        &self.data
    }

    /// Consume the matrix and return the underlying nalgebra matrix.
    pub fn into_dmatrix(self) -> DMatrix<T> {
        self.data
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
        }
    }

    /// Matrix product `self * rhs`.
    ///
    /// Every output column is computed as `self * rhs[:, j]`. Large products
    /// distribute the columns over the rayon pool; small ones run the same
    /// kernel sequentially.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.ncols() != rhs.nrows() {
            return Err(NmfError::dimension_mismatch(
                format!("{} rows in right operand", self.ncols()),
                format!("{}x{} right operand", rhs.nrows(), rhs.ncols()),
            ));
        }

        let (m, k) = self.shape();
        let n = rhs.ncols();
        let column = |j: usize| -> DVector<T> { &self.data * rhs.data.column(j) };

        let columns: Vec<DVector<T>> = if parallel_thresholds().should_parallelize_product(m, n, k)
        {
            log::trace!("column-parallel product ({m}x{k}) * ({k}x{n})");
            (0..n).into_par_iter().map(column).collect()
        } else {
            (0..n).map(column).collect()
        };

        let mut data = DMatrix::zeros(m, n);
        for (j, col) in columns.iter().enumerate() {
            data.set_column(j, col);
        }
        Ok(Self { data })
    }

    /// Element-wise (Hadamard) product.
    pub fn component_mul(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self {
            data: self.data.component_mul(&rhs.data),
        })
    }

    /// Element-wise quotient with `epsilon` added to every denominator.
    pub fn component_div_eps(&self, rhs: &Self, epsilon: T) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self {
            data: self.data.zip_map(&rhs.data, |a, b| a / (b + epsilon)),
        })
    }

    /// Element-wise difference `self - rhs`.
    pub fn component_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self {
            data: &self.data - &rhs.data,
        })
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Self {
            data: self.data.scale(factor),
        }
    }

    /// Applies `f` to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        Self {
            data: self.data.map(f),
        }
    }

    /// Frobenius inner product `sum(self ∘ rhs)`.
    pub fn dot(&self, rhs: &Self) -> Result<T> {
        self.check_same_shape(rhs)?;
        Ok(self.data.dot(&rhs.data))
    }

    /// Frobenius norm: square root of the sum of squared elements.
    pub fn frobenius_norm(&self) -> T {
        self.data.norm()
    }

    /// Largest element, or `None` for an empty matrix.
    pub fn max(&self) -> Option<T> {
        self.data
            .iter()
            .copied()
            .reduce(|acc, x| if x > acc { x } else { acc })
    }

    /// Smallest element, or `None` for an empty matrix.
    pub fn min(&self) -> Option<T> {
        self.data
            .iter()
            .copied()
            .reduce(|acc, x| if x < acc { x } else { acc })
    }

    /// True when every element is `>= 0`.
    pub fn is_non_negative(&self) -> bool {
        self.data.iter().all(|&x| x >= T::zero())
    }

    /// Checks that every element is finite and non-negative.
    ///
    /// `name` identifies the matrix in the error message.
    pub fn check_non_negative(&self, name: &str) -> Result<()> {
        for ((i, j), &x) in self.indexed_iter() {
            if !x.is_finite() {
                return Err(NmfError::invalid_input(format!(
                    "{name}[{i}, {j}] is not finite ({x})"
                )));
            }
            if x < T::zero() {
                return Err(NmfError::invalid_input(format!(
                    "{name}[{i}, {j}] is negative ({x})"
                )));
            }
        }
        Ok(())
    }

    fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let nrows = self.nrows().max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, x)| ((idx % nrows, idx / nrows), x))
    }

    fn check_same_shape(&self, rhs: &Self) -> Result<()> {
        if self.shape() == rhs.shape() {
            Ok(())
        } else {
            Err(NmfError::dimension_mismatch(
                format!("{}x{}", self.nrows(), self.ncols()),
                format!("{}x{}", rhs.nrows(), rhs.ncols()),
            ))
        }
    }
}

/// Frobenius reconstruction error `||V - W·H||_F`.
pub fn reconstruction_error<T: Scalar>(v: &Matrix<T>, w: &Matrix<T>, h: &Matrix<T>) -> Result<T> {
    Ok(v.component_sub(&w.matmul(h)?)?.frobenius_norm())
}

impl<T: Scalar> From<DMatrix<T>> for Matrix<T> {
    fn from(data: DMatrix<T>) -> Self {
        Self { data }
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.data[index]
    }
}

/// Row-major text: one row per line, elements separated by a single space.
///
/// A precision given in the format string (`{:.3}`) applies to every element.
impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.row_iter() {
            let mut first = true;
            for x in row.iter() {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                match f.precision() {
                    Some(p) => write!(f, "{x:.p$}")?,
                    None => write!(f, "{x}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
