//! Column-major dense matrices.
//!
//! Element `(i, j)` of a matrix with leading dimension `ld` lives at offset `i + j * ld`.
//! This is the layout the dense kernels expect, so buffers cross that boundary without
//! any transposition.

use std::borrow::Cow;
use std::ops::{Index, IndexMut};

use crate::error::LinalgError;

// number of elements spanned by a column-major window
fn span(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        ld * (cols - 1) + rows
    }
}

fn check_layout(len: usize, rows: usize, cols: usize, ld: usize) -> Result<(), LinalgError> {
    if ld < rows.max(1) {
        return Err(LinalgError::dimension_mismatch(
            "leading dimension",
            rows.max(1),
            ld,
        ));
    }
    let required = span(rows, cols, ld);
    if len < required {
        return Err(LinalgError::dimension_mismatch("buffer", required, len));
    }
    Ok(())
}

/// An owned, column-major, double precision matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zeros(n, n);
        for i in 0..n {
            mat.data[i * n + i] = 1.0;
        }
        mat
    }

    /// Create a matrix from a column-major buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len() != rows * cols`.
    pub fn from_col_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LinalgError> {
        if data.len() != rows * cols {
            return Err(LinalgError::dimension_mismatch(
                "matrix data",
                rows * cols,
                data.len(),
            ));
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix from its rows, as written on paper.
    ///
    /// # Example
    ///
    /// ```
    /// use kinalg_linalg::Matrix;
    ///
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(a[(0, 1)], 2.0);
    /// assert_eq!(a.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Self {
        Self::from_fn(rows.len(), N, |i, j| rows[i][j])
    }

    /// Create a matrix by evaluating `f(i, j)` for every element.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                data.push(f(i, j));
            }
        }
        Self { data, rows, cols }
    }

    /// Create an `n x 1` matrix from a vector.
    pub fn column(data: Vec<f64>) -> Self {
        let rows = data.len();
        Self {
            data,
            rows,
            cols: 1,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The column-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The column-major data, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix and return the column-major data.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// The element at `(i, j)`, or `None` if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.rows && j < self.cols).then(|| self.data[i + j * self.rows])
    }

    /// The `j`-th column as a slice.
    pub fn col(&self, j: usize) -> &[f64] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    /// Borrow the matrix as a view.
    pub fn view(&self) -> MatrixView<'_> {
        MatrixView {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
            ld: self.rows.max(1),
        }
    }

    /// Borrow the matrix as a mutable view.
    pub fn view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut {
            ld: self.rows.max(1),
            rows: self.rows,
            cols: self.cols,
            data: &mut self.data,
        }
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Matrix {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)])
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        &self.data[i + j * self.rows]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        &mut self.data[i + j * self.rows]
    }
}

/// A borrowed column-major window over a caller buffer.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a> MatrixView<'a> {
    /// View a packed column-major buffer as a `rows x cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than `rows * cols`.
    pub fn from_slice(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, LinalgError> {
        Self::with_leading_dim(data, rows, cols, rows.max(1))
    }

    /// View a column-major buffer with leading dimension `ld`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ld < rows` or the buffer is too short.
    pub fn with_leading_dim(
        data: &'a [f64],
        rows: usize,
        cols: usize,
        ld: usize,
    ) -> Result<Self, LinalgError> {
        check_layout(data.len(), rows, cols, ld)?;
        Ok(Self {
            data,
            rows,
            cols,
            ld,
        })
    }

    /// View a slice as a column vector.
    pub fn column(data: &'a [f64]) -> Self {
        Self {
            data,
            rows: data.len(),
            cols: 1,
            ld: data.len().max(1),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape `(rows, cols)` of the view.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Leading dimension.
    #[inline]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// The underlying buffer, including the padding between columns.
    #[inline]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// The element at `(i, j)`.
    ///
    /// PRECONDITION: `i < rows` and `j < cols`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i + j * self.ld]
    }

    /// True if the columns are packed back to back.
    pub fn is_contiguous(&self) -> bool {
        self.ld == self.rows || self.cols <= 1
    }

    /// True if no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        (0..self.cols).all(|j| self.col(j).iter().all(|v| v.is_finite()))
    }

    /// The `j`-th column.
    pub fn col(&self, j: usize) -> &'a [f64] {
        if self.rows == 0 {
            return &[];
        }
        let start = j * self.ld;
        &self.data[start..start + self.rows]
    }

    /// The packed `rows * cols` elements, borrowed when the view is already packed.
    pub fn to_contiguous(&self) -> Cow<'a, [f64]> {
        let len = self.rows * self.cols;
        if self.is_contiguous() {
            Cow::Borrowed(&self.data[..len])
        } else {
            let mut packed = Vec::with_capacity(len);
            for j in 0..self.cols {
                packed.extend_from_slice(self.col(j));
            }
            Cow::Owned(packed)
        }
    }

    /// Copy the view into an owned matrix.
    pub fn to_matrix(&self) -> Matrix {
        Matrix {
            data: self.to_contiguous().into_owned(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// A mutable column-major window over a caller buffer.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    data: &'a mut [f64],
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a> MatrixViewMut<'a> {
    /// View a packed column-major buffer as a mutable `rows x cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than `rows * cols`.
    pub fn from_slice(data: &'a mut [f64], rows: usize, cols: usize) -> Result<Self, LinalgError> {
        Self::with_leading_dim(data, rows, cols, rows.max(1))
    }

    /// View a column-major buffer with leading dimension `ld`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ld < rows` or the buffer is too short.
    pub fn with_leading_dim(
        data: &'a mut [f64],
        rows: usize,
        cols: usize,
        ld: usize,
    ) -> Result<Self, LinalgError> {
        check_layout(data.len(), rows, cols, ld)?;
        Ok(Self {
            data,
            rows,
            cols,
            ld,
        })
    }

    /// View a slice as a mutable column vector.
    pub fn column(data: &'a mut [f64]) -> Self {
        let rows = data.len();
        Self {
            data,
            rows,
            cols: 1,
            ld: rows.max(1),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape `(rows, cols)` of the view.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Leading dimension.
    #[inline]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            data: self.data,
            rows: self.rows,
            cols: self.cols,
            ld: self.ld,
        }
    }

    /// The underlying buffer, including the padding between columns.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.data
    }

    /// The element at `(i, j)`.
    ///
    /// PRECONDITION: `i < rows` and `j < cols`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i + j * self.ld]
    }

    /// Write the element at `(i, j)`.
    ///
    /// PRECONDITION: `i < rows` and `j < cols`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i + j * self.ld] = value;
    }

    /// The `j`-th column, mutable.
    pub fn col_mut(&mut self, j: usize) -> &mut [f64] {
        if self.rows == 0 {
            return &mut [];
        }
        let start = j * self.ld;
        &mut self.data[start..start + self.rows]
    }

    /// Set every element to `value`, leaving the padding untouched.
    pub fn fill(&mut self, value: f64) {
        for j in 0..self.cols {
            self.col_mut(j).fill(value);
        }
    }

    /// Copy `src` into this view.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ.
    pub fn copy_from(&mut self, src: &MatrixView<'_>) -> Result<(), LinalgError> {
        if src.rows() != self.rows || src.cols() != self.cols {
            return Err(LinalgError::dimension_mismatch(
                "copy source elements",
                self.rows * self.cols,
                src.rows() * src.cols(),
            ));
        }
        for j in 0..self.cols {
            self.col_mut(j).copy_from_slice(src.col(j));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_layout() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(a.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(a[(1, 2)], 6.0);
        assert_eq!(a.col(1), &[2.0, 5.0]);
        assert_eq!(a.get(2, 0), None);
    }

    #[test]
    fn test_from_col_major_checks_length() {
        let err = Matrix::from_col_major(2, 2, vec![1.0; 3]).unwrap_err();
        assert_eq!(err, LinalgError::dimension_mismatch("matrix data", 4, 3));
    }

    #[test]
    fn test_identity_and_transpose() {
        let eye = Matrix::identity(3);
        assert_eq!(eye, eye.transpose());
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0]]);
        let at = a.transpose();
        assert_eq!(at.shape(), (3, 1));
        assert_eq!(at.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_strided_view() -> Result<(), LinalgError> {
        // 2x2 window inside a 3x2 buffer
        let data = [1.0, 2.0, -1.0, 3.0, 4.0, -1.0];
        let view = MatrixView::with_leading_dim(&data, 2, 2, 3)?;
        assert!(!view.is_contiguous());
        assert_eq!(view.at(1, 1), 4.0);
        assert_eq!(view.to_contiguous().as_ref(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(view.to_matrix(), Matrix::from_rows(&[[1.0, 3.0], [2.0, 4.0]]));
        Ok(())
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = [0.0; 5];
        assert!(MatrixView::from_slice(&data, 2, 3).is_err());
        assert!(MatrixView::with_leading_dim(&data, 3, 1, 2).is_err());
    }

    #[test]
    fn test_view_mut_fill_keeps_padding() -> Result<(), LinalgError> {
        let mut data = [9.0; 6];
        let mut view = MatrixViewMut::with_leading_dim(&mut data, 2, 2, 3)?;
        view.fill(0.0);
        view.set(1, 0, 5.0);
        assert_eq!(view.at(1, 0), 5.0);
        assert_eq!(data, [0.0, 5.0, 9.0, 0.0, 0.0, 9.0]);
        Ok(())
    }

    #[test]
    fn test_is_finite() {
        let mut a = Matrix::identity(2);
        assert!(a.view().is_finite());
        a[(0, 1)] = f64::NAN;
        assert!(!a.view().is_finite());
    }
}
