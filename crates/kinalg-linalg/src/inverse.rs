use kinalg_lapack::{run_with_workspace, DenseKernels};

use crate::{
    error::{check_lu_info, LinalgError},
    matrix::{Matrix, MatrixView, MatrixViewMut},
};

/// Row interchanges produced by [`lu_factor`].
///
/// Entry `i` is the 1-based row swapped with row `i`. The pivots are only meaningful for
/// the factored matrix they came from, whose shape they remember.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivots {
    ipiv: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl Pivots {
    /// The raw 1-based interchanges.
    pub fn as_slice(&self) -> &[i32] {
        &self.ipiv
    }

    /// Number of interchanges, `min(rows, cols)` of the factored matrix.
    pub fn len(&self) -> usize {
        self.ipiv.len()
    }

    /// True for the pivots of an empty matrix.
    pub fn is_empty(&self) -> bool {
        self.ipiv.is_empty()
    }

    /// Shape `(rows, cols)` of the factored matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// LU factorization with partial pivoting, in place.
///
/// On success `a` holds the unit lower triangular `L` below the diagonal and `U` on and
/// above it.
///
/// # Errors
///
/// Returns [`LinalgError::SingularMatrix`] if a pivot is exactly zero. The factors are
/// still written to `a` in that case.
pub fn lu_factor<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &mut MatrixViewMut<'_>,
) -> Result<Pivots, LinalgError> {
    let (m, n, lda) = (a.rows(), a.cols(), a.ld());
    let mut ipiv = vec![0i32; m.min(n)];
    let info = kernels.getrf(m, n, a.as_mut_slice(), lda, &mut ipiv);
    check_lu_info("getrf", info)?;
    Ok(Pivots {
        ipiv,
        rows: m,
        cols: n,
    })
}

/// Replace LU factors with the inverse of the original matrix.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The factors computed by [`lu_factor`], overwritten with the inverse.
/// * `pivots` - The pivots returned by the same [`lu_factor`] call.
///
/// # Errors
///
/// * [`LinalgError::NotSquare`] if `a` or the factored matrix is not square.
/// * [`LinalgError::DimensionMismatch`] if the pivots belong to a matrix of another order.
/// * [`LinalgError::SingularMatrix`] if `U` has a zero on its diagonal.
pub fn lu_inverse<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &mut MatrixViewMut<'_>,
    pivots: &Pivots,
) -> Result<(), LinalgError> {
    let (n, lda) = (a.rows(), a.ld());
    if a.cols() != n {
        return Err(LinalgError::NotSquare {
            rows: n,
            cols: a.cols(),
        });
    }
    let (rows, cols) = pivots.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rows != n {
        return Err(LinalgError::dimension_mismatch("pivots", n, rows));
    }

    let data = a.as_mut_slice();
    let info = run_with_workspace("getri", |work, lwork| {
        kernels.getri(n, data, lda, pivots.as_slice(), work, lwork)
    });
    check_lu_info("getri", info)
}

/// Invert a square matrix in place.
///
/// An empty matrix is left as is.
///
/// # Errors
///
/// * [`LinalgError::NotSquare`] if `a` is not square.
/// * [`LinalgError::SingularMatrix`] if `a` has no inverse. The contents of `a` are
///   unspecified afterwards.
///
/// # Example
///
/// ```
/// use kinalg_linalg::{inv_inplace, Matrix, NativeKernels};
///
/// let mut a = Matrix::from_rows(&[[2.0, 0.0], [0.0, 4.0]]);
/// inv_inplace(&NativeKernels, &mut a.view_mut())?;
/// assert_eq!(a, Matrix::from_rows(&[[0.5, 0.0], [0.0, 0.25]]));
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
pub fn inv_inplace<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &mut MatrixViewMut<'_>,
) -> Result<(), LinalgError> {
    let n = a.rows();
    if a.cols() != n {
        return Err(LinalgError::NotSquare {
            rows: n,
            cols: a.cols(),
        });
    }
    if n == 0 {
        return Ok(());
    }

    log::debug!("inverting a {n}x{n} matrix");
    let pivots = lu_factor(kernels, a)?;
    lu_inverse(kernels, a, &pivots)
}

/// Compute the inverse of a square matrix.
pub fn inv<K: DenseKernels + ?Sized>(kernels: &K, a: &MatrixView<'_>) -> Result<Matrix, LinalgError> {
    let mut out = a.to_matrix();
    inv_inplace(kernels, &mut out.view_mut())?;
    Ok(out)
}
