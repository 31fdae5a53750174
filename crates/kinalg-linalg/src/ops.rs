use crate::{
    error::{check_shape, LinalgError},
    matrix::{Matrix, MatrixView, MatrixViewMut},
};

fn check_square(rows: usize, cols: usize) -> Result<(), LinalgError> {
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(())
}

/// Compute the transpose of a matrix.
pub fn transpose(a: &MatrixView<'_>) -> Matrix {
    Matrix::from_fn(a.cols(), a.rows(), |i, j| a.at(j, i))
}

/// Write the transpose of `a` into `at`.
///
/// # Errors
///
/// Returns an error if `at` is not `a.cols() x a.rows()`.
pub fn transpose_into(a: &MatrixView<'_>, at: &mut MatrixViewMut<'_>) -> Result<(), LinalgError> {
    check_shape(
        "transpose output rows",
        "transpose output cols",
        (a.cols(), a.rows()),
        at.shape(),
    )?;
    for j in 0..a.cols() {
        for i in 0..a.rows() {
            at.set(j, i, a.at(i, j));
        }
    }
    Ok(())
}

/// Transpose a square matrix in place.
pub fn transpose_inplace(a: &mut MatrixViewMut<'_>) -> Result<(), LinalgError> {
    check_square(a.rows(), a.cols())?;
    for i in 0..a.rows() {
        for j in i + 1..a.cols() {
            let (upper, lower) = (a.at(i, j), a.at(j, i));
            a.set(i, j, lower);
            a.set(j, i, upper);
        }
    }
    Ok(())
}

/// Sum of the diagonal of a square matrix.
pub fn trace(a: &MatrixView<'_>) -> Result<f64, LinalgError> {
    check_square(a.rows(), a.cols())?;
    Ok((0..a.rows()).map(|i| a.at(i, i)).sum())
}

/// General matrix-vector product `y = alpha * A * x + beta * y`.
///
/// With `beta == 0` the previous contents of `y` are ignored, NaN included.
pub fn gemv(
    alpha: f64,
    a: &MatrixView<'_>,
    x: &[f64],
    beta: f64,
    y: &mut [f64],
) -> Result<(), LinalgError> {
    if x.len() != a.cols() {
        return Err(LinalgError::dimension_mismatch("x", a.cols(), x.len()));
    }
    if y.len() != a.rows() {
        return Err(LinalgError::dimension_mismatch("y", a.rows(), y.len()));
    }

    if beta == 0.0 {
        y.fill(0.0);
    } else if beta != 1.0 {
        y.iter_mut().for_each(|v| *v *= beta);
    }

    // column-oriented: y += (alpha * x[j]) * A[:, j]
    for (j, &xj) in x.iter().enumerate() {
        let t = alpha * xj;
        if t == 0.0 {
            continue;
        }
        for (yi, aij) in y.iter_mut().zip(a.col(j)) {
            *yi += t * aij;
        }
    }

    Ok(())
}

/// Matrix-vector product `y = A * x`.
pub fn mvmul(a: &MatrixView<'_>, x: &[f64], y: &mut [f64]) -> Result<(), LinalgError> {
    gemv(1.0, a, x, 0.0, y)
}

/// Rank-1 update `A += alpha * x * y^T`.
pub fn ger(
    alpha: f64,
    x: &[f64],
    y: &[f64],
    a: &mut MatrixViewMut<'_>,
) -> Result<(), LinalgError> {
    if x.len() != a.rows() {
        return Err(LinalgError::dimension_mismatch("x", a.rows(), x.len()));
    }
    if y.len() != a.cols() {
        return Err(LinalgError::dimension_mismatch("y", a.cols(), y.len()));
    }
    for (j, &yj) in y.iter().enumerate() {
        let t = alpha * yj;
        if t == 0.0 {
            continue;
        }
        for (aij, xi) in a.col_mut(j).iter_mut().zip(x) {
            *aij += t * xi;
        }
    }
    Ok(())
}

/// Matrix product `C = A * B` written into `c`.
///
/// # Arguments
///
/// * `a` - The left operand with shape `(m, k)`.
/// * `b` - The right operand with shape `(k, n)`.
/// * `c` - The output with shape `(m, n)`. Overwritten.
pub fn matmul_into(
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
) -> Result<(), LinalgError> {
    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    if b.rows() != k {
        return Err(LinalgError::dimension_mismatch("rhs rows", k, b.rows()));
    }
    check_shape("output rows", "output cols", (m, n), c.shape())?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    if k == 0 {
        c.fill(0.0);
        return Ok(());
    }

    let lhs_data = a.to_contiguous();
    let rhs_data = b.to_contiguous();
    let lhs = faer::mat::from_column_major_slice(&lhs_data[..], m, k);
    let rhs = faer::mat::from_column_major_slice(&rhs_data[..], k, n);

    if c.ld() == m || n == 1 {
        let mut dst = faer::mat::from_column_major_slice_mut(&mut c.as_mut_slice()[..m * n], m, n);
        faer::linalg::matmul::matmul(&mut dst, lhs, rhs, None, 1.0, faer::Parallelism::None);
    } else {
        // strided output: compute packed, then scatter
        let mut packed = Matrix::zeros(m, n);
        {
            let mut dst = faer::mat::from_column_major_slice_mut(packed.as_mut_slice(), m, n);
            faer::linalg::matmul::matmul(&mut dst, lhs, rhs, None, 1.0, faer::Parallelism::None);
        }
        c.copy_from(&packed.view())?;
    }

    Ok(())
}

/// Matrix product `A * B`.
pub fn matmul(a: &MatrixView<'_>, b: &MatrixView<'_>) -> Result<Matrix, LinalgError> {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    matmul_into(a, b, &mut c.view_mut())?;
    Ok(c)
}
