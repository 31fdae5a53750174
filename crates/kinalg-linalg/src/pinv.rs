use kinalg_lapack::DenseKernels;

use crate::{
    error::{check_shape, LinalgError},
    matrix::{Matrix, MatrixView, MatrixViewMut},
    ops::{ger, transpose},
    svd::full_svd,
};

pub(crate) fn check_damping(k: f64) -> Result<(), LinalgError> {
    if !k.is_finite() || k < 0.0 {
        return Err(LinalgError::NegativeDamping(k));
    }
    Ok(())
}

/// Compute the damped pseudo-inverse of `a` into `a_star`.
///
/// `A* = sum_i s_i / (s_i^2 + k) * v_i * u_i^T` over the singular triplets of `A`. With
/// `k = 0` this is the Moore-Penrose pseudo-inverse; a positive `k` bounds the gain on
/// every direction by `1 / (2 sqrt(k))`.
///
/// Exactly zero singular values contribute nothing, also when `k = 0`.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The `m x n` input matrix.
/// * `k` - The damping factor, finite and non-negative.
/// * `a_star` - The `n x m` output. Overwritten.
///
/// # Errors
///
/// * [`LinalgError::NegativeDamping`] if `k` is negative or not finite.
/// * Any error from [`svd`](crate::svd::svd).
pub fn dpinv_into<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
    a_star: &mut MatrixViewMut<'_>,
) -> Result<(), LinalgError> {
    check_damping(k)?;
    let (m, n) = (a.rows(), a.cols());
    check_shape(
        "pseudo-inverse rows",
        "pseudo-inverse cols",
        (n, m),
        a_star.shape(),
    )?;

    let (s, u, vt) = full_svd(kernels, a)?;
    // columns of V are the rows of Vt
    let v = transpose(&vt.view());

    a_star.fill(0.0);

    let mut dropped = 0;
    for (i, &s_i) in s.iter().enumerate() {
        let denom = s_i * s_i + k;
        if denom == 0.0 {
            dropped += 1;
            continue;
        }
        ger(s_i / denom, v.col(i), u.col(i), a_star)?;
    }

    if dropped > 0 {
        log::warn!("undamped pseudo-inverse: skipped {dropped} zero singular values");
    }

    Ok(())
}

/// Compute the damped pseudo-inverse of `a`.
///
/// The result has the transposed shape of `a`. See [`dpinv_into`].
///
/// # Example
///
/// ```
/// use kinalg_linalg::{dpinv, Matrix, NativeKernels};
///
/// let a = Matrix::from_rows(&[[2.0, 0.0, 0.0]]);
/// let a_star = dpinv(&NativeKernels, &a.view(), 0.0)?;
/// assert_eq!(a_star.shape(), (3, 1));
/// assert!((a_star[(0, 0)] - 0.5).abs() < 1e-12);
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
pub fn dpinv<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
) -> Result<Matrix, LinalgError> {
    let mut a_star = Matrix::zeros(a.cols(), a.rows());
    dpinv_into(kernels, a, k, &mut a_star.view_mut())?;
    Ok(a_star)
}
