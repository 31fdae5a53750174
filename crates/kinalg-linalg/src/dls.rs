use kinalg_lapack::DenseKernels;

use crate::{
    error::LinalgError,
    matrix::{MatrixView, MatrixViewMut},
    ops::{gemv, matmul, mvmul},
    pinv::{check_damping, dpinv},
};

/// Parameters of the damped least-squares solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DlsParams {
    /// Damping factor `k` added to the squared singular values. Must be finite and
    /// non-negative; zero gives the undamped pseudo-inverse.
    pub damping: f64,
}

impl Default for DlsParams {
    fn default() -> Self {
        Self { damping: 1e-4 }
    }
}

fn check_lengths(a: &MatrixView<'_>, x: &[f64], y: &[f64]) -> Result<(), LinalgError> {
    if x.len() != a.rows() {
        return Err(LinalgError::dimension_mismatch("x", a.rows(), x.len()));
    }
    if y.len() != a.cols() {
        return Err(LinalgError::dimension_mismatch("y", a.cols(), y.len()));
    }
    Ok(())
}

/// Damped least-squares solution `y = A* x` written into `y`.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The `m x n` system matrix.
/// * `k` - The damping factor.
/// * `x` - The target, length `m`.
/// * `y` - The solution, length `n`. Overwritten.
pub fn dls_into<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
    x: &[f64],
    y: &mut [f64],
) -> Result<(), LinalgError> {
    check_damping(k)?;
    check_lengths(a, x, y)?;
    log::debug!("dls: {}x{} system, damping {k}", a.rows(), a.cols());

    let a_star = dpinv(kernels, a, k)?;
    mvmul(&a_star.view(), x, y)
}

/// Damped least-squares solution `y = A* x`.
///
/// # Example
///
/// ```
/// use kinalg_linalg::{dls, Matrix, NativeKernels};
///
/// let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
/// let y = dls(&NativeKernels, &a.view(), 0.0, &[2.0, 2.0])?;
/// assert!((y[0] - 2.0).abs() < 1e-12 && (y[1] - 1.0).abs() < 1e-12);
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
pub fn dls<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
    x: &[f64],
) -> Result<Vec<f64>, LinalgError> {
    let mut y = vec![0.0; a.cols()];
    dls_into(kernels, a, k, x, &mut y)?;
    Ok(y)
}

/// Damped least squares with a secondary objective projected into the null space.
///
/// Computes `y = A* x - (A* A - I) yp`. The correction only moves `y` along directions
/// that `A` maps to zero, so the primary residual is unchanged up to the damping.
///
/// `A* A` is formed explicitly, which costs `O(n^2 m)` on top of the pseudo-inverse.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The `m x n` system matrix.
/// * `k` - The damping factor.
/// * `x` - The primary target, length `m`.
/// * `yp` - The secondary target, length `n`.
/// * `y` - The solution, length `n`. Overwritten.
pub fn dlsnp_into<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
    x: &[f64],
    yp: &[f64],
    y: &mut [f64],
) -> Result<(), LinalgError> {
    check_damping(k)?;
    check_lengths(a, x, y)?;
    if yp.len() != a.cols() {
        return Err(LinalgError::dimension_mismatch("yp", a.cols(), yp.len()));
    }
    log::debug!("dlsnp: {}x{} system, damping {k}", a.rows(), a.cols());

    let a_star = dpinv(kernels, a, k)?;
    mvmul(&a_star.view(), x, y)?;

    // P = A* A - I
    let mut p = matmul(&a_star.view(), a)?;
    for i in 0..a.cols() {
        p[(i, i)] -= 1.0;
    }

    // y = y - P yp
    gemv(-1.0, &p.view(), yp, 1.0, y)
}

/// Damped least squares with a null-space secondary objective. See [`dlsnp_into`].
pub fn dlsnp<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    k: f64,
    x: &[f64],
    yp: &[f64],
) -> Result<Vec<f64>, LinalgError> {
    let mut y = vec![0.0; a.cols()];
    dlsnp_into(kernels, a, k, x, yp, &mut y)?;
    Ok(y)
}

/// A damped least-squares solver bound to a set of kernels and parameters.
///
/// # Example
///
/// ```
/// use kinalg_linalg::{DlsParams, DlsSolver, Matrix, NativeKernels};
///
/// let solver = DlsSolver::new(&NativeKernels, DlsParams::default());
/// let jacobian = Matrix::from_rows(&[[1.0, 1.0, 0.0], [0.0, 1.0, 1.0]]);
/// let dq = solver.solve(&jacobian.view(), &[0.1, 0.0])?;
/// assert_eq!(dq.len(), 3);
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DlsSolver<'k, K: DenseKernels + ?Sized> {
    kernels: &'k K,
    params: DlsParams,
}

impl<'k, K: DenseKernels + ?Sized> DlsSolver<'k, K> {
    /// Create a solver.
    pub fn new(kernels: &'k K, params: DlsParams) -> Self {
        Self { kernels, params }
    }

    /// The solver parameters.
    pub fn params(&self) -> &DlsParams {
        &self.params
    }

    /// Solve `A y = x` in the damped least-squares sense.
    pub fn solve(&self, a: &MatrixView<'_>, x: &[f64]) -> Result<Vec<f64>, LinalgError> {
        dls(self.kernels, a, self.params.damping, x)
    }

    /// Solve `A y = x` and pull the redundant degrees of freedom towards `yp`.
    pub fn solve_nullspace(
        &self,
        a: &MatrixView<'_>,
        x: &[f64],
        yp: &[f64],
    ) -> Result<Vec<f64>, LinalgError> {
        dlsnp(self.kernels, a, self.params.damping, x, yp)
    }

    /// Damped pseudo-inverse of `a` into `a_star`.
    pub fn pinv_into(
        &self,
        a: &MatrixView<'_>,
        a_star: &mut MatrixViewMut<'_>,
    ) -> Result<(), LinalgError> {
        crate::pinv::dpinv_into(self.kernels, a, self.params.damping, a_star)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use approx::assert_relative_eq;
    use kinalg_lapack::NativeKernels;

    fn apply(a: &Matrix, y: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; a.rows()];
        mvmul(&a.view(), y, &mut out).unwrap();
        out
    }

    #[test]
    fn test_dls_diagonal() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
        let y = dls(&NativeKernels, &a.view(), 0.0, &[2.0, 2.0])?;
        assert_relative_eq!(y[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_dls_wide_reaches_target() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[1.0, 2.0, 0.5], [0.0, 1.0, -1.0]]);
        let x = [0.3, -0.2];
        let y = dls(&NativeKernels, &a.view(), 1e-10, &x)?;
        for (ax, xi) in apply(&a, &y).iter().zip(&x) {
            assert_relative_eq!(ax, xi, epsilon = 1e-8);
        }
        Ok(())
    }

    #[test]
    fn test_dls_rank_deficient_stays_bounded() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let k: f64 = 0.01;
        let y = dls(&NativeKernels, &a.view(), k, &[1.0, 1.0])?;
        let bound = 1.0 / (2.0 * k.sqrt());
        assert!(y.iter().all(|v| v.is_finite() && v.abs() <= bound));
        assert_relative_eq!(y[0], 1.0 / 1.01, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_dlsnp_preserves_primary_objective() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[1.0, 2.0, 0.5], [0.0, 1.0, -1.0]]);
        let x = [0.3, -0.2];
        let yp = [1.0, -2.0, 0.7];
        let y = dls(&NativeKernels, &a.view(), 0.0, &x)?;
        let y_np = dlsnp(&NativeKernels, &a.view(), 0.0, &x, &yp)?;

        for (p, q) in apply(&a, &y).iter().zip(apply(&a, &y_np).iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-10);
        }
        // the secondary target actually moved the solution
        let moved: f64 = y.iter().zip(&y_np).map(|(p, q)| (p - q).abs()).sum();
        assert!(moved > 1e-3);
        Ok(())
    }

    #[test]
    fn test_dlsnp_damped_moves_along_null_space() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[1.0, 2.0, 0.5], [0.0, 1.0, -1.0]]);
        // spans the null space of a
        let null = [-2.5, 1.0, 1.0];
        let x = [0.3, -0.2];
        let yp = [1.0, -2.0, 0.7];
        let k = 1e-8;
        let y = dls(&NativeKernels, &a.view(), k, &x)?;
        let y_np = dlsnp(&NativeKernels, &a.view(), k, &x, &yp)?;

        for (p, q) in apply(&a, &y).iter().zip(apply(&a, &y_np).iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-6);
        }

        // the step is the projection of yp onto the null space
        let scale = null.iter().zip(&yp).map(|(n, p)| n * p).sum::<f64>()
            / null.iter().map(|n| n * n).sum::<f64>();
        for ((p, q), n) in y.iter().zip(&y_np).zip(&null) {
            assert_relative_eq!(q - p, scale * n, epsilon = 1e-6);
        }
        assert!(scale.abs() > 0.1);
        Ok(())
    }

    #[test]
    fn test_dlsnp_zero_secondary_is_dls() -> Result<(), LinalgError> {
        let a = Matrix::from_rows(&[[2.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        let x = [1.0, 2.0];
        let y = dls(&NativeKernels, &a.view(), 1e-3, &x)?;
        let y_np = dlsnp(&NativeKernels, &a.view(), 1e-3, &x, &[0.0; 3])?;
        for (p, q) in y.iter().zip(&y_np) {
            assert_relative_eq!(p, q, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_dlsnp_full_rank_ignores_secondary() -> Result<(), LinalgError> {
        // a square invertible system has no null space
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
        let y = dlsnp(&NativeKernels, &a.view(), 0.0, &[2.0, 2.0], &[5.0, -5.0])?;
        assert_relative_eq!(y[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_length_checks() {
        let a = Matrix::zeros(2, 3);
        assert_eq!(
            dls(&NativeKernels, &a.view(), 0.1, &[1.0; 3]),
            Err(LinalgError::dimension_mismatch("x", 2, 3))
        );
        assert_eq!(
            dlsnp(&NativeKernels, &a.view(), 0.1, &[1.0; 2], &[1.0; 2]),
            Err(LinalgError::dimension_mismatch("yp", 3, 2))
        );
        assert_eq!(
            dls(&NativeKernels, &a.view(), -0.1, &[1.0; 2]),
            Err(LinalgError::NegativeDamping(-0.1))
        );
    }

    #[test]
    fn test_solver() -> Result<(), LinalgError> {
        let solver = DlsSolver::new(&NativeKernels, DlsParams { damping: 0.0 });
        assert_eq!(solver.params().damping, 0.0);
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
        let y = solver.solve(&a.view(), &[2.0, 2.0])?;
        assert_relative_eq!(y[1], 1.0, epsilon = 1e-12);
        let y = solver.solve_nullspace(&a.view(), &[2.0, 2.0], &[1.0, 1.0])?;
        assert_relative_eq!(y[0], 2.0, epsilon = 1e-12);

        let mut a_star = Matrix::zeros(2, 2);
        solver.pinv_into(&a.view(), &mut a_star.view_mut())?;
        assert_relative_eq!(a_star[(1, 1)], 0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_default_params() {
        assert_eq!(DlsParams::default().damping, 1e-4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_serde() {
        let params: DlsParams = serde_json::from_str(r#"{"damping":0.05}"#).unwrap();
        assert_eq!(params, DlsParams { damping: 0.05 });
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"damping":0.05}"#);
    }
}
