use kinalg_lapack::{run_with_workspace, DenseKernels, Job};

use crate::{
    error::{check_shape, check_svd_info, LinalgError},
    matrix::{Matrix, MatrixView, MatrixViewMut},
};

/// Result of a singular value decomposition `A = U S Vt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd {
    s: Vec<f64>,
    u: Option<Matrix>,
    vt: Option<Matrix>,
}

impl Svd {
    /// The `min(m, n)` singular values, non-negative and sorted descending.
    pub fn singular_values(&self) -> &[f64] {
        &self.s
    }

    /// The `m x m` left singular vectors, if they were requested.
    pub fn u(&self) -> Option<&Matrix> {
        self.u.as_ref()
    }

    /// The `n x n` transposed right singular vectors, if they were requested.
    pub fn vt(&self) -> Option<&Matrix> {
        self.vt.as_ref()
    }

    /// Consume the decomposition and return `(s, u, vt)`.
    pub fn into_parts(self) -> (Vec<f64>, Option<Matrix>, Option<Matrix>) {
        (self.s, self.u, self.vt)
    }

    /// Number of singular values strictly greater than `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.s.iter().filter(|&&s| s > tol).count()
    }

    /// Ratio of the largest to the smallest singular value.
    ///
    /// Infinity if the smallest singular value is zero, one for an empty matrix.
    pub fn condition_number(&self) -> f64 {
        let (Some(&s_max), Some(&s_min)) = (self.s.first(), self.s.last()) else {
            return 1.0;
        };
        if s_min == 0.0 {
            f64::INFINITY
        } else {
            s_max / s_min
        }
    }
}

/// Compute the singular value decomposition of `a` into caller buffers.
///
/// `a` is not modified; the kernels work on a private copy. The singular vectors are only
/// computed for the outputs that are provided.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The `m x n` input matrix.
/// * `s` - Receives the `min(m, n)` singular values in descending order.
/// * `u` - Receives the `m x m` left singular vectors.
/// * `vt` - Receives the `n x n` transposed right singular vectors.
///
/// # Errors
///
/// * [`LinalgError::NonFiniteInput`] if `a` contains NaN or infinity.
/// * [`LinalgError::ConvergenceFailure`] if the iteration did not converge.
pub fn svd_into<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    s: &mut [f64],
    u: Option<&mut MatrixViewMut<'_>>,
    vt: Option<&mut MatrixViewMut<'_>>,
) -> Result<(), LinalgError> {
    let (m, n) = (a.rows(), a.cols());
    if s.len() != m.min(n) {
        return Err(LinalgError::dimension_mismatch(
            "singular values",
            m.min(n),
            s.len(),
        ));
    }
    if let Some(u) = &u {
        check_shape("u rows", "u cols", (m, m), u.shape())?;
    }
    if let Some(vt) = &vt {
        check_shape("vt rows", "vt cols", (n, n), vt.shape())?;
    }
    if !a.is_finite() {
        return Err(LinalgError::NonFiniteInput);
    }

    // the kernel destroys its input
    let mut scratch = a.to_matrix();
    let lda = m.max(1);

    let (mut no_u, mut no_vt) = ([0.0f64; 0], [0.0f64; 0]);
    let (jobu, u_data, ldu) = match u {
        Some(u) => {
            let ld = u.ld();
            (Job::All, u.as_mut_slice(), ld)
        }
        None => (Job::None, &mut no_u[..], 1),
    };
    let (jobvt, vt_data, ldvt) = match vt {
        Some(vt) => {
            let ld = vt.ld();
            (Job::All, vt.as_mut_slice(), ld)
        }
        None => (Job::None, &mut no_vt[..], 1),
    };

    let info = run_with_workspace("gesvd", |work, lwork| {
        kernels.gesvd(
            jobu,
            jobvt,
            m,
            n,
            scratch.as_mut_slice(),
            lda,
            s,
            u_data,
            ldu,
            vt_data,
            ldvt,
            work,
            lwork,
        )
    });
    check_svd_info(info)
}

/// Compute the singular value decomposition of `a`.
///
/// # Arguments
///
/// * `kernels` - The dense kernels.
/// * `a` - The `m x n` input matrix.
/// * `compute_u` - Whether to compute the left singular vectors.
/// * `compute_vt` - Whether to compute the right singular vectors.
///
/// # Example
///
/// ```
/// use kinalg_linalg::{svd, Matrix, NativeKernels};
///
/// let a = Matrix::from_rows(&[[3.0, 0.0], [0.0, -4.0]]);
/// let dec = svd(&NativeKernels, &a.view(), false, false)?;
/// assert!((dec.singular_values()[0] - 4.0).abs() < 1e-12);
/// assert!(dec.u().is_none());
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
pub fn svd<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
    compute_u: bool,
    compute_vt: bool,
) -> Result<Svd, LinalgError> {
    let (m, n) = (a.rows(), a.cols());
    let mut s = vec![0.0; m.min(n)];
    let mut u = compute_u.then(|| Matrix::zeros(m, m));
    let mut vt = compute_vt.then(|| Matrix::zeros(n, n));

    svd_into(
        kernels,
        a,
        &mut s,
        u.as_mut().map(|u| u.view_mut()).as_mut(),
        vt.as_mut().map(|vt| vt.view_mut()).as_mut(),
    )?;

    Ok(Svd { s, u, vt })
}

/// Full decomposition into owned buffers: `(s, u, vt)`.
pub(crate) fn full_svd<K: DenseKernels + ?Sized>(
    kernels: &K,
    a: &MatrixView<'_>,
) -> Result<(Vec<f64>, Matrix, Matrix), LinalgError> {
    let (m, n) = (a.rows(), a.cols());
    let mut s = vec![0.0; m.min(n)];
    let mut u = Matrix::zeros(m, m);
    let mut vt = Matrix::zeros(n, n);
    svd_into(
        kernels,
        a,
        &mut s,
        Some(&mut u.view_mut()),
        Some(&mut vt.view_mut()),
    )?;
    Ok((s, u, vt))
}
