#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kinalg LAPACK
//!
//! The dense factorizations used by `kinalg-linalg`, exposed with the LAPACK calling
//! convention so that any provider can be plugged in behind one trait.
//!
//! ## Key Features
//!
//! - **DenseKernels**: `getrf`, `getri` and `gesvd` on column-major buffers with an explicit
//!   leading dimension and an `info` status
//! - **Workspace negotiation**: `run_with_workspace` queries the optimal workspace with
//!   `lwork = -1`, allocates it and runs the routine
//! - **NativeKernels**: pure Rust LU and an SVD backed by `faer`
//! - **SystemLapack**: the system Fortran LAPACK (feature `lapack`)
//!
//! ## Example: Invert a matrix
//!
//! ```rust
//! use kinalg_lapack::{run_with_workspace, DenseKernels, NativeKernels};
//!
//! // column-major [[4, 7], [2, 6]]
//! let mut a = [4.0, 2.0, 7.0, 6.0];
//! let mut ipiv = [0i32; 2];
//! assert_eq!(NativeKernels.getrf(2, 2, &mut a, 2, &mut ipiv), 0);
//!
//! let info = run_with_workspace("getri", |work, lwork| {
//!     NativeKernels.getri(2, &mut a, 2, &ipiv, work, lwork)
//! });
//! assert_eq!(info, 0);
//! assert!((a[0] - 0.6).abs() < 1e-12);
//! assert!((a[2] + 0.7).abs() < 1e-12);
//! ```

/// Pure Rust kernels.
pub mod native;

/// Bindings to the system Fortran LAPACK.
#[cfg(feature = "lapack")]
pub mod system;

/// Two-phase workspace negotiation.
pub mod workspace;

pub use native::NativeKernels;
#[cfg(feature = "lapack")]
pub use system::SystemLapack;
pub use workspace::{run_with_workspace, WORKSPACE_QUERY};

/// Selects which singular vectors `gesvd` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Compute the full orthogonal factor.
    All,
    /// Do not compute the factor; the output buffer is not referenced.
    None,
}

impl Job {
    /// The LAPACK character code for the job.
    pub fn as_char(self) -> u8 {
        match self {
            Job::All => b'A',
            Job::None => b'N',
        }
    }

    /// `Job::All` when `wanted`, `Job::None` otherwise.
    pub fn wanted(wanted: bool) -> Self {
        if wanted {
            Job::All
        } else {
            Job::None
        }
    }
}

/// The dense factorization routines consumed by the solvers.
///
/// Every routine follows the LAPACK calling convention: matrices are column-major with an
/// explicit leading dimension, and the returned `info` is `0` on success, `-i` when the
/// `i`-th argument is illegal and positive for a numerical failure.
///
/// Routines taking `work` and `lwork` follow the workspace-query protocol: calling with
/// `lwork == WORKSPACE_QUERY` writes the optimal workspace length to `work[0]` and leaves
/// every other output untouched.
pub trait DenseKernels: Send + Sync {
    /// LU factorization with partial pivoting, `A = P L U`.
    ///
    /// * `a` - On entry the `m x n` matrix, on exit the factors `L` (unit diagonal) and `U`.
    /// * `ipiv` - Receives `min(m, n)` 1-based row interchanges.
    ///
    /// Returns `i > 0` when `U(i-1, i-1)` is exactly zero. The factorization is completed.
    fn getrf(&self, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32;

    /// Inverse of a matrix from the factors computed by [`DenseKernels::getrf`].
    ///
    /// Returns `i > 0` when `U(i-1, i-1)` is exactly zero and the inverse does not exist.
    fn getri(
        &self,
        n: usize,
        a: &mut [f64],
        lda: usize,
        ipiv: &[i32],
        work: &mut [f64],
        lwork: isize,
    ) -> i32;

    /// Singular value decomposition `A = U S Vt`.
    ///
    /// * `a` - The `m x n` input. Its contents are destroyed.
    /// * `s` - Receives the `min(m, n)` singular values, sorted so that `s[i] >= s[i + 1]`.
    /// * `u` - Receives the `m x m` left singular vectors when `jobu == Job::All`.
    /// * `vt` - Receives the `n x n` transposed right singular vectors when `jobvt == Job::All`.
    ///
    /// Returns `i > 0` when `i` values failed to converge.
    #[allow(clippy::too_many_arguments)]
    fn gesvd(
        &self,
        jobu: Job,
        jobvt: Job,
        m: usize,
        n: usize,
        a: &mut [f64],
        lda: usize,
        s: &mut [f64],
        u: &mut [f64],
        ldu: usize,
        vt: &mut [f64],
        ldvt: usize,
        work: &mut [f64],
        lwork: isize,
    ) -> i32;
}

impl<K: DenseKernels + ?Sized> DenseKernels for &K {
    fn getrf(&self, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32 {
        (**self).getrf(m, n, a, lda, ipiv)
    }

    fn getri(
        &self,
        n: usize,
        a: &mut [f64],
        lda: usize,
        ipiv: &[i32],
        work: &mut [f64],
        lwork: isize,
    ) -> i32 {
        (**self).getri(n, a, lda, ipiv, work, lwork)
    }

    fn gesvd(
        &self,
        jobu: Job,
        jobvt: Job,
        m: usize,
        n: usize,
        a: &mut [f64],
        lda: usize,
        s: &mut [f64],
        u: &mut [f64],
        ldu: usize,
        vt: &mut [f64],
        ldvt: usize,
        work: &mut [f64],
        lwork: isize,
    ) -> i32 {
        (**self).gesvd(jobu, jobvt, m, n, a, lda, s, u, ldu, vt, ldvt, work, lwork)
    }
}

/// Minimum `gesvd` workspace length required by the LAPACK contract.
pub fn gesvd_min_work(m: usize, n: usize) -> usize {
    let min_mn = m.min(n);
    let max_mn = m.max(n);
    (3 * min_mn + max_mn).max(5 * min_mn).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_codes() {
        assert_eq!(Job::All.as_char(), b'A');
        assert_eq!(Job::None.as_char(), b'N');
        assert_eq!(Job::wanted(true), Job::All);
        assert_eq!(Job::wanted(false), Job::None);
    }

    #[test]
    fn test_gesvd_min_work() {
        assert_eq!(gesvd_min_work(0, 0), 1);
        assert_eq!(gesvd_min_work(2, 3), 10);
        assert_eq!(gesvd_min_work(6, 6), 30);
        assert_eq!(gesvd_min_work(10, 2), 16);
    }
}
