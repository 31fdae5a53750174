#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kinalg Linalg
//!
//! Regularized generalized inverses of small, possibly rank-deficient Jacobians, and the
//! damped least-squares solvers built on them.
//!
//! ## Key Features
//!
//! - **Matrix views**: owned column-major `Matrix` and borrowed views with a leading dimension
//! - **Inversion**: LU factorization with partial pivoting and in-place inverse
//! - **SVD**: singular values sorted descending, optional singular vectors
//! - **Damped pseudo-inverse**: `A* = V diag(s / (s^2 + k)) U^T`
//! - **Damped least squares**: `y = A* x`, optionally pulled towards a secondary target
//!   inside the null space of `A`
//!
//! ## Example: Damped least squares
//!
//! ```rust
//! use kinalg_linalg::{dls, dlsnp, Matrix, NativeKernels};
//!
//! let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
//! let y = dls(&NativeKernels, &a.view(), 0.0, &[2.0, 2.0])?;
//! assert!((y[0] - 2.0).abs() < 1e-12);
//! assert!((y[1] - 1.0).abs() < 1e-12);
//!
//! // a wide system leaves room for a secondary objective
//! let j = Matrix::from_rows(&[[1.0, 1.0, 0.0]]);
//! let y = dlsnp(&NativeKernels, &j.view(), 1e-4, &[0.5], &[0.0, 0.0, 1.0])?;
//! assert_eq!(y.len(), 3);
//! # Ok::<(), kinalg_linalg::LinalgError>(())
//! ```

/// Damped least-squares solvers.
pub mod dls;

/// Error types for the linear algebra module.
pub mod error;

/// Linear interpolation between vectors.
pub mod interp;

/// Matrix inversion through LU factorization.
pub mod inverse;

/// Column-major matrix containers and views.
pub mod matrix;

/// Matrix products, transposition and rank-1 updates.
pub mod ops;

/// Damped pseudo-inverse.
pub mod pinv;

/// Singular value decomposition.
pub mod svd;

/// Elementwise vector helpers.
pub mod vector;

pub use dls::{dls, dls_into, dlsnp, dlsnp_into, DlsParams, DlsSolver};
pub use error::LinalgError;
pub use interp::{linterp, linterp_into};
pub use inverse::{inv, inv_inplace, lu_factor, lu_inverse, Pivots};
pub use matrix::{Matrix, MatrixView, MatrixViewMut};
pub use pinv::{dpinv, dpinv_into};
pub use svd::{svd, svd_into, Svd};

pub use kinalg_lapack::{DenseKernels, NativeKernels};
