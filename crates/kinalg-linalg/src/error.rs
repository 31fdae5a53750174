use thiserror::Error;

/// An error type for the linear algebra routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// The LU factorization found an exactly zero pivot; the matrix cannot be inverted.
    #[error("Singular matrix: U({index}, {index}) is exactly zero")]
    SingularMatrix {
        /// Zero-based index of the zero diagonal element of `U`.
        index: usize,
    },

    /// The SVD iteration did not converge.
    #[error("SVD did not converge: {unconverged} values failed to converge")]
    ConvergenceFailure {
        /// Number of values that did not converge.
        unconverged: usize,
    },

    /// The dense kernels rejected one of their arguments.
    #[error("Invalid argument {position} passed to {routine}")]
    InvalidArgument {
        /// Name of the kernel that rejected the call.
        routine: &'static str,
        /// One-based position of the illegal argument.
        position: usize,
    },

    /// The operation requires a square matrix.
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A buffer or matrix does not have the size the operation requires.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The operand that has the wrong size.
        what: &'static str,
        /// The size required by the operation.
        expected: usize,
        /// The size that was provided.
        actual: usize,
    },

    /// The damping factor must be finite and non-negative.
    #[error("Damping must be finite and non-negative, got {0}")]
    NegativeDamping(f64),

    /// The interpolation interval has zero length.
    #[error("Degenerate interpolation interval: t0 == t1 == {0}")]
    DegenerateInterval(f64),

    /// The input contains NaN or infinite values.
    #[error("Input contains non-finite values")]
    NonFiniteInput,
}

impl LinalgError {
    /// Creates a DimensionMismatch error.
    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Returns true if the error comes from the arguments rather than from the numbers.
    ///
    /// Singular matrices and convergence failures are numerical facts about the input; every
    /// other variant means the call itself was malformed.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::SingularMatrix { .. } | Self::ConvergenceFailure { .. } => false,
            Self::InvalidArgument { .. }
            | Self::NotSquare { .. }
            | Self::DimensionMismatch { .. }
            | Self::NegativeDamping(_)
            | Self::DegenerateInterval(_)
            | Self::NonFiniteInput => true,
        }
    }
}

/// Check that an operand has shape `expected`, naming the first dimension that differs.
pub(crate) fn check_shape(
    rows_what: &'static str,
    cols_what: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<(), LinalgError> {
    if actual.0 != expected.0 {
        return Err(LinalgError::dimension_mismatch(rows_what, expected.0, actual.0));
    }
    if actual.1 != expected.1 {
        return Err(LinalgError::dimension_mismatch(cols_what, expected.1, actual.1));
    }
    Ok(())
}

/// Map the `info` status of an LU kernel (`getrf`, `getri`) to a result.
///
/// Negative values name the illegal argument, positive values the zero pivot.
pub(crate) fn check_lu_info(routine: &'static str, info: i32) -> Result<(), LinalgError> {
    match info {
        0 => Ok(()),
        i if i < 0 => Err(invalid_argument(routine, i)),
        i => Err(LinalgError::SingularMatrix {
            index: i as usize - 1,
        }),
    }
}

/// Map the `info` status of `gesvd` to a result.
pub(crate) fn check_svd_info(info: i32) -> Result<(), LinalgError> {
    match info {
        0 => Ok(()),
        i if i < 0 => Err(invalid_argument("gesvd", i)),
        i => Err(LinalgError::ConvergenceFailure {
            unconverged: i as usize,
        }),
    }
}

fn invalid_argument(routine: &'static str, info: i32) -> LinalgError {
    LinalgError::InvalidArgument {
        routine,
        position: info.unsigned_abs() as usize,
    }
}
