use crate::error::LinalgError;

/// Linear interpolation between `(t0, x0)` and `(t1, x1)` at `ti`, written into `xi`.
///
/// The parameters need not be ordered and `ti` may lie outside `[t0, t1]`, in which case
/// the line is extrapolated. At `ti == t0` and `ti == t1` the endpoints are reproduced
/// exactly.
///
/// # Errors
///
/// * [`LinalgError::DegenerateInterval`] if `t0 == t1`.
/// * [`LinalgError::DimensionMismatch`] if the vectors differ in length.
pub fn linterp_into(
    t0: f64,
    x0: &[f64],
    t1: f64,
    x1: &[f64],
    ti: f64,
    xi: &mut [f64],
) -> Result<(), LinalgError> {
    if t0 == t1 {
        return Err(LinalgError::DegenerateInterval(t0));
    }
    if x1.len() != x0.len() {
        return Err(LinalgError::dimension_mismatch("x1", x0.len(), x1.len()));
    }
    if xi.len() != x0.len() {
        return Err(LinalgError::dimension_mismatch("xi", x0.len(), xi.len()));
    }

    let alpha = (ti - t0) / (t1 - t0);
    for ((out, a), b) in xi.iter_mut().zip(x0).zip(x1) {
        *out = (1.0 - alpha) * a + alpha * b;
    }
    Ok(())
}

/// Linear interpolation between `(t0, x0)` and `(t1, x1)` at `ti`. See [`linterp_into`].
///
/// # Example
///
/// ```
/// use kinalg_linalg::linterp;
///
/// let x = linterp(0.0, &[0.0, 10.0], 2.0, &[4.0, 20.0], 1.5)?;
/// assert_eq!(x, vec![3.0, 17.5]);
/// # Ok::<(), kinalg_linalg::LinalgError>(())
/// ```
pub fn linterp(t0: f64, x0: &[f64], t1: f64, x1: &[f64], ti: f64) -> Result<Vec<f64>, LinalgError> {
    let mut xi = vec![0.0; x0.len()];
    linterp_into(t0, x0, t1, x1, ti, &mut xi)?;
    Ok(xi)
}
