//! Reductions and elementwise arithmetic on slices.
//!
//! Binary operations require every operand to have the same length and return
//! [`LinalgError::DimensionMismatch`] otherwise.

use crate::error::LinalgError;

#[inline]
fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), LinalgError> {
    if expected != actual {
        return Err(LinalgError::dimension_mismatch(what, expected, actual));
    }
    Ok(())
}

/// Smallest element, `+inf` for an empty slice.
pub fn min(x: &[f64]) -> f64 {
    x.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest element, `-inf` for an empty slice.
pub fn max(x: &[f64]) -> f64 {
    x.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Dot product `x . y`.
pub fn dot(x: &[f64], y: &[f64]) -> Result<f64, LinalgError> {
    check_len("y", x.len(), y.len())?;
    Ok(x.iter().zip(y).map(|(a, b)| a * b).sum())
}

/// Euclidean norm.
pub fn norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Sum of squared differences.
pub fn ssd(x: &[f64], y: &[f64]) -> Result<f64, LinalgError> {
    check_len("y", x.len(), y.len())?;
    Ok(x.iter()
        .zip(y)
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum())
}

/// Euclidean distance between two points.
pub fn dist(x: &[f64], y: &[f64]) -> Result<f64, LinalgError> {
    Ok(ssd(x, y)?.sqrt())
}

/// `x[i] += alpha`.
pub fn sinc(alpha: f64, x: &mut [f64]) {
    x.iter_mut().for_each(|v| *v += alpha);
}

/// `y[i] += x[i]`.
pub fn vinc(x: &[f64], y: &mut [f64]) -> Result<(), LinalgError> {
    check_len("y", x.len(), y.len())?;
    y.iter_mut().zip(x).for_each(|(b, a)| *b += a);
    Ok(())
}

/// `y[i] += alpha * x[i]`.
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) -> Result<(), LinalgError> {
    check_len("y", x.len(), y.len())?;
    y.iter_mut().zip(x).for_each(|(b, a)| *b += alpha * a);
    Ok(())
}

/// `z[i] = alpha * x[i] + y[i]`.
pub fn axpy3(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<(), LinalgError> {
    check_len("y", x.len(), y.len())?;
    check_len("z", x.len(), z.len())?;
    for ((r, a), b) in z.iter_mut().zip(x).zip(y) {
        *r = alpha * a + b;
    }
    Ok(())
}

/// `x[i] *= alpha`.
pub fn scal(alpha: f64, x: &mut [f64]) {
    x.iter_mut().for_each(|v| *v *= alpha);
}

fn scalar_op(
    x: &[f64],
    r: &mut [f64],
    op: impl Fn(f64) -> f64,
) -> Result<(), LinalgError> {
    check_len("r", x.len(), r.len())?;
    r.iter_mut().zip(x).for_each(|(dst, &v)| *dst = op(v));
    Ok(())
}

/// `r[i] = alpha + x[i]`.
pub fn sadd(alpha: f64, x: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    scalar_op(x, r, |v| alpha + v)
}

/// `r[i] = alpha - x[i]`.
pub fn ssub(alpha: f64, x: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    scalar_op(x, r, |v| alpha - v)
}

/// `r[i] = alpha * x[i]`.
pub fn smul(alpha: f64, x: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    scalar_op(x, r, |v| alpha * v)
}

/// `r[i] = alpha / x[i]`.
pub fn sdiv(alpha: f64, x: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    scalar_op(x, r, |v| alpha / v)
}

fn binary_op(
    x: &[f64],
    y: &[f64],
    r: &mut [f64],
    op: impl Fn(f64, f64) -> f64,
) -> Result<(), LinalgError> {
    check_len("y", x.len(), y.len())?;
    check_len("r", x.len(), r.len())?;
    for ((dst, &a), &b) in r.iter_mut().zip(x).zip(y) {
        *dst = op(a, b);
    }
    Ok(())
}

/// `r[i] = x[i] + y[i]`.
pub fn vadd(x: &[f64], y: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    binary_op(x, y, r, |a, b| a + b)
}

/// `r[i] = x[i] - y[i]`.
pub fn vsub(x: &[f64], y: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    binary_op(x, y, r, |a, b| a - b)
}

/// `r[i] = x[i] * y[i]`.
pub fn vmul(x: &[f64], y: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    binary_op(x, y, r, |a, b| a * b)
}

/// `r[i] = x[i] / y[i]`.
pub fn vdiv(x: &[f64], y: &[f64], r: &mut [f64]) -> Result<(), LinalgError> {
    binary_op(x, y, r, |a, b| a / b)
}

/// Cross product of two 3-vectors.
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Scale `x` to unit length and return its original norm.
///
/// A zero vector is left unchanged.
pub fn normalize(x: &mut [f64]) -> f64 {
    let n = norm(x);
    if n > 0.0 {
        scal(1.0 / n, x);
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reductions() -> Result<(), LinalgError> {
        let x = [3.0, -1.0, 2.0];
        let y = [1.0, 1.0, 0.0];
        assert_eq!(min(&x), -1.0);
        assert_eq!(max(&x), 3.0);
        assert_eq!(min(&[]), f64::INFINITY);
        assert_eq!(dot(&x, &y)?, 2.0);
        assert_relative_eq!(norm(&[3.0, 4.0]), 5.0);
        assert_eq!(ssd(&x, &y)?, 4.0 + 4.0 + 4.0);
        assert_relative_eq!(dist(&[0.0, 0.0], &[3.0, 4.0])?, 5.0);
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let mut r = [0.0; 2];
        assert_eq!(
            dot(&[1.0, 2.0], &[1.0]),
            Err(LinalgError::dimension_mismatch("y", 2, 1))
        );
        assert_eq!(
            vadd(&[1.0; 3], &[1.0; 3], &mut r),
            Err(LinalgError::dimension_mismatch("r", 3, 2))
        );
    }

    #[test]
    fn test_in_place_ops() -> Result<(), LinalgError> {
        let mut y = [1.0, 2.0];
        sinc(1.0, &mut y);
        assert_eq!(y, [2.0, 3.0]);
        vinc(&[1.0, 1.0], &mut y)?;
        assert_eq!(y, [3.0, 4.0]);
        axpy(2.0, &[1.0, -1.0], &mut y)?;
        assert_eq!(y, [5.0, 2.0]);
        scal(0.5, &mut y);
        assert_eq!(y, [2.5, 1.0]);
        Ok(())
    }

    #[test]
    fn test_out_of_place_ops() -> Result<(), LinalgError> {
        let x = [1.0, 2.0];
        let y = [4.0, 8.0];
        let mut r = [0.0; 2];
        axpy3(2.0, &x, &y, &mut r)?;
        assert_eq!(r, [6.0, 12.0]);
        sadd(1.0, &x, &mut r)?;
        assert_eq!(r, [2.0, 3.0]);
        ssub(1.0, &x, &mut r)?;
        assert_eq!(r, [0.0, -1.0]);
        smul(3.0, &x, &mut r)?;
        assert_eq!(r, [3.0, 6.0]);
        sdiv(4.0, &x, &mut r)?;
        assert_eq!(r, [4.0, 2.0]);
        vsub(&y, &x, &mut r)?;
        assert_eq!(r, [3.0, 6.0]);
        vmul(&x, &y, &mut r)?;
        assert_eq!(r, [4.0, 16.0]);
        vdiv(&y, &x, &mut r)?;
        assert_eq!(r, [4.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_cross_and_normalize() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        let mut x = [0.0, 3.0, 4.0];
        assert_relative_eq!(normalize(&mut x), 5.0);
        assert_relative_eq!(norm(&x), 1.0);
        let mut zero = [0.0; 3];
        assert_eq!(normalize(&mut zero), 0.0);
        assert_eq!(zero, [0.0; 3]);
    }
}
