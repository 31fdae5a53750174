//! The vendor LAPACK, called through its Fortran symbols.
//!
//! The library itself must be provided at link time (OpenBLAS, MKL, reference LAPACK).

use std::os::raw::c_char;

use crate::{DenseKernels, Job};

#[link(name = "lapack")]
extern "C" {
    fn dgetrf_(
        m: *const i32,
        n: *const i32,
        a: *mut f64,
        lda: *const i32,
        ipiv: *mut i32,
        info: *mut i32,
    );

    fn dgetri_(
        n: *const i32,
        a: *mut f64,
        lda: *const i32,
        ipiv: *const i32,
        work: *mut f64,
        lwork: *const i32,
        info: *mut i32,
    );

    fn dgesvd_(
        jobu: *const c_char,
        jobvt: *const c_char,
        m: *const i32,
        n: *const i32,
        a: *mut f64,
        lda: *const i32,
        s: *mut f64,
        u: *mut f64,
        ldu: *const i32,
        vt: *mut f64,
        ldvt: *const i32,
        work: *mut f64,
        lwork: *const i32,
        info: *mut i32,
    );
}

/// Kernels backed by the system LAPACK.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLapack;

// Fortran integers are 32 bit; an argument that does not fit is reported as illegal
fn to_fortran(value: usize, position: i32) -> Result<i32, i32> {
    i32::try_from(value).map_err(|_| -position)
}

fn required_len(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        ld * (cols - 1) + rows
    }
}

impl DenseKernels for SystemLapack {
    fn getrf(&self, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32 {
        let (mi, ni, ldai) = match (to_fortran(m, 1), to_fortran(n, 2), to_fortran(lda, 4)) {
            (Ok(m), Ok(n), Ok(lda)) => (m, n, lda),
            (Err(info), _, _) | (_, Err(info), _) | (_, _, Err(info)) => return info,
        };
        if a.len() < required_len(m, n, lda) {
            return -3;
        }
        if ipiv.len() < m.min(n) {
            return -5;
        }

        let mut info = 0;
        // SAFETY: the buffers were checked against the dimensions passed to LAPACK.
        unsafe {
            dgetrf_(&mi, &ni, a.as_mut_ptr(), &ldai, ipiv.as_mut_ptr(), &mut info);
        }
        info
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
        let lwork = i32::try_from(lwork).map_err(|_| -6);
        let (ni, ldai, lworki) = match (to_fortran(n, 1), to_fortran(lda, 3), lwork) {
            (Ok(n), Ok(lda), Ok(lwork)) => (n, lda, lwork),
            (Err(info), _, _) | (_, Err(info), _) | (_, _, Err(info)) => return info,
        };
        if work.is_empty() || (lworki > 0 && work.len() < lworki as usize) {
            return -5;
        }
        if lworki >= 0 && a.len() < required_len(n, n, lda) {
            return -2;
        }
        if ipiv.len() < n {
            return -4;
        }
        // dgetri swaps column ipiv[j] with column j, so every pivot must address a column of a
        if lworki >= 0 && ipiv[..n].iter().any(|&p| p < 1 || p > ni) {
            return -4;
        }

        let mut info = 0;
        // SAFETY: the buffers were checked against the dimensions passed to LAPACK and every
        // pivot lies in `1..=n`.
        unsafe {
            dgetri_(
                &ni,
                a.as_mut_ptr(),
                &ldai,
                ipiv.as_ptr(),
                work.as_mut_ptr(),
                &lworki,
                &mut info,
            );
        }
        info
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
        let (mi, ni) = match (to_fortran(m, 3), to_fortran(n, 4)) {
            (Ok(m), Ok(n)) => (m, n),
            (Err(info), _) | (_, Err(info)) => return info,
        };
        let lds = (to_fortran(lda, 6), to_fortran(ldu, 9), to_fortran(ldvt, 11));
        let (ldai, ldui, ldvti) = match lds {
            (Ok(lda), Ok(ldu), Ok(ldvt)) => (lda, ldu, ldvt),
            (Err(info), _, _) | (_, Err(info), _) | (_, _, Err(info)) => return info,
        };
        let Ok(lworki) = i32::try_from(lwork) else {
            return -13;
        };
        if work.is_empty() || (lworki > 0 && work.len() < lworki as usize) {
            return -12;
        }
        if lworki >= 0 {
            if a.len() < required_len(m, n, lda) {
                return -5;
            }
            if s.len() < m.min(n) {
                return -7;
            }
            if jobu == Job::All && u.len() < required_len(m, m, ldu) {
                return -8;
            }
            if jobvt == Job::All && vt.len() < required_len(n, n, ldvt) {
                return -10;
            }
        }

        let (ju, jvt) = (jobu.as_char() as c_char, jobvt.as_char() as c_char);
        let mut info = 0;
        // SAFETY: the buffers were checked against the dimensions passed to LAPACK and the
        // unreferenced singular-vector buffers are never touched for `Job::None`.
        unsafe {
            dgesvd_(
                &ju,
                &jvt,
                &mi,
                &ni,
                a.as_mut_ptr(),
                &ldai,
                s.as_mut_ptr(),
                u.as_mut_ptr(),
                &ldui,
                vt.as_mut_ptr(),
                &ldvti,
                work.as_mut_ptr(),
                &lworki,
                &mut info,
            );
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getri_rejects_out_of_range_pivot() {
        let mut a = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let mut work = vec![0.0; 3];
        // pivots of a 5x3 factorization
        let ipiv = [5, 2, 3];
        assert_eq!(SystemLapack.getri(3, &mut a, 3, &ipiv, &mut work, 3), -4);
        assert_eq!(SystemLapack.getri(3, &mut a, 3, &[0, 2, 3], &mut work, 3), -4);
        assert_eq!(a, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }
}
