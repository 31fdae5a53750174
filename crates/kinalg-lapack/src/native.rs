//! Pure Rust implementation of the [`DenseKernels`] contract.
//!
//! The LU routines are unblocked versions of `dgetf2` / `dgetri` working directly on the
//! caller's column-major buffer. The SVD is computed with faer and written back in the
//! LAPACK layout (`Vt` instead of `V`, singular values sorted descending).

use crate::{gesvd_min_work, workspace::WORKSPACE_QUERY, DenseKernels, Job};

/// Kernels implemented in Rust on top of faer. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeKernels;

// number of elements spanned by a column-major matrix with leading dimension `ld`
fn required_len(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        ld * (cols - 1) + rows
    }
}

impl DenseKernels for NativeKernels {
    fn getrf(&self, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32 {
        if lda < m.max(1) {
            return -4;
        }
        let min_mn = m.min(n);
        if ipiv.len() < min_mn {
            return -5;
        }
        if a.len() < required_len(m, n, lda) {
            return -3;
        }

        let mut info = 0;
        for k in 0..min_mn {
            let col_k = k * lda;

            // pivot: largest magnitude on or below the diagonal
            let mut p = k;
            let mut max_val = a[col_k + k].abs();
            for i in k + 1..m {
                let v = a[col_k + i].abs();
                if v > max_val {
                    max_val = v;
                    p = i;
                }
            }
            ipiv[k] = (p + 1) as i32;

            if a[col_k + p] != 0.0 {
                if p != k {
                    for j in 0..n {
                        a.swap(j * lda + k, j * lda + p);
                    }
                }
                let pivot = a[col_k + k];
                for i in k + 1..m {
                    a[col_k + i] /= pivot;
                }
            } else if info == 0 {
                info = (k + 1) as i32;
            }

            // rank-1 update of the trailing submatrix
            for j in k + 1..n {
                let col_j = j * lda;
                let t = a[col_j + k];
                if t == 0.0 {
                    continue;
                }
                for i in k + 1..m {
                    let l = a[col_k + i];
                    a[col_j + i] -= l * t;
                }
            }
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
        if lda < n.max(1) {
            return -3;
        }
        if ipiv.len() < n {
            return -4;
        }
        let min_work = n.max(1);
        if lwork == WORKSPACE_QUERY {
            if work.is_empty() {
                return -5;
            }
            work[0] = min_work as f64;
            return 0;
        }
        if lwork < min_work as isize || work.len() < min_work {
            return -6;
        }
        if a.len() < required_len(n, n, lda) {
            return -2;
        }
        if ipiv[..n].iter().any(|&p| p < 1 || p as usize > n) {
            return -4;
        }
        if n == 0 {
            return 0;
        }

        for i in 0..n {
            if a[i * lda + i] == 0.0 {
                return (i + 1) as i32;
            }
        }

        // inv(U) in place, column by column
        for j in 0..n {
            let col_j = j * lda;
            a[col_j + j] = 1.0 / a[col_j + j];
            let ajj = -a[col_j + j];

            // x := triu(inv(U)[0..j, 0..j]) * x with x = a[0..j, j]
            for c in 0..j {
                let temp = a[col_j + c];
                if temp == 0.0 {
                    continue;
                }
                let col_c = c * lda;
                for r in 0..c {
                    let u = a[col_c + r];
                    a[col_j + r] += temp * u;
                }
                a[col_j + c] = temp * a[col_c + c];
            }
            for r in 0..j {
                a[col_j + r] *= ajj;
            }
        }

        // solve inv(A) * L = inv(U), right to left
        for j in (0..n).rev() {
            let col_j = j * lda;
            for i in j + 1..n {
                work[i] = a[col_j + i];
                a[col_j + i] = 0.0;
            }
            for c in j + 1..n {
                let w = work[c];
                if w == 0.0 {
                    continue;
                }
                let col_c = c * lda;
                for r in 0..n {
                    let v = a[col_c + r];
                    a[col_j + r] -= v * w;
                }
            }
        }

        // undo the row interchanges as column interchanges
        for j in (0..n - 1).rev() {
            let jp = (ipiv[j] - 1) as usize;
            if jp != j {
                for r in 0..n {
                    a.swap(j * lda + r, jp * lda + r);
                }
            }
        }

        0
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
        let min_mn = m.min(n);
        if lda < m.max(1) {
            return -6;
        }
        if ldu < 1 || (jobu == Job::All && ldu < m) {
            return -9;
        }
        if ldvt < 1 || (jobvt == Job::All && ldvt < n) {
            return -11;
        }

        let min_work = gesvd_min_work(m, n);
        if lwork == WORKSPACE_QUERY {
            if work.is_empty() {
                return -12;
            }
            work[0] = min_work as f64;
            return 0;
        }
        if lwork < min_work as isize || work.len() < min_work {
            return -13;
        }
        if a.len() < required_len(m, n, lda) {
            return -5;
        }
        if s.len() < min_mn {
            return -7;
        }
        if jobu == Job::All && u.len() < required_len(m, m, ldu) {
            return -8;
        }
        if jobvt == Job::All && vt.len() < required_len(n, n, ldvt) {
            return -10;
        }
        if m == 0 || n == 0 {
            return 0;
        }

        let mat = faer::Mat::<f64>::from_fn(m, n, |i, j| a[i + j * lda]);

        if jobu == Job::None && jobvt == Job::None {
            let mut values = mat.singular_values();
            values.sort_by(|x, y| y.total_cmp(x));
            s[..min_mn].copy_from_slice(&values[..min_mn]);
            return unconverged(&s[..min_mn]);
        }

        let svd = mat.svd();
        let s_diag = svd.s_diagonal();
        let (f_u, f_v) = (svd.u(), svd.v());

        // descending order of the singular triplets
        let mut order: Vec<usize> = (0..min_mn).collect();
        order.sort_by(|&x, &y| s_diag[y].total_cmp(&s_diag[x]));

        for (dst, &src) in order.iter().enumerate() {
            s[dst] = s_diag[src];
        }

        if jobu == Job::All {
            let cols = order.iter().copied().chain(min_mn..m);
            for (dst, src) in cols.enumerate() {
                for r in 0..m {
                    u[dst * ldu + r] = f_u.read(r, src);
                }
            }
        }

        if jobvt == Job::All {
            let rows = order.iter().copied().chain(min_mn..n);
            for (dst, src) in rows.enumerate() {
                for c in 0..n {
                    vt[c * ldvt + dst] = f_v.read(c, src);
                }
            }
        }

        unconverged(&s[..min_mn])
    }
}

fn unconverged(s: &[f64]) -> i32 {
    s.iter().filter(|v| !v.is_finite()).count() as i32
}
