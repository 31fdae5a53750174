use approx::assert_relative_eq;
use kinalg_linalg::{
    dls, dlsnp, dpinv, inv, linterp, ops::matmul, ops::mvmul, ops::transpose, svd, LinalgError,
    Matrix, NativeKernels,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SEEDS: [u64; 4] = [7, 42, 1234, 98765];

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |_, _| rng.random_range(-1.0..1.0))
}

// diagonally dominant, so every leading block is well conditioned
fn well_conditioned(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let mut a = random_matrix(rng, rows, cols);
    let boost = rows.max(cols) as f64 + 1.0;
    for i in 0..rows.min(cols) {
        a[(i, i)] += boost;
    }
    a
}

fn random_vector(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn apply(a: &Matrix, x: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let mut y = vec![0.0; a.rows()];
    mvmul(&a.view(), x, &mut y)?;
    Ok(y)
}

fn assert_close(a: &[f64], b: &[f64], epsilon: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_relative_eq!(x, y, epsilon = epsilon);
    }
}

#[test]
fn inverse_round_trip() -> Result<(), LinalgError> {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for n in 1..=6 {
            let a = well_conditioned(&mut rng, n, n);
            let a_inv = inv(&NativeKernels, &a.view())?;
            let back = inv(&NativeKernels, &a_inv.view())?;
            assert_close(back.as_slice(), a.as_slice(), 1e-10);
        }
    }
    Ok(())
}

#[test]
fn singular_values_sorted_and_vectors_orthogonal() -> Result<(), LinalgError> {
    let shapes = [(1, 1), (2, 5), (5, 2), (4, 4), (6, 3), (3, 7)];
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for (m, n) in shapes {
            let a = random_matrix(&mut rng, m, n);
            let dec = svd(&NativeKernels, &a.view(), true, true)?;
            let s = dec.singular_values();
            assert_eq!(s.len(), m.min(n));
            assert!(s.iter().all(|&v| v >= 0.0));
            assert!(s.windows(2).all(|w| w[0] >= w[1]));

            for q in [dec.u(), dec.vt()].into_iter().flatten() {
                let qtq = matmul(&transpose(&q.view()).view(), &q.view())?;
                assert_close(qtq.as_slice(), Matrix::identity(q.rows()).as_slice(), 1e-10);
            }
        }
    }
    Ok(())
}

#[test]
fn undamped_pseudo_inverse_is_inverse() -> Result<(), LinalgError> {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for n in 1..=5 {
            let a = well_conditioned(&mut rng, n, n);
            let a_star = dpinv(&NativeKernels, &a.view(), 0.0)?;
            let a_inv = inv(&NativeKernels, &a.view())?;
            assert_close(a_star.as_slice(), a_inv.as_slice(), 1e-10);
        }
    }
    Ok(())
}

#[test]
fn damping_never_amplifies_gain() -> Result<(), LinalgError> {
    let dampings = [0.0, 1e-4, 1e-2, 0.1, 1.0, 10.0];
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = random_matrix(&mut rng, 3, 5);
        let mut previous = f64::INFINITY;
        for k in dampings {
            let a_star = dpinv(&NativeKernels, &a.view(), k)?;
            let gain = svd(&NativeKernels, &a_star.view(), false, false)?.singular_values()[0];
            assert!(gain <= previous * (1.0 + 1e-10), "k = {k}: {gain} > {previous}");
            previous = gain;
        }
    }
    Ok(())
}

#[test]
fn dls_reaches_target_when_well_conditioned() -> Result<(), LinalgError> {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for (m, n) in [(2, 2), (2, 3), (3, 7), (6, 6)] {
            let a = well_conditioned(&mut rng, m, n);
            let x = random_vector(&mut rng, m);
            let y = dls(&NativeKernels, &a.view(), 1e-12, &x)?;
            assert_close(&apply(&a, &y)?, &x, 1e-9);
        }
    }
    Ok(())
}

#[test]
fn nullspace_objective_keeps_primary_residual() -> Result<(), LinalgError> {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for (m, n) in [(1, 3), (2, 4), (3, 7)] {
            let a = well_conditioned(&mut rng, m, n);
            let x = random_vector(&mut rng, m);
            let yp = random_vector(&mut rng, n);
            let y = dls(&NativeKernels, &a.view(), 0.0, &x)?;
            let y_np = dlsnp(&NativeKernels, &a.view(), 0.0, &x, &yp)?;
            assert_close(&apply(&a, &y_np)?, &apply(&a, &y)?, 1e-10);
        }
    }
    Ok(())
}

#[test]
fn interpolation_endpoints_and_midpoint() -> Result<(), LinalgError> {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let x0 = random_vector(&mut rng, 6);
        let x1 = random_vector(&mut rng, 6);
        let t0 = rng.random_range(-5.0..0.0);
        let t1 = rng.random_range(0.5..5.0);

        assert_eq!(linterp(t0, &x0, t1, &x1, t0)?, x0);
        assert_eq!(linterp(t0, &x0, t1, &x1, t1)?, x1);

        let mid = linterp(t0, &x0, t1, &x1, 0.5 * (t0 + t1))?;
        let mean: Vec<f64> = x0.iter().zip(&x1).map(|(a, b)| 0.5 * (a + b)).collect();
        assert_close(&mid, &mean, 1e-12);
    }
    Ok(())
}

#[test]
fn diagonal_scenario() -> Result<(), LinalgError> {
    let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]);
    let y = dls(&NativeKernels, &a.view(), 0.0, &[2.0, 2.0])?;
    assert_close(&y, &[2.0, 1.0], 1e-12);
    Ok(())
}

#[test]
fn rank_deficient_scenario() -> Result<(), LinalgError> {
    let a = Matrix::from_rows(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    let k: f64 = 0.01;
    let bound = 1.0 / (2.0 * k.sqrt());
    let a_star = dpinv(&NativeKernels, &a.view(), k)?;
    assert!(a_star.as_slice().iter().all(|v| v.is_finite() && v.abs() <= bound));
    let y = dls(&NativeKernels, &a.view(), k, &[1.0, 1.0])?;
    assert!(y.iter().all(|v| v.is_finite() && v.abs() <= bound));
    Ok(())
}
