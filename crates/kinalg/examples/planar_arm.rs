use argh::FromArgs;

use kinalg::linalg::{DlsParams, DlsSolver, LinalgError, Matrix, NativeKernels};

#[derive(FromArgs)]
/// Drive a redundant three-link planar arm to a target with damped least squares
struct Args {
    /// target x position of the end effector (default: 1.2)
    #[argh(option, short = 'x', default = "1.2")]
    target_x: f64,

    /// target y position of the end effector (default: 1.0)
    #[argh(option, short = 'y', default = "1.0")]
    target_y: f64,

    /// damping factor (default: 1e-3)
    #[argh(option, short = 'k', default = "1e-3")]
    damping: f64,

    /// gain pulling the joints towards their rest angles (default: 0.1)
    #[argh(option, short = 'g', default = "0.1")]
    rest_gain: f64,

    /// maximum number of iterations (default: 200)
    #[argh(option, short = 'n', default = "200")]
    iterations: usize,
}

const LINKS: [f64; 3] = [1.0, 0.8, 0.5];
const REST: [f64; 3] = [0.0, 0.5, 0.5];

/// End effector position for the joint angles `q`.
fn forward(q: &[f64; 3]) -> [f64; 2] {
    let mut angle = 0.0_f64;
    let mut p = [0.0_f64; 2];
    for (l, qi) in LINKS.iter().zip(q) {
        angle += qi;
        p[0] += l * angle.cos();
        p[1] += l * angle.sin();
    }
    p
}

/// 2x3 position Jacobian.
fn jacobian(q: &[f64; 3]) -> Matrix {
    let angles = [q[0], q[0] + q[1], q[0] + q[1] + q[2]];
    // column j sums the contributions of links j and beyond
    Matrix::from_fn(2, 3, |i, j| {
        (j..3)
            .map(|l| {
                if i == 0 {
                    -LINKS[l] * angles[l].sin()
                } else {
                    LINKS[l] * angles[l].cos()
                }
            })
            .sum()
    })
}

fn main() -> Result<(), LinalgError> {
    env_logger::init();
    let args: Args = argh::from_env();

    let target = [args.target_x, args.target_y];
    let solver = DlsSolver::new(
        &NativeKernels,
        DlsParams {
            damping: args.damping,
        },
    );

    let mut q = REST;
    for it in 0..args.iterations {
        let p = forward(&q);
        let err = [target[0] - p[0], target[1] - p[1]];
        let dist = err[0].hypot(err[1]);
        log::info!("iter {it}: q = {q:.3?}, error = {dist:.2e}");
        if dist < 1e-6 {
            break;
        }

        // bias the redundant degree of freedom towards the rest pose
        let yp: Vec<f64> = q
            .iter()
            .zip(REST)
            .map(|(qi, ri)| args.rest_gain * (ri - qi))
            .collect();

        let dq = solver.solve_nullspace(&jacobian(&q).view(), &err, &yp)?;
        for (qi, dqi) in q.iter_mut().zip(dq) {
            *qi += dqi;
        }
    }

    let p = forward(&q);
    println!("joint angles: {q:.4?}");
    println!("end effector: [{:.4}, {:.4}]", p[0], p[1]);
    println!("target:       [{:.4}, {:.4}]", target[0], target[1]);

    Ok(())
}
