/// The `lwork` sentinel that turns a call into a workspace-size query.
pub const WORKSPACE_QUERY: isize = -1;

/// Run a routine that follows the workspace-query protocol.
///
/// The routine is called once with a single-element buffer and `lwork = WORKSPACE_QUERY`,
/// then again with a freshly allocated buffer of the length it reported. A non-zero status
/// from the query is returned as is and the routine is not run.
///
/// # Arguments
///
/// * `routine` - The routine name, used for logging.
/// * `call` - Invokes the routine with `(work, lwork)` and returns its `info`.
///
/// # Example
///
/// ```
/// use kinalg_lapack::{run_with_workspace, DenseKernels, NativeKernels};
///
/// let kernels = NativeKernels;
/// let mut a = vec![4.0, 2.0, 7.0, 6.0];
/// let mut ipiv = vec![0; 2];
/// assert_eq!(kernels.getrf(2, 2, &mut a, 2, &mut ipiv), 0);
/// let info = run_with_workspace("getri", |work, lwork| {
///     kernels.getri(2, &mut a, 2, &ipiv, work, lwork)
/// });
/// assert_eq!(info, 0);
/// ```
pub fn run_with_workspace<F>(routine: &str, mut call: F) -> i32
where
    F: FnMut(&mut [f64], isize) -> i32,
{
    let mut query = [0.0f64; 1];
    let info = call(&mut query, WORKSPACE_QUERY);
    if info != 0 {
        log::debug!("{routine}: workspace query failed with info = {info}");
        return info;
    }

    let lwork = workspace_len(query[0]);
    log::trace!("{routine}: negotiated workspace of {lwork} elements");

    let mut work = vec![0.0f64; lwork];
    call(&mut work, lwork as isize)
}

// the size is reported as a float in work[0]
fn workspace_len(reported: f64) -> usize {
    if reported.is_finite() && reported >= 1.0 {
        reported as usize
    } else {
        1
    }
}
