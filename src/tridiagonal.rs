use tracing::trace;

/// Solves the natural spline system for the second derivatives at every knot.
///
/// For each interior knot `i` continuity of the second derivative gives
/// `h_i*m[i-1] + 2(h_i + h_{i+1})*m[i] + h_{i+1}*m[i+1] = F_i` with
/// `h_i = x[i] - x[i-1]` and `F_i = 6((y[i+1] - y[i])/h_{i+1} - (y[i] - y[i-1])/h_i)`.
/// The system is solved with the tridiagonal matrix algorithm: a forward sweep keeps
/// `m[i] = alpha[i]*m[i+1] + beta[i]`, back substitution then produces the solution.
///
/// `m[0]` and `m[n-1]` are fixed at 0. Arguments must be strictly ascending and both slices
/// must have the same length of at least 2, which [crate::build] checks beforehand.
pub(crate) fn solve_natural_moments(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut moments = vec![0.0; n];
    if n < 3 {
        return moments;
    }

    let mut alpha = vec![0.0; n - 1];
    let mut beta = vec![0.0; n - 1];

    // Forward sweep
    for i in 1..n - 1 {
        let current_delta = x[i] - x[i - 1];
        let next_delta = x[i + 1] - x[i];
        let rhs = 6.0 * ((y[i + 1] - y[i]) / next_delta - (y[i] - y[i - 1]) / current_delta);
        let pivot = current_delta * alpha[i - 1] + 2.0 * (current_delta + next_delta);

        alpha[i] = -next_delta / pivot;
        beta[i] = (rhs - current_delta * beta[i - 1]) / pivot;
    }

    // Back substitution
    for i in (1..n - 1).rev() {
        moments[i] = alpha[i] * moments[i + 1] + beta[i];
    }

    trace!(knots = n, "solved natural spline tridiagonal system");
    moments
}
