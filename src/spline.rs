use tracing::{debug, warn};

use crate::{error::SplineError, segment::SegmentCoefficients, tridiagonal::solve_natural_moments};

/// Builds the coefficients of a natural cubic spline passing through `(arguments[i], results[i])`.
///
/// One [SegmentCoefficients] record is produced per knot, in the same order as the input.
/// Second derivative coefficients of the first and last record are exactly 0.
/// # Example
/// ```
/// use natural_spline::build;
///
/// let coefficients = build(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap();
///
/// assert_eq!(4, coefficients.len());
/// assert_eq!(0.0, coefficients[0].get_c());
/// assert_eq!(0.0, coefficients[3].get_c());
/// ```
/// # Errors
/// [SplineError::InvalidInput] is returned when slices lengths differ, when fewer than 2 knots
/// are given, when any value is not finite, when arguments are not strictly ascending or when
/// segment lengths, slopes or resulting coefficients overflow.
/// ```
/// use natural_spline::build;
///
/// assert!(build(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
/// assert!(build(&[0.0, 1.0, 2.0], &[0.0, 1.0]).is_err());
/// ```
pub fn build(arguments: &[f64], results: &[f64]) -> Result<Vec<SegmentCoefficients>, SplineError> {
    if let Err(error) = validate_samples(arguments, results) {
        warn!(%error, "rejected spline input");
        return Err(error);
    }

    let size = arguments.len();
    let moments = solve_natural_moments(arguments, results);

    let mut b = vec![0.0; size];
    let mut d = vec![0.0; size];

    for i in (1..size).rev() {
        let delta = arguments[i] - arguments[i - 1];
        d[i] = (moments[i] - moments[i - 1]) / delta;
        b[i] = delta * (2.0 * moments[i] + moments[i - 1]) / 6.0
            + (results[i] - results[i - 1]) / delta;
    }

    if let Some(i) = (0..size).find(|&i| !(b[i].is_finite() && moments[i].is_finite() && d[i].is_finite())) {
        let error = SplineError::InvalidInput(format!(
            "coefficients at x = {} overflow, knots spacing is too uneven",
            arguments[i]
        ));
        warn!(%error, "rejected spline input");
        return Err(error);
    }

    let coefficients = (0..size)
        .map(|i| SegmentCoefficients::new(arguments[i], results[i], b[i], moments[i], d[i]))
        .collect();

    debug!(knots = size, min_x = arguments[0], max_x = arguments[size - 1], "built natural spline");
    Ok(coefficients)
}

/// Evaluates the spline described by `coefficients` at `x`.
///
/// The owning record is the first one whose knot is not less than `x`. A query exactly at a knot
/// binds to that knot's own record.
/// # Errors
/// - [SplineError::OutOfRangeQuery] when `x` is outside the knots range or is NaN,
/// - [SplineError::InvalidInput] when `coefficients` is empty.
pub fn evaluate(coefficients: &[SegmentCoefficients], x: f64) -> Result<f64, SplineError> {
    check_in_range(coefficients, x)?;
    let index = find_segment_index(coefficients, x);
    Ok(coefficients[index].value_at(x))
}

/// Evaluates the spline at every value of `x_vector`, keeping the order of queries.
///
/// Whole batch is rejected if any query is out of range.
pub fn evaluate_all(coefficients: &[SegmentCoefficients], x_vector: &[f64]) -> Result<Vec<f64>, SplineError> {
    for x in x_vector {
        check_in_range(coefficients, *x)?;
    }

    let mut results = Vec::with_capacity(x_vector.len());
    let mut index = 0;

    for x in x_vector {
        index = find_segment_index_with_hint(coefficients, index, *x);
        results.push(coefficients[index].value_at(*x));
    }
    Ok(results)
}

/// Natural cubic spline built once from ascending samples and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    coefficients: Vec<SegmentCoefficients>,
    min_x: f64,
    max_x: f64,
}

impl Spline {
    pub fn new(arguments: &[f64], results: &[f64]) -> Result<Self, SplineError> {
        let coefficients = build(arguments, results)?;
        let min_x = coefficients[0].get_x();
        let max_x = coefficients[coefficients.len() - 1].get_x();

        Ok(Spline { coefficients, min_x, max_x })
    }

    pub fn interpolate(&self, x: f64) -> Result<f64, SplineError> {
        evaluate(&self.coefficients, x)
    }

    pub fn batch_interpolate(&self, x_vector: &[f64]) -> Result<Vec<f64>, SplineError> {
        evaluate_all(&self.coefficients, x_vector)
    }

    /// First derivative of the spline at `x`.
    ///
    /// The first record carries no slope, so `x` equal to the first knot is evaluated
    /// on the record of the second knot.
    pub fn first_derivative(&self, x: f64) -> Result<f64, SplineError> {
        let index = self.derivative_segment_index(x)?;
        Ok(self.coefficients[index].first_derivative_at(x))
    }

    pub fn second_derivative(&self, x: f64) -> Result<f64, SplineError> {
        let index = self.derivative_segment_index(x)?;
        Ok(self.coefficients[index].second_derivative_at(x))
    }

    /// Index of the record used to evaluate `x`.
    pub fn segment_index(&self, x: f64) -> Result<usize, SplineError> {
        check_in_range(&self.coefficients, x)?;
        Ok(find_segment_index(&self.coefficients, x))
    }

    pub fn coefficients(&self) -> &[SegmentCoefficients] {
        &self.coefficients
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min_x, self.max_x)
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Always false, a built spline has at least 2 knots. Provided to pair with [Spline::len].
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    fn derivative_segment_index(&self, x: f64) -> Result<usize, SplineError> {
        Ok(self.segment_index(x)?.max(1))
    }
}

fn validate_samples(arguments: &[f64], results: &[f64]) -> Result<(), SplineError> {
    if arguments.len() != results.len() {
        return Err(SplineError::InvalidInput(format!(
            "arguments and results must have the same length, got {} and {}",
            arguments.len(),
            results.len()
        )));
    }

    if arguments.len() < 2 {
        return Err(SplineError::InvalidInput("Spline must have at least 2 knots".to_string()));
    }

    if arguments.iter().chain(results).any(|v| !v.is_finite()) {
        return Err(SplineError::InvalidInput("Knots must have finite x and y values".to_string()));
    }

    if let Some(i) = arguments.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SplineError::InvalidInput(format!(
            "arguments must be strictly ascending, got {} followed by {}",
            arguments[i],
            arguments[i + 1]
        )));
    }

    for i in 1..arguments.len() {
        let delta = arguments[i] - arguments[i - 1];
        let slope = (results[i] - results[i - 1]) / delta;
        if !delta.is_finite() || !slope.is_finite() {
            return Err(SplineError::InvalidInput(format!(
                "segment [{}, {}] is too short or too long to be represented",
                arguments[i - 1],
                arguments[i]
            )));
        }
    }

    Ok(())
}

fn check_in_range(coefficients: &[SegmentCoefficients], x: f64) -> Result<(), SplineError> {
    let (Some(first), Some(last)) = (coefficients.first(), coefficients.last()) else {
        return Err(SplineError::InvalidInput("Spline has no coefficients".to_string()));
    };

    let (min, max) = (first.get_x(), last.get_x());
    if min <= x && x <= max {
        Ok(())
    } else {
        warn!(x, min, max, "rejected out of range query");
        Err(SplineError::OutOfRangeQuery { x, min, max })
    }
}

// Lower bound: first record whose knot is not less than x.
fn find_segment_index(coefficients: &[SegmentCoefficients], x: f64) -> usize {
    coefficients.partition_point(|segment| segment.get_x() < x)
}

fn find_segment_index_with_hint(coefficients: &[SegmentCoefficients], index_hint: usize, x: f64) -> usize {
    if is_in_segment(coefficients, index_hint, x) {
        index_hint
    } else if index_hint + 1 < coefficients.len() && is_in_segment(coefficients, index_hint + 1, x) {
        index_hint + 1
    } else {
        find_segment_index(coefficients, x)
    }
}

fn is_in_segment(coefficients: &[SegmentCoefficients], index: usize, x: f64) -> bool {
    if index == 0 {
        x <= coefficients[0].get_x()
    } else {
        coefficients[index - 1].get_x() < x && x <= coefficients[index].get_x()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::Rng;

    use super::*;

    fn random_samples(knots_number: usize) -> (Vec<f64>, Vec<f64>) {
        let mut rng = rand::thread_rng();
        let mut arguments: Vec<f64> = Vec::with_capacity(knots_number);
        let mut results: Vec<f64> = Vec::with_capacity(knots_number);

        let mut x: f64 = rng.gen_range(-5.0..5.0);
        for _ in 0..knots_number {
            arguments.push(x);
            results.push(rng.gen_range(0.0..10.0));
            x += rng.gen_range(0.05..1.5);
        }
        (arguments, results)
    }

    #[test]
    fn four_knots_alternating() {
        let eps = 1e-12;
        let arguments = [0.0, 1.0, 2.0, 3.0];
        let results = [0.0, 1.0, 0.0, 1.0];

        let spline = Spline::new(&arguments, &results).unwrap();
        let coefficients = spline.coefficients();

        assert_eq!(0.0, coefficients[0].get_c());
        assert_eq!(0.0, coefficients[3].get_c());

        assert_approx_eq!(spline.interpolate(0.0).unwrap(), 0.0, eps);
        assert_approx_eq!(spline.interpolate(1.0).unwrap(), 1.0, eps);
        assert_approx_eq!(spline.interpolate(2.0).unwrap(), 0.0, eps);
        assert_approx_eq!(spline.interpolate(3.0).unwrap(), 1.0, eps);

        assert_approx_eq!(spline.interpolate(0.5).unwrap(), 0.75, eps);
        assert_approx_eq!(spline.interpolate(1.5).unwrap(), 0.5, eps);
        assert_approx_eq!(spline.interpolate(2.5).unwrap(), 0.25, eps);
    }

    #[test]
    fn four_knots_alternating_coefficients() {
        let eps = 1e-12;
        let coefficients = build(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap();

        let expected = [
            (0.0, 0.0, 0.0, 0.0, 0.0),
            (1.0, 1.0, -1.0 / 3.0, -4.0, -4.0),
            (2.0, 0.0, -1.0 / 3.0, 4.0, 8.0),
            (3.0, 1.0, 5.0 / 3.0, 0.0, -4.0),
        ];

        for (segment, (x, a, b, c, d)) in coefficients.iter().zip(expected) {
            assert_eq!(x, segment.get_x());
            assert_eq!(a, segment.get_a());
            assert_approx_eq!(segment.get_b(), b, eps);
            assert_approx_eq!(segment.get_c(), c, eps);
            assert_approx_eq!(segment.get_d(), d, eps);
        }
    }

    #[test]
    fn two_knots_is_straight_line() {
        let eps = 1e-12;
        let spline = Spline::new(&[0.0, 1.0], &[2.0, 6.0]).unwrap();

        assert_eq!(0.0, spline.coefficients()[0].get_c());
        assert_eq!(0.0, spline.coefficients()[1].get_c());

        assert_approx_eq!(spline.interpolate(0.5).unwrap(), 4.0, eps);
        assert_approx_eq!(spline.interpolate(0.25).unwrap(), 3.0, eps);
        assert_approx_eq!(spline.first_derivative(0.0).unwrap(), 4.0, eps);
        assert_approx_eq!(spline.second_derivative(0.7).unwrap(), 0.0, eps);
    }

    #[test]
    fn linear_data_is_reproduced() {
        let eps = 1e-10;
        let arguments = [-1.0, 0.3, 0.4, 2.0, 5.5, 6.0];
        let results: Vec<f64> = arguments.iter().map(|x| 2.0 * x + 1.0).collect();

        let spline = Spline::new(&arguments, &results).unwrap();

        for x in [-1.0, -0.5, 0.35, 1.0, 3.3, 5.9, 6.0] {
            assert_approx_eq!(spline.interpolate(x).unwrap(), 2.0 * x + 1.0, eps);
            assert_approx_eq!(spline.first_derivative(x).unwrap(), 2.0, eps);
        }
    }

    #[test]
    fn over_sin_function() {
        // sin has zero second derivative at 0 and pi, same as natural boundary
        let eps = 1e-4;
        let knots_number = 21;
        let step = std::f64::consts::PI / (knots_number - 1) as f64;

        let arguments: Vec<f64> = (0..knots_number).map(|i| step * i as f64).collect();
        let results: Vec<f64> = arguments.iter().map(|x| x.sin()).collect();
        let spline = Spline::new(&arguments, &results).unwrap();

        for x in [0.0, 0.13, 0.69, 1.0, 1.5707963, 2.2, 3.0, std::f64::consts::PI] {
            assert_approx_eq!(spline.interpolate(x).unwrap(), x.sin(), eps);
        }
        assert_approx_eq!(spline.first_derivative(1.0).unwrap(), 1.0_f64.cos(), 1e-3);
    }

    #[test]
    fn interpolates_knots_exactly() {
        let (arguments, results) = random_samples(50);
        let spline = Spline::new(&arguments, &results).unwrap();

        for i in 0..arguments.len() {
            assert_eq!(results[i], spline.interpolate(arguments[i]).unwrap());
        }
    }

    #[test]
    fn continuous_on_interior_knots() {
        let eps = 1e-7;
        let (arguments, results) = random_samples(30);
        let coefficients = build(&arguments, &results).unwrap();

        for i in 1..arguments.len() - 1 {
            let x = arguments[i];
            let left = &coefficients[i];
            let right = &coefficients[i + 1];

            assert_approx_eq!(left.value_at(x), right.value_at(x), eps);
            assert_approx_eq!(left.first_derivative_at(x), right.first_derivative_at(x), eps);
            assert_approx_eq!(left.second_derivative_at(x), right.second_derivative_at(x), eps);
        }
    }

    #[test]
    fn natural_boundary() {
        let (arguments, results) = random_samples(25);
        let spline = Spline::new(&arguments, &results).unwrap();
        let (min_x, max_x) = spline.domain();

        assert_eq!(0.0, spline.coefficients()[0].get_c());
        assert_eq!(0.0, spline.coefficients()[spline.len() - 1].get_c());

        assert_approx_eq!(spline.second_derivative(min_x).unwrap(), 0.0, 1e-6);
        assert_approx_eq!(spline.second_derivative(max_x).unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn lookup_is_monotonic() {
        let (arguments, results) = random_samples(20);
        let spline = Spline::new(&arguments, &results).unwrap();
        let (min_x, max_x) = spline.domain();

        let number_of_points = 500;
        let step = (max_x - min_x) / number_of_points as f64;

        let mut previous = 0;
        for i in 0..=number_of_points {
            let x = (min_x + step * i as f64).min(max_x);
            let index = spline.segment_index(x).unwrap();
            assert!(index >= previous);
            previous = index;
        }
        assert_eq!(spline.len() - 1, previous);
    }

    #[test]
    fn lookup_binds_knot_to_own_record() {
        let spline = Spline::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap();

        assert_eq!(0, spline.segment_index(0.0).unwrap());
        assert_eq!(1, spline.segment_index(0.5).unwrap());
        assert_eq!(1, spline.segment_index(1.0).unwrap());
        assert_eq!(2, spline.segment_index(1.000001).unwrap());
        assert_eq!(3, spline.segment_index(3.0).unwrap());
    }

    #[test]
    fn build_is_idempotent() {
        let (arguments, results) = random_samples(15);

        let first = build(&arguments, &results).unwrap();
        let second = build(&arguments, &results).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn batch_matches_single_evaluation() {
        let (arguments, results) = random_samples(20);
        let spline = Spline::new(&arguments, &results).unwrap();
        let (min_x, max_x) = spline.domain();

        let mut rng = rand::thread_rng();
        let mut x_vector: Vec<f64> = (0..200).map(|_| rng.gen_range(min_x..max_x)).collect();
        x_vector.push(max_x);
        x_vector.push(min_x);
        x_vector.extend_from_slice(&arguments);

        let result = spline.batch_interpolate(&x_vector).unwrap();

        assert_eq!(x_vector.len(), result.len());
        for i in 0..x_vector.len() {
            assert_eq!(spline.interpolate(x_vector[i]).unwrap(), result[i]);
        }

        x_vector.sort_by(|a, b| a.total_cmp(b));
        let result = evaluate_all(spline.coefficients(), &x_vector).unwrap();
        for i in 0..x_vector.len() {
            assert_eq!(evaluate(spline.coefficients(), x_vector[i]).unwrap(), result[i]);
        }
    }

    #[test]
    fn non_ascending_arguments() {
        let result = Spline::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn duplicated_arguments() {
        let result = build(&[0.0, 1.0, 1.0, 2.0], &[0.0, 1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn mismatched_lengths() {
        let result = build(&[0.0, 1.0, 2.0], &[0.0, 1.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn not_enough_knots() {
        assert!(matches!(build(&[1.0], &[1.0]), Err(SplineError::InvalidInput(_))));
        assert!(matches!(build(&[], &[]), Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn not_finite_values() {
        assert!(build(&[0.0, f64::NAN, 2.0], &[0.0, 1.0, 2.0]).is_err());
        assert!(build(&[0.0, 1.0, 2.0], &[0.0, f64::INFINITY, 2.0]).is_err());
    }

    #[test]
    fn not_finite_segments() {
        // segment length overflows
        let result = build(&[-1e308, 1e308], &[0.0, 1.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));

        // slope over subnormal segment overflows
        let result = build(&[0.0, 5e-324, 1.0], &[0.0, 1.0, 0.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));

        // finite slopes, but second derivatives overflow
        let result = build(&[0.0, 1e-200, 2e-200], &[0.0, 1e107, 0.0]);
        assert!(matches!(result, Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn is_never_empty() {
        let spline = Spline::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert_eq!(2, spline.len());
        assert!(!spline.is_empty());
    }

    #[test]
    fn out_of_range_queries() {
        let spline = Spline::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap();

        assert_eq!(
            Err(SplineError::OutOfRangeQuery { x: -0.5, min: 0.0, max: 3.0 }),
            spline.interpolate(-0.5)
        );
        assert!(matches!(spline.interpolate(3.5), Err(SplineError::OutOfRangeQuery { .. })));
        assert!(matches!(spline.interpolate(f64::NAN), Err(SplineError::OutOfRangeQuery { .. })));
        assert!(spline.first_derivative(-1.0).is_err());
        assert!(spline.segment_index(4.0).is_err());

        assert!(spline.batch_interpolate(&[0.0, 1.5, 3.5]).is_err());
    }

    #[test]
    fn empty_coefficients() {
        assert!(matches!(evaluate(&[], 0.0), Err(SplineError::InvalidInput(_))));
        assert!(matches!(evaluate_all(&[], &[0.0]), Err(SplineError::InvalidInput(_))));
        assert_eq!(Ok(vec![]), evaluate_all(&[], &[]));
    }

    #[test]
    fn spline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Spline>();
    }
}
