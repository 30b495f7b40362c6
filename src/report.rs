//! Text reports of a built [Spline]: sample tables, coefficient table and interpolation error.
//!
//! Every function here is stateless, the size of tables is controlled by [ReportConfig].

use std::fmt::{self, Display};

use crate::{error::SplineError, segment::SegmentCoefficients, spline::Spline};

const COEFFICIENTS_HEADER: &str = "Step|    x    |    a    |    b    |    c    |    d    ";

/// Formatting options of reports.
/// - `sample_window` - maximal number of columns in argument/value tables,
/// - `coefficient_window` - maximal number of rows in coefficient table,
/// - `precision` - digits after decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    sample_window: usize,
    coefficient_window: usize,
    precision: usize,
}

impl ReportConfig {
    pub fn new(sample_window: usize, coefficient_window: usize, precision: usize) -> Self {
        ReportConfig { sample_window, coefficient_window, precision }
    }

    pub fn with_sample_window(mut self, sample_window: usize) -> Self {
        self.sample_window = sample_window;
        self
    }

    pub fn with_coefficient_window(mut self, coefficient_window: usize) -> Self {
        self.coefficient_window = coefficient_window;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn get_sample_window(&self) -> usize {
        self.sample_window
    }

    pub fn get_coefficient_window(&self) -> usize {
        self.coefficient_window
    }

    pub fn get_precision(&self) -> usize {
        self.precision
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { sample_window: 20, coefficient_window: 10, precision: 3 }
    }
}

/// Two row table of arguments and values, truncated to `sample_window` columns.
/// # Example
/// ```
/// use natural_spline::report::{format_samples, ReportConfig};
///
/// let table = format_samples(&[0.0, 1.0], &[2.0, -1.5], &ReportConfig::default());
/// assert_eq!(" x |  0.000 |  1.000\n--------------------\n y |  2.000 | -1.500\n", table);
/// ```
pub fn format_samples(arguments: &[f64], values: &[f64], config: &ReportConfig) -> String {
    SamplesTable { arguments, values, config }.to_string()
}

/// Table of spline coefficients, one row per knot, truncated to `coefficient_window` rows.
pub fn format_coefficients(coefficients: &[SegmentCoefficients], config: &ReportConfig) -> String {
    CoefficientsTable { coefficients, config }.to_string()
}

/// Maximal absolute difference between `function` and the spline over `x_vector`.
///
/// Returns 0 for empty `x_vector`.
/// # Errors
/// [SplineError::OutOfRangeQuery] when any of `x_vector` lies outside the spline domain.
pub fn interpolation_error<F>(spline: &Spline, x_vector: &[f64], function: F) -> Result<f64, SplineError>
where
    F: Fn(f64) -> f64,
{
    let interpolated = spline.batch_interpolate(x_vector)?;
    Ok(max_difference(x_vector, &interpolated, function))
}

fn max_difference<F>(x_vector: &[f64], interpolated: &[f64], function: F) -> f64
where
    F: Fn(f64) -> f64,
{
    x_vector
        .iter()
        .zip(interpolated)
        .map(|(x, y)| (function(*x) - y).abs())
        .fold(0.0, f64::max)
}

/// Complete report of a spline evaluated at query points against a reference function.
#[derive(Debug, Clone)]
pub struct SplineReport {
    arguments: Vec<f64>,
    results: Vec<f64>,
    x_vector: Vec<f64>,
    interpolated: Vec<f64>,
    coefficients: Vec<SegmentCoefficients>,
    error: f64,
    config: ReportConfig,
}

impl SplineReport {
    /// # Example
    /// ```
    /// use natural_spline::Spline;
    /// use natural_spline::report::{ReportConfig, SplineReport};
    ///
    /// let spline = Spline::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
    /// let report = SplineReport::new(&spline, &[0.5, 1.5], |x| 2.0 * x, ReportConfig::default()).unwrap();
    ///
    /// assert!(report.get_error() < 1e-12);
    /// assert!(report.to_string().contains("Interpolation error: 0.00000"));
    /// ```
    pub fn new<F>(spline: &Spline, x_vector: &[f64], function: F, config: ReportConfig) -> Result<Self, SplineError>
    where
        F: Fn(f64) -> f64,
    {
        let interpolated = spline.batch_interpolate(x_vector)?;
        let error = max_difference(x_vector, &interpolated, function);
        let coefficients = spline.coefficients().to_vec();

        Ok(SplineReport {
            arguments: coefficients.iter().map(|s| s.get_x()).collect(),
            results: coefficients.iter().map(|s| s.get_a()).collect(),
            x_vector: x_vector.to_vec(),
            interpolated,
            coefficients,
            error,
            config,
        })
    }

    pub fn get_interpolated(&self) -> &[f64] {
        &self.interpolated
    }

    pub fn get_error(&self) -> f64 {
        self.error
    }
}

impl Display for SplineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.config;

        writeln!(f, "Function arguments and results:\n")?;
        write!(f, "{}", SamplesTable { arguments: &self.arguments, values: &self.results, config })?;

        writeln!(f, "\nSpline arguments and interpolated values:\n")?;
        write!(f, "{}", SamplesTable { arguments: &self.x_vector, values: &self.interpolated, config })?;

        writeln!(f, "\nCoefficients on each step:\n")?;
        write!(f, "{}", CoefficientsTable { coefficients: &self.coefficients, config })?;

        writeln!(f, "\nInterpolation error: {:.5}", self.error)
    }
}

struct SamplesTable<'a> {
    arguments: &'a [f64],
    values: &'a [f64],
    config: &'a ReportConfig,
}

impl Display for SamplesTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.config.precision;
        let width = precision + 3;
        let join = |values: &[f64]| {
            values
                .iter()
                .take(self.config.sample_window)
                .map(|v| format!("{:width$.precision$}", v))
                .collect::<Vec<String>>()
                .join(" | ")
        };

        let arguments = join(self.arguments);
        let values = join(self.values);

        writeln!(f, " x | {}", arguments)?;
        writeln!(f, "{}", "-".repeat(arguments.len() + " x | ".len()))?;
        writeln!(f, " y | {}", values)
    }
}

struct CoefficientsTable<'a> {
    coefficients: &'a [SegmentCoefficients],
    config: &'a ReportConfig,
}

impl Display for CoefficientsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.config.precision;
        let width = precision + 4;

        writeln!(f, "{}", COEFFICIENTS_HEADER)?;
        writeln!(f, "{}", "-".repeat(COEFFICIENTS_HEADER.len()))?;

        for (step, segment) in self.coefficients.iter().take(self.config.coefficient_window).enumerate() {
            writeln!(
                f,
                " {:2} | {:width$.precision$} | {:width$.precision$} | {:width$.precision$} | {:width$.precision$} | {:width$.precision$}",
                step + 1,
                segment.get_x(),
                segment.get_a(),
                segment.get_b(),
                segment.get_c(),
                segment.get_d(),
            )?;
        }
        Ok(())
    }
}
