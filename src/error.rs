use thiserror::Error;

/// Errors returned while building or evaluating a [crate::Spline].
/// - `InvalidInput` - construction input was rejected, no spline was produced,
/// - `OutOfRangeQuery` - query argument lies outside `[min, max]` of the knots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("Error in Spline: {0}")]
    InvalidInput(String),

    #[error("Error in Spline: x = {x} is out of range [{min}, {max}]")]
    OutOfRangeQuery { x: f64, min: f64, max: f64 },
}
