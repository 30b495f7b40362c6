//! Natural cubic spline interpolation of tabulated data.
//! Second derivatives of the spline are fixed at 0 on the first and last knot, coefficients
//! are found with the tridiagonal matrix algorithm.
//!
//! # Example
//! ```
//! use natural_spline::Spline;
//! use assert_approx_eq::assert_approx_eq;
//!
//! let arguments = [0.0, 1.0, 2.0, 3.0];
//! let results = [0.0, 1.0, 0.0, 1.0];
//! let spline = Spline::new(&arguments, &results).unwrap();
//!
//! assert_approx_eq!(1.0, spline.interpolate(1.0).unwrap(), 1e-12);
//! assert_approx_eq!(0.75, spline.interpolate(0.5).unwrap(), 1e-12);
//! assert!(spline.interpolate(3.5).is_err());
//! ```

mod error;
mod segment;
mod spline;
mod tridiagonal;
pub mod report;

pub use error::SplineError;
pub use segment::SegmentCoefficients;
pub use spline::{build, evaluate, evaluate_all, Spline};
