extern crate natural_spline;

use std::f64::consts::PI;

use natural_spline::report::{ReportConfig, SplineReport};
use natural_spline::Spline;
use tracing_subscriber::{fmt, prelude::*};

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing::level_filters::LevelFilter::DEBUG)
        .with(fmt::layer()
            .without_time()
            .with_target(false))
        .init();
}

fn main() {
    init_logging();

    let knots_number = 16;
    let knot_step = 2.0 * PI / (knots_number - 1) as f64;
    let arguments: Vec<f64> = (0..knots_number).map(|i| knot_step * i as f64).collect();
    let results: Vec<f64> = arguments.iter().map(|x| x.sin()).collect();

    let number_of_points = 40;
    let step = 2.0 * PI / number_of_points as f64;
    let x_vector: Vec<f64> = (0..number_of_points).map(|i| step * i as f64 + step / 2.0).collect();

    let spline = Spline::new(&arguments, &results).unwrap();

    // out of range queries are rejected, never extrapolated
    if let Err(error) = spline.interpolate(-1.0) {
        tracing::info!(%error, "query rejected");
    }

    let report = SplineReport::new(&spline, &x_vector, f64::sin, ReportConfig::default()).unwrap();
    println!("{}", report);
}
