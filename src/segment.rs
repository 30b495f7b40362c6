/// Coefficients of the local cubic anchored at one knot of a natural spline.
/// - `x` - knot argument the record is anchored to,
/// - `a` - spline value at the knot,
/// - `b` - first derivative coefficient,
/// - `c` - second derivative coefficient,
/// - `d` - third derivative coefficient.
///
/// The local polynomial is `a + b*δ + c*δ²/2 + d*δ³/6` where `δ = x_query - x`.
/// Records are created once while the spline is built and cannot be modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCoefficients {
    x: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl SegmentCoefficients {
    pub(crate) fn new(x: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        SegmentCoefficients { x, a, b, c, d }
    }

    pub fn get_x(&self) -> f64 {
        self.x
    }

    pub fn get_a(&self) -> f64 {
        self.a
    }

    pub fn get_b(&self) -> f64 {
        self.b
    }

    pub fn get_c(&self) -> f64 {
        self.c
    }

    pub fn get_d(&self) -> f64 {
        self.d
    }

    /// Value of the local cubic at absolute argument `x`.
    /// # Example
    /// ```
    /// use natural_spline::build;
    ///
    /// let coefficients = build(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
    /// assert_eq!(2.0, coefficients[1].value_at(0.5));
    /// ```
    pub fn value_at(&self, x: f64) -> f64 {
        let delta = x - self.x;
        self.a + self.b * delta + self.c * delta.powi(2) / 2.0 + self.d * delta.powi(3) / 6.0
    }

    pub fn first_derivative_at(&self, x: f64) -> f64 {
        let delta = x - self.x;
        self.b + self.c * delta + self.d * delta.powi(2) / 2.0
    }

    pub fn second_derivative_at(&self, x: f64) -> f64 {
        let delta = x - self.x;
        self.c + self.d * delta
    }
}
