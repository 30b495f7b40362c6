extern crate natural_spline;

use natural_spline::Spline;

fn main() {

    let arguments = [0.0, 1.0, 2.0, 4.0, 5.0, 6.0];
    let results = [1.0, -1.0, 0.0, 3.0, 1.0, 1.0];

    let spline = Spline::new(&arguments, &results).unwrap();
    let (x_min, x_max) = spline.domain();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    println!("x;y");
    for i in 0..=number_of_steps {
        let x = (x_min + step * i as f64).min(x_max);
        println!("{:.2};{:.2}", x, spline.interpolate(x).unwrap());
    }
}
