extern crate natural_spline;

use natural_spline::{build, evaluate_all};

fn main() {

    let x_min = 0.0;
    let x_max = 6.0;

    let arguments = [x_min, 1.0, 2.0, 4.0, 5.0, x_max];
    let results = [1.0, -1.0, 0.0, 3.0, 1.0, 1.0];

    let coefficients = build(&arguments, &results).unwrap();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    let mut x_vector = Vec::new();

    for i in 0..=number_of_steps {
        x_vector.push((x_min + step * i as f64).min(x_max));
    }

    let result = evaluate_all(&coefficients, &x_vector).unwrap();

    println!("x;y");
    for i in 0..=number_of_steps {
        println!("{:.2};{:.2}", x_vector[i], result[i]);
    }
}
