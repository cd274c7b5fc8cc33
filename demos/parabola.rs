use gpr::prelude::*;

pub fn main() {
    env_logger::builder().init();

    let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
    let ys = [4.0, 1.0, 0.0, 1.0, 4.0];

    let kernel = RBFKernel::new(1.0).expect("length scale is positive");
    let mut gp = GaussianProcessRegressor::new(kernel);

    let grid: Vec<f64> = (0..=12).map(|i| -3.0 + 0.5 * i as f64).collect();

    let prior = gp
        .sample_prior(&grid, 3)
        .expect("prior sampling needs no fit");
    println!("prior samples ({} x {}):\n{}", prior.nrows(), prior.ncols(), prior);

    gp.fit(&xs, &ys, NoiseModel::Uniform(0.01))
        .expect("Data is valid so this should succeed");
    println!("ln_m = {}", gp.ln_m().expect("process is fit"));

    let (mean, std) = gp.predict_with_std(&grid).expect("process is fit");
    println!("{:>6} {:>10} {:>10}", "x", "mean", "std");
    for (x, (m, s)) in grid.iter().zip(mean.iter().zip(std.iter())) {
        println!("{:>6.2} {:>10.4} {:>10.4}", x, m, s);
    }

    let (_, far_std) = gp.predict_with_std(&[10.0]).expect("process is fit");
    println!("std at x = 10: {:.6} (prior std is 1)", far_std[0]);

    let posterior = gp
        .sample_posterior(&grid, 3)
        .expect("process is fit");
    println!("posterior samples:\n{}", posterior);
}
