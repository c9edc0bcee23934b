//! Estimates π by the circle-ratio method and plots the sampled points,
//! colored by whether they landed inside the unit quarter circle.

use mini_monte::estimators::estimate_pi;

use plotters::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::f64::consts::PI;

fn main() -> Result<(), Box<dyn Error>> {
    const N_SAMPLES: usize = 1_000_000;
    const N_PLOTTED: usize = 5_000;
    const SEED: u64 = 42;

    let mut rng = SmallRng::seed_from_u64(SEED);
    let estimate: f64 = estimate_pi(&mut rng, N_SAMPLES);
    println!(
        "π estimate: {:.6}, true: {:.6}, absolute error: {:.6}",
        estimate,
        PI,
        (estimate - PI).abs()
    );

    // Scatter a subset of fresh points for the illustration.
    let points: Vec<(f64, f64)> = (0..N_PLOTTED)
        .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let root = BitMapBackend::new("pi_scatter.png", (900, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Circle-Ratio π Estimation", ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;

    chart.configure_mesh().draw()?;

    chart.draw_series(points.iter().map(|&(x, y)| {
        let inside = x * x + y * y < 1.0;
        let color = if inside { BLUE.mix(0.5) } else { RED.mix(0.5) };
        Circle::new((x, y), 2, color.filled())
    }))?;

    println!("Saved scatter plot to pi_scatter.png");
    Ok(())
}
