//! Samples a Gaussian truncated to the unit square. Candidates outside the box
//! have a prior of negative infinity and are rejected without evaluating the
//! likelihood; the counter below shows how many evaluations were saved.
//!
//! Run with `RUST_LOG=info cargo run --example bounded_prior`.

use std::cell::Cell;

use adaptive_metropolis::config::RunParams;
use adaptive_metropolis::distributions::{BoxPrior, SingleSiteGaussian};
use adaptive_metropolis::error::SamplerError;
use adaptive_metropolis::metropolis::ComponentMetropolis;
use ndarray::Axis;

fn main() -> Result<(), SamplerError> {
    env_logger::init();

    let evaluations = Cell::new(0usize);
    let likelihood = |x: &[f64]| {
        evaluations.set(evaluations.get() + 1);
        -0.5 * ((x[0] - 0.9).powi(2) + (x[1] - 0.1).powi(2)) / 0.04
    };
    let prior = BoxPrior::new(vec![0.0, 0.0], vec![1.0, 1.0]);
    let proposal = SingleSiteGaussian::new().set_seed(7);

    let mut sampler = ComponentMetropolis::new(prior, likelihood, proposal, &[0.5, 0.5]).set_seed(7);
    sampler.add_stat("accept_ratio");
    sampler.add_stat("acceptance"); // not in the catalog: warned about and ignored

    let n = 50_000;
    sampler.run(&[0.5, 0.5], &RunParams::new(n).tune(5_000).tune_interval(250))?;

    let samples = sampler.samples();
    println!("Sample mean: {:.3}", samples.mean_axis(Axis(0)).unwrap_or_default());
    println!(
        "Likelihood evaluated {} times over {} iterations",
        evaluations.get(),
        n
    );
    println!("Global acceptance ratio: {:.3}", sampler.global_accept_ratio());
    println!("Registered stats: {:?}", sampler.stats().registered().collect::<Vec<_>>());
    Ok(())
}
