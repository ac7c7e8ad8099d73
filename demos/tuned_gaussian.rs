//! Samples a 3D Gaussian starting from badly scaled proposals and shows how the
//! tuning phase brings the per-variable acceptance ratios into range.
//!
//! Run with `RUST_LOG=info cargo run --release --example tuned_gaussian`.

use adaptive_metropolis::config::{RunParams, SamplerConfig};
use adaptive_metropolis::distributions::{FlatPrior, IsotropicGaussian, SingleSiteGaussian};
use adaptive_metropolis::error::SamplerError;
use adaptive_metropolis::metropolis::ComponentMetropolis;
use adaptive_metropolis::stats::StatKind;
use ndarray::Axis;

fn main() -> Result<(), SamplerError> {
    env_logger::init();

    const SEED: u64 = 42;
    let likelihood = IsotropicGaussian::new(vec![1.0, -2.0, 0.5], 2.0);
    let proposal = SingleSiteGaussian::new().set_seed(SEED);
    let config = SamplerConfig::default()
        .verbose(1)
        .show_stats(50_000)
        .show_progress(true);

    let mut sampler = ComponentMetropolis::new(FlatPrior, likelihood, proposal, &[0.01, 1.0, 100.0])
        .with_config(config)
        .set_seed(SEED);
    for name in ["loglikelihood", "accept_ratio", "prop_S", "parameter_accept_ratio"] {
        sampler.add_stat(name);
    }

    let params = RunParams::new(200_000)
        .tune(20_000)
        .tune_interval(1_000)
        .discard_tuned_samples(true)
        .thin(10);
    sampler.run(&[0.0, 0.0, 0.0], &params)?;

    let samples = sampler.samples();
    println!("Saved {} samples in {:.2?}", samples.nrows(), sampler.duration());
    println!("Sample mean: {:.3}", samples.mean_axis(Axis(0)).unwrap_or_default());
    println!("Sample std:  {:.3}", samples.std_axis(Axis(0), 1.0));
    println!("Final proposal scales: {:.3?}", sampler.prop_s());
    println!("Global acceptance ratio: {:.3}", sampler.global_accept_ratio());
    if let Some(ratios) = sampler.stat(StatKind::ParameterAcceptRatio) {
        println!("Last per-variable acceptance: {:.3}", ratios.row(ratios.nrows() - 1));
    }

    #[cfg(feature = "csv")]
    {
        adaptive_metropolis::io::csv::save_samples_csv(samples, "/tmp/tuned_gaussian_samples.csv")?;
        adaptive_metropolis::io::csv::save_stats_csv(sampler.stats(), "/tmp/tuned_gaussian_stats.csv")?;
        println!("Wrote /tmp/tuned_gaussian_samples.csv and /tmp/tuned_gaussian_stats.csv");
    }

    Ok(())
}
