//! Whole-run properties of the chain driver: deterministic acceptance decisions,
//! alignment of samples with recorded stats, and acceptance bookkeeping.

use adaptive_metropolis::config::{RunParams, SamplerConfig};
use adaptive_metropolis::distributions::{
    BoxPrior, IsotropicGaussian, LogLikelihood, SingleSiteGaussian, UniformSource,
};
use adaptive_metropolis::metropolis::ComponentMetropolis;
use adaptive_metropolis::stats::StatKind;

struct Replay(Vec<f64>, usize);

impl UniformSource<f64> for Replay {
    fn next_uniform(&mut self) -> f64 {
        let u = self.0[self.1 % self.0.len()];
        self.1 += 1;
        u
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn five_step_walk_matches_hand_computation() {
    init_logging();
    let flat = |_: &[f64]| 0.0;
    let likelihood = |x: &[f64]| -x[0] * x[0];
    let step = |x: &[f64], s: &[f64]| vec![x[0] + s[0]];

    // Candidate log-ratios along the walk and the uniforms drawn against them.
    // ln(0.9) = -0.105 > -1     reject, x = 0
    // ln(0.2) = -1.609 < -1     accept, x = 1
    // ln(0.1) = -2.303 > -3     reject, x = 1
    // ln(0.001) = -6.908 < -3   accept, x = 2
    // ln(0.5) = -0.693 > -5     reject, x = 2
    let uniforms = vec![0.9, 0.2, 0.1, 0.001, 0.5];
    let mut sampler = ComponentMetropolis::new(flat, likelihood, step, &[1.0])
        .with_config(SamplerConfig::default().verbose(2).show_stats(2))
        .with_uniform_source(Replay(uniforms, 0));
    sampler.add_stat("loglikelihood");
    sampler.add_stat("accept_ratio");

    sampler.run(&[0.0], &RunParams::new(5)).unwrap();

    assert_eq!(sampler.samples().column(0).to_vec(), vec![0.0, 1.0, 1.0, 2.0, 2.0]);
    assert_eq!(
        sampler.stat(StatKind::LogLikelihood).unwrap().column(0).to_vec(),
        vec![0.0, -1.0, -1.0, -4.0, -4.0]
    );
    assert_eq!(
        sampler.stat(StatKind::AcceptRatio).unwrap().column(0).to_vec(),
        vec![0.0, 0.5, 1.0 / 3.0, 0.5, 0.4]
    );
}

#[test]
fn recorded_loglike_matches_recorded_samples() {
    init_logging();
    let likelihood = IsotropicGaussian::new(vec![0.5, -0.5, 2.0], 0.7);
    let prior = BoxPrior::new(vec![-3.0; 3], vec![3.0; 3]);
    let proposal = SingleSiteGaussian::new().set_seed(11);
    let mut sampler =
        ComponentMetropolis::new(prior, likelihood.clone(), proposal, &[0.5; 3]).set_seed(11);
    for kind in StatKind::ALL {
        sampler.add_stat_kind(kind);
    }
    let params = RunParams::new(5_000).tune(2_000).tune_interval(100);
    sampler.run(&[0.0; 3], &params).unwrap();

    let samples = sampler.samples();
    let loglikes = sampler.stat(StatKind::LogLikelihood).unwrap();
    for (row, ll) in samples.rows().into_iter().zip(loglikes.column(0)) {
        let x = row.to_vec();
        assert_eq!(likelihood.log_likelihood(&x), *ll);
        assert!(x.iter().all(|v| (-3.0..=3.0).contains(v)));
    }

    // Single-site proposals always move one coordinate, so a sample that differs
    // from its predecessor marks an accepted iteration.
    let ratios = sampler.stat(StatKind::AcceptRatio).unwrap();
    let mut accepted = 0usize;
    let mut previous = vec![0.0; 3];
    for (i, row) in samples.rows().into_iter().enumerate() {
        let x = row.to_vec();
        if x != previous {
            accepted += 1;
        }
        previous = x;
        assert_eq!(ratios[[i, 0]], accepted as f64 / (i + 1) as f64);
    }
    assert_eq!(accepted, sampler.n_accepted());

    let per_var = sampler.stat(StatKind::ParameterAcceptRatio).unwrap();
    assert!(per_var.iter().all(|r| (0.0..=1.0).contains(r)));
    let scales = sampler.stat(StatKind::ProposalScale).unwrap();
    assert!(scales.iter().all(|&s| s > 0.0));
}

#[test]
fn rerun_after_reset_reallocates_outputs() {
    init_logging();
    let likelihood = IsotropicGaussian::new(vec![0.0], 1.0);
    let proposal = SingleSiteGaussian::new().set_seed(5);
    let mut sampler = ComponentMetropolis::new(
        |_: &[f32]| 0.0_f32,
        |x: &[f32]| likelihood_f32(&likelihood, x),
        proposal,
        &[0.01_f32],
    )
    .set_seed(5);
    sampler.add_stat("prop_S");

    sampler
        .run(&[0.0], &RunParams::new(1_000).tune(1_000).tune_interval(100))
        .unwrap();
    assert_eq!(sampler.samples().nrows(), 1_000);
    assert!(sampler.prop_s()[0] > 0.01);

    sampler.reset();
    assert_eq!(sampler.prop_s(), &[0.01_f32]);
    sampler.run(&[0.0], &RunParams::new(300).thin(3)).unwrap();
    assert_eq!(sampler.samples().nrows(), 100);
    assert_eq!(sampler.stat(StatKind::ProposalScale).unwrap().nrows(), 100);
    assert!(sampler
        .stat(StatKind::ProposalScale)
        .unwrap()
        .iter()
        .all(|&s| (s - 0.01).abs() < 1e-6));
    assert!(sampler.duration().as_nanos() > 0);
}

fn likelihood_f32(likelihood: &IsotropicGaussian<f64>, x: &[f32]) -> f32 {
    let x: Vec<f64> = x.iter().map(|&v| v as f64).collect();
    likelihood.log_likelihood(&x) as f32
}
