/*!
# Component-wise Metropolis–Hastings with adaptive proposal scales

[`ComponentMetropolis`] drives a single chain whose proposal moves one (or a few)
coordinates at a time. For every iteration it

1. asks the [`Proposal`] for a candidate and notes which coordinates changed,
2. evaluates the [`LogPrior`] at the candidate and, unless the prior is
   negative infinity, the [`LogLikelihood`],
3. accepts iff `ln(u) < (log p(x') + log L(x')) - (log p(x) + log L(x))`,
4. updates the rolling per-variable acceptance window and the global ratio,
5. tunes the proposal scales every `tune_interval` iterations while inside the
   tuning horizon,
6. saves the position and the registered stats at thinning points.

## Example Usage

```rust
use adaptive_metropolis::config::RunParams;
use adaptive_metropolis::distributions::{FlatPrior, IsotropicGaussian, SingleSiteGaussian};
use adaptive_metropolis::metropolis::ComponentMetropolis;
use adaptive_metropolis::stats::StatKind;

let likelihood = IsotropicGaussian::new(vec![0.0, 0.0], 1.0);
let proposal = SingleSiteGaussian::new().set_seed(42);
let mut sampler =
    ComponentMetropolis::new(FlatPrior, likelihood, proposal, &[0.5, 0.5]).set_seed(42);

assert!(sampler.add_stat("prop_S"));
assert!(!sampler.add_stat("not_a_stat"));

let params = RunParams::new(5_000).tune(2_000).tune_interval(100);
sampler.run(&[3.0, -3.0], &params).unwrap();

assert_eq!(sampler.samples().nrows(), 5_000);
assert_eq!(sampler.stat(StatKind::ProposalScale).unwrap().dim(), (5_000, 2));
```
*/

use std::fmt;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace, warn};
use ndarray::Array2;
use num_traits::Float;
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};

use crate::config::{RunParams, SamplerConfig};
use crate::distributions::{LogLikelihood, LogPrior, Proposal, UniformSource};
use crate::error::SamplerError;
use crate::samples::SampleStore;
use crate::stats::{ChainSnapshot, StatKind, StatsRecorder};
use crate::tuning;
use crate::window::AcceptanceWindow;

/// Position of the chain and the densities evaluated there.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState<T> {
    pub x: Vec<T>,
    pub loglike: T,
    pub logprior: T,
}

/**
A single Metropolis–Hastings chain with per-variable proposal scales.

# Type Parameters
- `T`: the floating-point type of the state (`f32` or `f64`).
- `P`: the prior, see [`LogPrior`].
- `L`: the likelihood, see [`LogLikelihood`].
- `Q`: the proposal, see [`Proposal`].
- `R`: the source of acceptance variates, [`SmallRng`] unless replaced with
  [`with_uniform_source`](Self::with_uniform_source).

Results of the last run stay available through the accessors until the next
run reallocates them. The proposal scales carry over from one run to the next;
call [`reset`](Self::reset) to go back to the scales given at construction.
*/
pub struct ComponentMetropolis<T, P, L, Q, R = SmallRng> {
    pub prior: P,
    pub likelihood: L,
    pub proposal: Q,
    pub config: SamplerConfig,
    /// Seed of the acceptance generator.
    pub seed: u64,
    rng: R,

    init_prop_s: Vec<T>,
    prop_s: Vec<T>,

    state: ChainState<T>,
    window: AcceptanceWindow,
    changed: Vec<usize>,
    accept_ratios: Vec<f64>,
    global_accept_ratio: f64,
    n_accepted: usize,
    n_tunes: usize,
    /// 1-based index of the iteration in progress.
    current_iter: usize,

    n_samples: usize,
    samples: SampleStore<T>,
    stats: StatsRecorder<T>,
    duration: Duration,
}

impl<T, P, L, Q, R> fmt::Debug for ComponentMetropolis<T, P, L, Q, R>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMetropolis")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("prop_s", &self.prop_s)
            .field("state", &self.state)
            .field("n_accepted", &self.n_accepted)
            .field("n_samples", &self.n_samples)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T, P, L, Q> ComponentMetropolis<T, P, L, Q, SmallRng>
where
    T: Float,
{
    /**
    Creates a sampler with the given collaborators and initial proposal scales.

    # Arguments

    * `prior` - Log prior density.
    * `likelihood` - Log likelihood.
    * `proposal` - Candidate generator.
    * `prop_s` - Initial proposal scale of every variable.
    */
    pub fn new(prior: P, likelihood: L, proposal: Q, prop_s: &[T]) -> Self {
        let seed = thread_rng().gen::<u64>();
        Self {
            prior,
            likelihood,
            proposal,
            config: SamplerConfig::default(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            init_prop_s: prop_s.to_vec(),
            prop_s: prop_s.to_vec(),
            state: ChainState {
                x: Vec::new(),
                loglike: T::neg_infinity(),
                logprior: T::neg_infinity(),
            },
            window: AcceptanceWindow::new(1, 0),
            changed: Vec::new(),
            accept_ratios: Vec::new(),
            global_accept_ratio: 0.0,
            n_accepted: 0,
            n_tunes: 0,
            current_iter: 1,
            n_samples: 0,
            samples: SampleStore::default(),
            stats: StatsRecorder::new(),
            duration: Duration::ZERO,
        }
    }

    /// Reseeds the acceptance generator.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<T, P, L, Q, R> ComponentMetropolis<T, P, L, Q, R>
where
    T: Float,
{
    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the source of acceptance variates.
    pub fn with_uniform_source<R2>(self, rng: R2) -> ComponentMetropolis<T, P, L, Q, R2> {
        ComponentMetropolis {
            prior: self.prior,
            likelihood: self.likelihood,
            proposal: self.proposal,
            config: self.config,
            seed: self.seed,
            rng,
            init_prop_s: self.init_prop_s,
            prop_s: self.prop_s,
            state: self.state,
            window: self.window,
            changed: self.changed,
            accept_ratios: self.accept_ratios,
            global_accept_ratio: self.global_accept_ratio,
            n_accepted: self.n_accepted,
            n_tunes: self.n_tunes,
            current_iter: self.current_iter,
            n_samples: self.n_samples,
            samples: self.samples,
            stats: self.stats,
            duration: self.duration,
        }
    }

    /// Registers a stat by catalog name.
    ///
    /// An unknown name is reported with a warning and otherwise ignored; the
    /// return value tells whether `name` is now registered.
    pub fn add_stat(&mut self, name: &str) -> bool {
        match name.parse::<StatKind>() {
            Ok(kind) => {
                self.stats.register(kind);
                true
            }
            Err(err) => {
                warn!("{err}; the stat is not recorded");
                false
            }
        }
    }

    /// Registers a stat. Returns `false` if it was already registered.
    pub fn add_stat_kind(&mut self, kind: StatKind) -> bool {
        self.stats.register(kind)
    }

    /// Prepares the sampler for a fresh start. Equivalent to [`reset`](Self::reset).
    pub fn initialize(&mut self) {
        self.reset();
    }

    /// Restores the proposal scales given at construction.
    pub fn reset(&mut self) {
        self.prop_s.clone_from(&self.init_prop_s);
    }

    /// Sizes every per-run buffer for `x0` and `params` and rewinds the counters.
    fn initialize_arrays(&mut self, x0: &[T], params: &RunParams) -> Result<(), SamplerError> {
        let n_vars = x0.len();
        if let Some(expected) = self.config.n_vars {
            if expected != n_vars {
                return Err(SamplerError::DimensionMismatch {
                    what: "starting point",
                    expected,
                    found: n_vars,
                });
            }
        }
        if self.prop_s.len() != n_vars {
            return Err(SamplerError::DimensionMismatch {
                what: "prop_S",
                expected: n_vars,
                found: self.prop_s.len(),
            });
        }

        self.n_samples = params.n_samples();
        self.samples = SampleStore::new(self.n_samples, n_vars);
        self.stats.allocate(self.n_samples, n_vars);

        self.window = AcceptanceWindow::new(params.tune_interval, n_vars);
        self.changed = Vec::with_capacity(n_vars);
        self.accept_ratios = vec![0.0; n_vars];
        self.global_accept_ratio = 0.0;
        self.n_accepted = 0;
        self.n_tunes = 0;
        self.current_iter = 1;
        Ok(())
    }

    pub fn n_vars(&self) -> usize {
        self.state.x.len()
    }

    /// Rows in the sample and stats tables of the last run.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn samples(&self) -> &Array2<T> {
        self.samples.table()
    }

    pub fn stats(&self) -> &StatsRecorder<T> {
        &self.stats
    }

    pub fn stat(&self, kind: StatKind) -> Option<&Array2<f64>> {
        self.stats.get(kind)
    }

    /// Wall-clock duration of the last run.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn prop_s(&self) -> &[T] {
        &self.prop_s
    }

    pub fn initial_prop_s(&self) -> &[T] {
        &self.init_prop_s
    }

    /// Windowed acceptance ratio of every variable.
    pub fn accept_ratios(&self) -> &[f64] {
        &self.accept_ratios
    }

    /// Accepted moves over completed iterations.
    pub fn global_accept_ratio(&self) -> f64 {
        self.global_accept_ratio
    }

    pub fn n_accepted(&self) -> usize {
        self.n_accepted
    }

    /// Number of times the proposal scales were tuned during the last run.
    pub fn n_tunes(&self) -> usize {
        self.n_tunes
    }

    /// Completed iterations of the last run.
    pub fn iterations(&self) -> usize {
        self.current_iter - 1
    }

    pub fn chain_state(&self) -> &ChainState<T> {
        &self.state
    }

    pub fn current_state(&self) -> &[T] {
        &self.state.x
    }

    pub fn current_loglike(&self) -> T {
        self.state.loglike
    }

    pub fn current_logprior(&self) -> T {
        self.state.logprior
    }

    pub fn window(&self) -> &AcceptanceWindow {
        &self.window
    }

    fn snapshot(&self) -> ChainSnapshot<'_, T> {
        ChainSnapshot {
            loglike: self.state.loglike,
            accept_ratio: self.global_accept_ratio,
            prop_s: &self.prop_s,
            accept_ratios: &self.accept_ratios,
        }
    }
}

impl<T, P, L, Q, R> ComponentMetropolis<T, P, L, Q, R>
where
    T: Float + fmt::Debug,
    P: LogPrior<T>,
    L: LogLikelihood<T>,
    Q: Proposal<T>,
    R: UniformSource<T>,
{
    /**
    Runs the chain for `params.n` iterations starting from a copy of `x0`.

    Sample and stats tables are reallocated to `params.n_samples()` rows before the
    first iteration. Errors are only returned for inconsistent parameters or
    dimensions, before any iteration runs, or when the proposal returns a
    candidate of the wrong length.
    */
    pub fn run(&mut self, x0: &[T], params: &RunParams) -> Result<(), SamplerError> {
        let start = Instant::now();
        params.validate()?;
        self.initialize_arrays(x0, params)?;

        info!(
            "Start component-wise Metropolis: {} iterations, {} saved samples",
            params.n, self.n_samples
        );

        self.state.x = x0.to_vec();
        self.state.loglike = self.likelihood.log_likelihood(&self.state.x);
        self.state.logprior = self.prior.log_prior(&self.state.x);
        if self.config.verbose > 1 {
            debug!("Starting log-likelihood: {:?}", self.state.loglike);
        }

        let pb = if self.config.show_progress {
            let pb = ProgressBar::new(params.n as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
                    .progress_chars("##-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        for _ in 0..params.n {
            self.iterate(params)?;
            pb.inc(1);
        }
        pb.finish_with_message("Done!");

        self.duration = start.elapsed();
        info!(
            "Finished in {:.2?}, global acceptance ratio {:.4}",
            self.duration, self.global_accept_ratio
        );
        Ok(())
    }

    fn iterate(&mut self, params: &RunParams) -> Result<(), SamplerError> {
        let iter = self.current_iter;
        let verbose = self.config.verbose;
        if verbose > 1 {
            debug!("Iteration {iter}");
        }

        let candidate = self.proposal.propose(&self.state.x, &self.prop_s);
        if candidate.len() != self.state.x.len() {
            return Err(SamplerError::DimensionMismatch {
                what: "proposed candidate",
                expected: self.state.x.len(),
                found: candidate.len(),
            });
        }

        self.window.advance();
        self.changed.clear();
        for (j, (new, old)) in candidate.iter().zip(&self.state.x).enumerate() {
            if new != old {
                self.changed.push(j);
                self.window.mark_proposed(j);
            }
        }
        if verbose > 1 {
            trace!("Modified parameters {:?}, candidate {:?}", self.changed, candidate);
        }

        let cand_logprior = self.prior.log_prior(&candidate);
        let cand_loglike = if cand_logprior == T::neg_infinity() {
            if verbose > 1 {
                trace!("Prior is -inf, likelihood not evaluated");
            }
            T::neg_infinity()
        } else {
            self.likelihood.log_likelihood(&candidate)
        };

        let u: T = self.rng.next_uniform();
        let log_alpha =
            (cand_logprior + cand_loglike) - (self.state.logprior + self.state.loglike);
        if verbose > 1 {
            trace!(
                "loglike {:?} -> {:?}, logprior {:?} -> {:?}, ln(u) = {:?}",
                self.state.loglike,
                cand_loglike,
                self.state.logprior,
                cand_logprior,
                u.ln()
            );
        }

        // A NaN on either side compares false and rejects.
        if u.ln() < log_alpha {
            self.state.x = candidate;
            self.state.loglike = cand_loglike;
            self.state.logprior = cand_logprior;
            self.n_accepted += 1;
            for &j in &self.changed {
                self.window.mark_accepted(j);
            }
            if verbose > 1 {
                debug!("Accept iteration {iter}");
            }
        }

        self.window.update_ratios(&mut self.accept_ratios);
        self.global_accept_ratio = self.n_accepted as f64 / iter as f64;

        if params.tunes_at(iter) {
            tuning::tune(&mut self.prop_s, &self.accept_ratios);
            self.n_tunes += 1;
            if verbose > 0 {
                info!(
                    "Tuned proposal scales at iteration {iter}: {:.2?}",
                    self.prop_s
                );
            }
        }

        if self.config.show_stats != 0 && iter % self.config.show_stats == 0 {
            info!(
                "MCMC stats at iteration {iter}\n{}",
                self.stats.summary(&self.snapshot())
            );
            if verbose > 1 {
                debug!(
                    "Position {:?}, per-variable acceptance {:?}",
                    self.state.x, self.accept_ratios
                );
            }
        }

        if let Some(row) = params.save_row(iter) {
            self.samples.record(row, &self.state.x);
            let snapshot = ChainSnapshot {
                loglike: self.state.loglike,
                accept_ratio: self.global_accept_ratio,
                prop_s: &self.prop_s,
                accept_ratios: &self.accept_ratios,
            };
            self.stats.record(row, &snapshot);
        }

        self.current_iter += 1;
        Ok(())
    }
}
