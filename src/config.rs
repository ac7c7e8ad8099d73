/*!
Configuration for the sampler and for a single run.

[`SamplerConfig`] carries the settings that outlive a run (dimension check,
verbosity, reporting cadence), while [`RunParams`] describes one call to
[`ComponentMetropolis::run`](crate::metropolis::ComponentMetropolis::run).
Both are plain structs with defaults and consuming setters.

# Examples

```rust
use adaptive_metropolis::config::RunParams;

let params = RunParams::new(10_000)
    .tune(2_000)
    .tune_interval(100)
    .discard_tuned_samples(true)
    .thin(4);
assert!(params.validate().is_ok());
assert_eq!(params.n_samples(), 2_000);
```
*/

use crate::error::SamplerError;

/// Settings shared by every run of a sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Expected dimension. `None` takes it from the starting point.
    pub n_vars: Option<usize>,
    /// 0 is quiet, 1 reports tuning events, 2 and above traces every iteration.
    pub verbose: u8,
    /// Iteration period of the stats report; 0 disables it.
    pub show_stats: usize,
    /// Draw a progress bar over the iterations of a run.
    pub show_progress: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_vars: None,
            verbose: 0,
            show_stats: 10_000,
            show_progress: false,
        }
    }
}

impl SamplerConfig {
    pub fn n_vars(mut self, n_vars: usize) -> Self {
        self.n_vars = Some(n_vars);
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn show_stats(mut self, show_stats: usize) -> Self {
        self.show_stats = show_stats;
        self
    }

    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Total number of iterations.
    pub n: usize,
    /// Number of leading iterations during which the proposal scale may be tuned.
    pub tune: usize,
    /// Period, in iterations, between two tuning attempts. Also the depth of the
    /// acceptance window.
    pub tune_interval: usize,
    /// Leave the tuning phase out of the saved samples.
    pub discard_tuned_samples: bool,
    /// Keep one iteration out of every `thin`.
    pub thin: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            n: 1,
            tune: 0,
            tune_interval: 1000,
            discard_tuned_samples: false,
            thin: 1,
        }
    }
}

impl RunParams {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    pub fn tune(mut self, tune: usize) -> Self {
        self.tune = tune;
        self
    }

    pub fn tune_interval(mut self, tune_interval: usize) -> Self {
        self.tune_interval = tune_interval;
        self
    }

    pub fn discard_tuned_samples(mut self, discard: bool) -> Self {
        self.discard_tuned_samples = discard;
        self
    }

    pub fn thin(mut self, thin: usize) -> Self {
        self.thin = thin;
        self
    }

    /// Checks the ranges a run relies on.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.n == 0 {
            return Err(SamplerError::invalid("n", "at least one iteration is required"));
        }
        if self.thin == 0 {
            return Err(SamplerError::invalid("thin", "must be at least 1"));
        }
        if self.tune_interval == 0 {
            return Err(SamplerError::invalid("tune_interval", "must be at least 1"));
        }
        if self.tune > self.n {
            return Err(SamplerError::invalid(
                "tune",
                format!("{} exceeds the number of iterations {}", self.tune, self.n),
            ));
        }
        Ok(())
    }

    /// Iterations that precede the first saved row.
    fn save_offset(&self) -> usize {
        if self.discard_tuned_samples {
            self.tune
        } else {
            0
        }
    }

    /// Number of rows in the sample and stats tables.
    pub fn n_samples(&self) -> usize {
        (self.n - self.save_offset()) / self.thin
    }

    /// Output row written at 1-based iteration `iter`, if that iteration is saved.
    pub fn save_row(&self, iter: usize) -> Option<usize> {
        let offset = self.save_offset();
        if iter <= offset {
            return None;
        }
        let kept = iter - offset;
        if kept % self.thin == 0 {
            Some(kept / self.thin - 1)
        } else {
            None
        }
    }

    /// Whether tuning fires at the end of 1-based iteration `iter`.
    pub fn tunes_at(&self, iter: usize) -> bool {
        iter % self.tune_interval == 0 && iter < self.tune
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_samples_floors_and_honours_discard() {
        assert_eq!(RunParams::new(10).n_samples(), 10);
        assert_eq!(RunParams::new(10).thin(3).n_samples(), 3);
        assert_eq!(RunParams::new(10).tune(4).thin(3).n_samples(), 3);
        assert_eq!(
            RunParams::new(10)
                .tune(4)
                .discard_tuned_samples(true)
                .thin(3)
                .n_samples(),
            2
        );
        assert_eq!(
            RunParams::new(5)
                .tune(5)
                .discard_tuned_samples(true)
                .n_samples(),
            0
        );
    }

    #[test]
    fn save_rows_cover_every_row_exactly_once() {
        let cases = [
            RunParams::new(17).thin(1),
            RunParams::new(17).thin(4),
            RunParams::new(17).tune(5).thin(3),
            RunParams::new(17).tune(5).discard_tuned_samples(true).thin(3),
            RunParams::new(3).thin(5),
        ];
        for params in cases {
            let rows: Vec<usize> = (1..=params.n).filter_map(|i| params.save_row(i)).collect();
            let expected: Vec<usize> = (0..params.n_samples()).collect();
            assert_eq!(rows, expected, "params: {params:?}");
        }
    }

    #[test]
    fn discarded_iterations_are_never_saved() {
        let params = RunParams::new(20).tune(8).discard_tuned_samples(true).thin(2);
        assert!((1..=8).all(|i| params.save_row(i).is_none()));
        assert_eq!(params.save_row(10), Some(0));
        assert_eq!(params.save_row(20), Some(5));
    }

    #[test]
    fn tuning_fires_only_inside_horizon() {
        let params = RunParams::new(100).tune(30).tune_interval(10);
        let fired: Vec<usize> = (1..=100).filter(|&i| params.tunes_at(i)).collect();
        assert_eq!(fired, vec![10, 20]);

        let params = RunParams::new(100).tune(0).tune_interval(1);
        assert!((1..=100).all(|i| !params.tunes_at(i)));
    }

    #[test]
    fn validate_rejects_degenerate_runs() {
        assert!(RunParams::new(0).validate().is_err());
        assert!(RunParams::new(10).thin(0).validate().is_err());
        assert!(RunParams::new(10).tune_interval(0).validate().is_err());
        assert!(RunParams::new(10).tune(11).validate().is_err());
        assert!(RunParams::new(10).tune(10).validate().is_ok());
    }

    #[test]
    fn sampler_config_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.n_vars, None);
        assert_eq!(config.verbose, 0);
        assert_eq!(config.show_stats, 10_000);
        assert!(!config.show_progress);

        let config = config.n_vars(3).verbose(2).show_stats(0).show_progress(true);
        assert_eq!(config.n_vars, Some(3));
        assert_eq!(config.verbose, 2);
        assert_eq!(config.show_stats, 0);
        assert!(config.show_progress);
    }
}
