/*!
Collaborator traits for the sampler and a few stock implementations.

The sampler never looks inside the densities it is handed: it only calls
[`LogPrior::log_prior`], [`LogLikelihood::log_likelihood`] and
[`Proposal::propose`], and draws acceptance variates from a [`UniformSource`].
Plain closures implement the first three traits, which is usually all a model
needs.

# Examples

```rust
use adaptive_metropolis::distributions::{
    BoxPrior, IsotropicGaussian, LogLikelihood, LogPrior, Proposal, SingleSiteGaussian,
};

let prior = BoxPrior::new(vec![-1.0, -1.0], vec![1.0, 1.0]);
assert_eq!(prior.log_prior(&[0.5, 0.0]), 0.0);
assert_eq!(prior.log_prior(&[2.0, 0.0]), f64::NEG_INFINITY);

let likelihood = IsotropicGaussian::new(vec![0.0, 0.0], 1.0);
assert_eq!(likelihood.log_likelihood(&[0.0, 0.0]), 0.0);

let mut proposal = SingleSiteGaussian::new().set_seed(7);
let candidate = proposal.propose(&[0.0, 0.0], &[1.0, 1.0]);
let changed = candidate.iter().filter(|&&c| c != 0.0).count();
assert!(changed <= 1);
```
*/

use num_traits::Float;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Standard, StandardNormal};

/// Log prior density, up to an additive constant.
///
/// Returning negative infinity marks an infeasible point; the likelihood is then
/// never evaluated there. Positive infinity is not a valid return value.
pub trait LogPrior<T> {
    fn log_prior(&self, x: &[T]) -> T;
}

/// Log likelihood, up to an additive constant.
pub trait LogLikelihood<T> {
    fn log_likelihood(&self, x: &[T]) -> T;
}

/// Generates a candidate from the current position and per-variable scales.
///
/// Candidates are expected to differ from `current` in only a few coordinates;
/// the sampler attributes acceptance to exactly the coordinates that changed.
pub trait Proposal<T> {
    fn propose(&mut self, current: &[T], scale: &[T]) -> Vec<T>;
}

/// Source of the uniform variates used in the acceptance test.
pub trait UniformSource<T> {
    /// Returns a value in `[0, 1)`.
    fn next_uniform(&mut self) -> T;
}

impl<T, F> LogPrior<T> for F
where
    F: Fn(&[T]) -> T,
{
    fn log_prior(&self, x: &[T]) -> T {
        self(x)
    }
}

impl<T, F> LogLikelihood<T> for F
where
    F: Fn(&[T]) -> T,
{
    fn log_likelihood(&self, x: &[T]) -> T {
        self(x)
    }
}

impl<T, F> Proposal<T> for F
where
    F: FnMut(&[T], &[T]) -> Vec<T>,
{
    fn propose(&mut self, current: &[T], scale: &[T]) -> Vec<T> {
        self(current, scale)
    }
}

impl<T> UniformSource<T> for SmallRng
where
    Standard: Distribution<T>,
{
    fn next_uniform(&mut self) -> T {
        self.gen()
    }
}

/// An improper prior, constant over the whole space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatPrior;

impl<T: Float> LogPrior<T> for FlatPrior {
    fn log_prior(&self, _x: &[T]) -> T {
        T::zero()
    }
}

/**
A uniform prior over an axis-aligned box, bounds included.

Points outside the box, or with a NaN coordinate, get a log-density of negative
infinity.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPrior<T: Float> {
    pub lower: Vec<T>,
    pub upper: Vec<T>,
}

impl<T: Float> BoxPrior<T> {
    pub fn new(lower: Vec<T>, upper: Vec<T>) -> Self {
        Self { lower, upper }
    }
}

impl<T: Float> LogPrior<T> for BoxPrior<T> {
    fn log_prior(&self, x: &[T]) -> T {
        let inside = x
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&v, (&lo, &hi))| v >= lo && v <= hi);
        if inside {
            T::zero()
        } else {
            T::neg_infinity()
        }
    }
}

/**
An isotropic Gaussian likelihood, unnormalized.

`log L(x) = -0.5 * sum_i (x_i - mean_i)^2 / std^2`
*/
#[derive(Debug, Clone, PartialEq)]
pub struct IsotropicGaussian<T: Float> {
    pub mean: Vec<T>,
    pub std: T,
}

impl<T: Float> IsotropicGaussian<T> {
    pub fn new(mean: Vec<T>, std: T) -> Self {
        Self { mean, std }
    }
}

impl<T: Float> LogLikelihood<T> for IsotropicGaussian<T> {
    fn log_likelihood(&self, x: &[T]) -> T {
        let mut sum = T::zero();
        for (&v, &m) in x.iter().zip(&self.mean) {
            let diff = v - m;
            sum = sum + diff * diff;
        }
        let half = T::one() / (T::one() + T::one());
        -half * sum / (self.std * self.std)
    }
}

/**
Perturbs a single, uniformly chosen coordinate with Gaussian noise.

Coordinate `j` moves by a draw from `N(0, scale[j])`; every other coordinate is
copied unchanged. A scale that is not a valid standard deviation (negative or
NaN) leaves the candidate equal to the current point.
*/
#[derive(Debug, Clone)]
pub struct SingleSiteGaussian {
    rng: SmallRng,
}

impl Default for SingleSiteGaussian {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleSiteGaussian {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Returns this proposal reseeded with `seed`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<T> Proposal<T> for SingleSiteGaussian
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    fn propose(&mut self, current: &[T], scale: &[T]) -> Vec<T> {
        let mut candidate = current.to_vec();
        if candidate.is_empty() {
            return candidate;
        }
        let j = self.rng.gen_range(0..candidate.len());
        if let Ok(normal) = Normal::new(T::zero(), scale[j]) {
            candidate[j] = candidate[j] + normal.sample(&mut self.rng);
        }
        candidate
    }
}
