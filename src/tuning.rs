//! Proposal scale adaptation.
//!
//! The multipliers follow the pymc3 Metropolis tuning table:
//!
//! | acceptance ratio | scale multiplier |
//! |------------------|------------------|
//! | < 0.001          | x 0.1            |
//! | < 0.05           | x 0.5            |
//! | < 0.2            | x 0.9            |
//! | > 0.95           | x 10             |
//! | > 0.75           | x 2              |
//! | > 0.5            | x 1.1            |
//!
//! Rows are tested top to bottom and the first match wins.

use num_traits::Float;

/// Multiplier applied to a proposal scale whose recent acceptance ratio is `ratio`.
///
/// A ratio in `[0.2, 0.5]` (or NaN) leaves the scale unchanged.
pub fn scale_factor(ratio: f64) -> f64 {
    if ratio < 0.001 {
        0.1
    } else if ratio < 0.05 {
        0.5
    } else if ratio < 0.2 {
        0.9
    } else if ratio > 0.95 {
        10.0
    } else if ratio > 0.75 {
        2.0
    } else if ratio > 0.5 {
        1.1
    } else {
        1.0
    }
}

/// Rescales every proposal scale from its variable's acceptance ratio.
pub fn tune<T: Float>(scale: &mut [T], ratios: &[f64]) {
    for (s, &ratio) in scale.iter_mut().zip(ratios) {
        let factor = scale_factor(ratio);
        if factor != 1.0 {
            if let Some(factor) = T::from(factor) {
                *s = *s * factor;
            }
        }
    }
}
