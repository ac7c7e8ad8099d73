//! A single-chain, component-wise Metropolis–Hastings sampler that tracks
//! per-variable acceptance over a rolling window and tunes its proposal scales.
//!
//! Start with [`metropolis::ComponentMetropolis`].

pub mod config;
pub mod distributions;
pub mod error;
pub mod io;
pub mod metropolis;
pub mod samples;
pub mod stats;
pub mod tuning;
pub mod window;
