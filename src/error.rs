//! Error type shared by the sampler, its configuration and the I/O helpers.

use thiserror::Error;

/// Everything that can stop a run before it starts.
///
/// Numeric faults coming from the prior, likelihood or proposal are never
/// reported here: they flow into the acceptance test untouched.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// A run parameter is outside of its admissible range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Two buffers that must agree in length do not.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A stat name outside of the recognized catalog.
    #[error("unknown stat `{0}`, expected one of: loglikelihood, accept_ratio, prop_S, parameter_accept_ratio")]
    UnknownStat(String),

    /// The progress bar template failed to parse.
    #[error("progress bar template: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    #[cfg(feature = "csv")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl SamplerError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
