//! Recording of chain statistics alongside the saved samples.
//!
//! A caller registers a subset of the [`StatKind`] catalog. Each registered stat
//! owns an `(n_samples, width)` table that receives a copy of the live value at
//! every save point, so row `k` of every table lines up with row `k` of the
//! sample table.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayViewMut1};
use ndarray_stats::QuantileExt;
use num_traits::Float;

use crate::error::SamplerError;

/// The recognized statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKind {
    /// Log-likelihood of the current position (scalar).
    LogLikelihood,
    /// Accepted moves over iterations since the start of the run (scalar).
    AcceptRatio,
    /// Proposal scale of every variable.
    ProposalScale,
    /// Windowed acceptance ratio of every variable.
    ParameterAcceptRatio,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::LogLikelihood,
        StatKind::AcceptRatio,
        StatKind::ProposalScale,
        StatKind::ParameterAcceptRatio,
    ];

    /// Catalog name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            StatKind::LogLikelihood => "loglikelihood",
            StatKind::AcceptRatio => "accept_ratio",
            StatKind::ProposalScale => "prop_S",
            StatKind::ParameterAcceptRatio => "parameter_accept_ratio",
        }
    }

    pub fn is_scalar(self) -> bool {
        matches!(self, StatKind::LogLikelihood | StatKind::AcceptRatio)
    }

    /// Number of columns of the stat's table.
    pub fn width(self, n_vars: usize) -> usize {
        if self.is_scalar() {
            1
        } else {
            n_vars
        }
    }

    fn accessor<T: Float>(self) -> Accessor<T> {
        match self {
            StatKind::LogLikelihood => write_loglike::<T>,
            StatKind::AcceptRatio => write_accept_ratio::<T>,
            StatKind::ProposalScale => write_prop_s::<T>,
            StatKind::ParameterAcceptRatio => write_accept_ratios::<T>,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SamplerError::UnknownStat(s.to_string()))
    }
}

/// Borrowed view of the chain quantities a stat can be read from.
#[derive(Debug, Clone, Copy)]
pub struct ChainSnapshot<'a, T> {
    pub loglike: T,
    pub accept_ratio: f64,
    pub prop_s: &'a [T],
    pub accept_ratios: &'a [f64],
}

type Accessor<T> = fn(&ChainSnapshot<'_, T>, ArrayViewMut1<'_, f64>);

fn to_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

fn write_loglike<T: Float>(snapshot: &ChainSnapshot<'_, T>, mut row: ArrayViewMut1<'_, f64>) {
    row[0] = to_f64(snapshot.loglike);
}

fn write_accept_ratio<T: Float>(snapshot: &ChainSnapshot<'_, T>, mut row: ArrayViewMut1<'_, f64>) {
    row[0] = snapshot.accept_ratio;
}

fn write_prop_s<T: Float>(snapshot: &ChainSnapshot<'_, T>, mut row: ArrayViewMut1<'_, f64>) {
    for (dst, &src) in row.iter_mut().zip(snapshot.prop_s) {
        *dst = to_f64(src);
    }
}

fn write_accept_ratios<T: Float>(
    snapshot: &ChainSnapshot<'_, T>,
    mut row: ArrayViewMut1<'_, f64>,
) {
    for (dst, &src) in row.iter_mut().zip(snapshot.accept_ratios) {
        *dst = src;
    }
}

#[derive(Clone)]
struct Entry<T> {
    kind: StatKind,
    accessor: Accessor<T>,
    table: Array2<f64>,
}

/// Registered stats and their output tables.
#[derive(Clone)]
pub struct StatsRecorder<T> {
    entries: Vec<Entry<T>>,
}

impl<T> fmt::Debug for StatsRecorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.kind, e.table.dim())))
            .finish()
    }
}

impl<T: Float> Default for StatsRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> StatsRecorder<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `kind`. Returns `false` if it was already registered.
    pub fn register(&mut self, kind: StatKind) -> bool {
        if self.entries.iter().any(|e| e.kind == kind) {
            return false;
        }
        self.entries.push(Entry {
            kind,
            accessor: kind.accessor::<T>(),
            table: Array2::zeros((0, 0)),
        });
        true
    }

    /// Registered stats in registration order.
    pub fn registered(&self) -> impl Iterator<Item = StatKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every table with a zeroed `(n_samples, width)` one.
    pub fn allocate(&mut self, n_samples: usize, n_vars: usize) {
        for entry in &mut self.entries {
            entry.table = Array2::zeros((n_samples, entry.kind.width(n_vars)));
        }
    }

    /// Copies the live value of every registered stat into row `row`.
    pub fn record(&mut self, row: usize, snapshot: &ChainSnapshot<'_, T>) {
        for entry in &mut self.entries {
            (entry.accessor)(snapshot, entry.table.row_mut(row));
        }
    }

    pub fn get(&self, kind: StatKind) -> Option<&Array2<f64>> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| &e.table)
    }

    /// Looks a table up by catalog name. Unknown or unregistered names give `None`.
    pub fn get_by_name(&self, name: &str) -> Option<&Array2<f64>> {
        name.parse().ok().and_then(|kind| self.get(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &Array2<f64>)> {
        self.entries.iter().map(|e| (e.kind, &e.table))
    }

    /// One line per registered stat describing its live value.
    pub fn summary(&self, snapshot: &ChainSnapshot<'_, T>) -> String {
        let n_vars = snapshot.prop_s.len();
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let mut value = Array1::<f64>::zeros(entry.kind.width(n_vars));
            (entry.accessor)(snapshot, value.view_mut());
            let line = if entry.kind.is_scalar() {
                format!("{}: {:.6}", entry.kind, value[0])
            } else {
                match (value.min(), value.max()) {
                    (Ok(min), Ok(max)) => {
                        format!("{}: {:.4} (min {:.4}, max {:.4})", entry.kind, value, min, max)
                    }
                    _ => format!("{}: {:.4}", entry.kind, value),
                }
            };
            lines.push(line);
        }
        lines.join("\n")
    }
}
