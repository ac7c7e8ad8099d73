//! Storage for the saved positions of a run.

use ndarray::{Array2, ArrayView1};
use num_traits::Zero;

/// An `(n_samples, n_vars)` table filled one row per save point.
///
/// Rows are copies: mutating the live position after [`SampleStore::record`]
/// never changes what was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore<T> {
    table: Array2<T>,
    filled: usize,
}

impl<T: Clone + Zero> Default for SampleStore<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<T: Clone + Zero> SampleStore<T> {
    pub fn new(n_samples: usize, n_vars: usize) -> Self {
        Self {
            table: Array2::zeros((n_samples, n_vars)),
            filled: 0,
        }
    }

    /// Copies `x` into row `row`.
    pub fn record(&mut self, row: usize, x: &[T]) {
        self.table
            .row_mut(row)
            .assign(&ArrayView1::from(x));
        self.filled = self.filled.max(row + 1);
    }

    pub fn table(&self) -> &Array2<T> {
        &self.table
    }

    pub fn into_table(self) -> Array2<T> {
        self.table
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.table.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.table.nrows() == 0
    }

    /// One past the highest row written so far.
    pub fn filled(&self) -> usize {
        self.filled
    }
}
