//! Rolling record of which variables were proposed and accepted over the most
//! recent iterations.
//!
//! The window is a ring of `depth` rows of `n_vars` flags each. Row age 0 is the
//! newest iteration; advancing the window recycles the oldest row. Per-column
//! counts are maintained incrementally so that both advancing and reading the
//! acceptance ratios cost O(n_vars).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceWindow {
    depth: usize,
    n_vars: usize,
    /// Physical index of the newest row.
    cursor: usize,
    proposed: Vec<bool>, // depth x n_vars, row-major
    accepted: Vec<bool>, // depth x n_vars, row-major
    n_proposed: Vec<usize>,
    n_accepted: Vec<usize>,
}

impl AcceptanceWindow {
    /// Creates an empty window of `depth` rows. A zero depth is clamped to one row.
    pub fn new(depth: usize, n_vars: usize) -> Self {
        let depth = depth.max(1);
        Self {
            depth,
            n_vars,
            cursor: 0,
            proposed: vec![false; depth * n_vars],
            accepted: vec![false; depth * n_vars],
            n_proposed: vec![0; n_vars],
            n_accepted: vec![0; n_vars],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn physical(&self, age: usize) -> usize {
        (self.cursor + self.depth - age % self.depth) % self.depth
    }

    fn span(&self, row: usize) -> std::ops::Range<usize> {
        row * self.n_vars..(row + 1) * self.n_vars
    }

    /// Starts a new iteration: the oldest row expires and becomes the newest,
    /// cleared to "not proposed, not accepted".
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.depth;
        let span = self.span(self.cursor);
        for (j, flag) in self.proposed[span.clone()].iter_mut().enumerate() {
            if std::mem::take(flag) {
                self.n_proposed[j] -= 1;
            }
        }
        for (j, flag) in self.accepted[span].iter_mut().enumerate() {
            if std::mem::take(flag) {
                self.n_accepted[j] -= 1;
            }
        }
    }

    /// Flags variable `j` as proposed in the newest row.
    pub fn mark_proposed(&mut self, j: usize) {
        let idx = self.cursor * self.n_vars + j;
        if !self.proposed[idx] {
            self.proposed[idx] = true;
            self.n_proposed[j] += 1;
        }
    }

    /// Flags variable `j` as accepted in the newest row. Ignored unless `j` was
    /// proposed in that same row, so accepted flags stay a subset of proposed ones.
    pub fn mark_accepted(&mut self, j: usize) {
        let idx = self.cursor * self.n_vars + j;
        if self.proposed[idx] && !self.accepted[idx] {
            self.accepted[idx] = true;
            self.n_accepted[j] += 1;
        }
    }

    /// Number of rows in the window where `j` was proposed.
    pub fn proposed(&self, j: usize) -> usize {
        self.n_proposed[j]
    }

    /// Number of rows in the window where `j` was accepted.
    pub fn accepted(&self, j: usize) -> usize {
        self.n_accepted[j]
    }

    /// Proposed and accepted flags of the row `age` iterations back.
    pub fn row(&self, age: usize) -> (&[bool], &[bool]) {
        let span = self.span(self.physical(age));
        (&self.proposed[span.clone()], &self.accepted[span])
    }

    /// Writes accepted / proposed for every column with at least one proposal.
    /// Columns without proposals keep whatever `ratios` held.
    pub fn update_ratios(&self, ratios: &mut [f64]) {
        for ((ratio, &prop), &acc) in ratios
            .iter_mut()
            .zip(&self.n_proposed)
            .zip(&self.n_accepted)
        {
            if prop != 0 {
                *ratio = acc as f64 / prop as f64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation shifting a dense matrix down by one row each step.
    struct ShiftedWindow {
        proposed: Vec<Vec<bool>>,
        accepted: Vec<Vec<bool>>,
    }

    impl ShiftedWindow {
        fn new(depth: usize, n_vars: usize) -> Self {
            Self {
                proposed: vec![vec![false; n_vars]; depth],
                accepted: vec![vec![false; n_vars]; depth],
            }
        }

        fn advance(&mut self) {
            let n_vars = self.proposed[0].len();
            self.proposed.pop();
            self.proposed.insert(0, vec![false; n_vars]);
            self.accepted.pop();
            self.accepted.insert(0, vec![false; n_vars]);
        }

        fn column_sum(rows: &[Vec<bool>], j: usize) -> usize {
            rows.iter().filter(|row| row[j]).count()
        }
    }

    #[test]
    fn matches_shifted_matrix() {
        let (depth, n_vars) = (4, 3);
        let mut ring = AcceptanceWindow::new(depth, n_vars);
        let mut dense = ShiftedWindow::new(depth, n_vars);

        // A deterministic pattern of proposals and acceptances.
        for step in 0..37usize {
            ring.advance();
            dense.advance();
            let j = (step * 7) % n_vars;
            ring.mark_proposed(j);
            dense.proposed[0][j] = true;
            if step % 3 != 0 {
                ring.mark_accepted(j);
                dense.accepted[0][j] = true;
            }
            if step % 5 == 0 {
                let k = (j + 1) % n_vars;
                ring.mark_proposed(k);
                dense.proposed[0][k] = true;
            }

            for j in 0..n_vars {
                assert_eq!(ring.proposed(j), ShiftedWindow::column_sum(&dense.proposed, j));
                assert_eq!(ring.accepted(j), ShiftedWindow::column_sum(&dense.accepted, j));
            }
            for age in 0..depth {
                let (p, a) = ring.row(age);
                assert_eq!(p, dense.proposed[age].as_slice(), "step {step} age {age}");
                assert_eq!(a, dense.accepted[age].as_slice(), "step {step} age {age}");
            }
        }
    }

    #[test]
    fn accept_requires_proposal() {
        let mut window = AcceptanceWindow::new(3, 2);
        window.advance();
        window.mark_accepted(1);
        assert_eq!(window.accepted(1), 0);

        window.mark_proposed(1);
        window.mark_accepted(1);
        window.mark_accepted(1);
        assert_eq!(window.proposed(1), 1);
        assert_eq!(window.accepted(1), 1);
    }

    #[test]
    fn oldest_row_expires() {
        let mut window = AcceptanceWindow::new(2, 1);
        window.advance();
        window.mark_proposed(0);
        window.mark_accepted(0);
        window.advance();
        window.mark_proposed(0);
        assert_eq!((window.proposed(0), window.accepted(0)), (2, 1));

        window.advance();
        assert_eq!((window.proposed(0), window.accepted(0)), (1, 0));
        window.advance();
        assert_eq!((window.proposed(0), window.accepted(0)), (0, 0));
    }

    #[test]
    fn ratios_hold_where_nothing_was_proposed() {
        let mut window = AcceptanceWindow::new(4, 3);
        let mut ratios = vec![0.25, 0.5, 0.75];

        window.advance();
        window.mark_proposed(0);
        window.mark_accepted(0);
        window.advance();
        window.mark_proposed(0);
        window.advance();
        window.mark_proposed(2);

        window.update_ratios(&mut ratios);
        assert_eq!(ratios, vec![0.5, 0.5, 0.0]);
        assert!(ratios.iter().all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn zero_depth_is_clamped() {
        let mut window = AcceptanceWindow::new(0, 2);
        assert_eq!(window.depth(), 1);
        window.advance();
        window.mark_proposed(0);
        assert_eq!(window.proposed(0), 1);
        window.advance();
        assert_eq!(window.proposed(0), 0);
    }
}
