//! Hungarian method in Knuth's formulation (Stanford GraphBase): a forest of alternating trees is
//! grown from all unmatched rows at once, with per-column slacks standing in for the covered
//! matrix.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::max;
use core::marker::PhantomData;

use crate::algo::Solver;
use crate::assignment::Assignment;
use crate::cost::Cost;
use crate::error::Error;
use crate::matrix::Matrix;

/// Slack-based Hungarian solver with explicit row and column potentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct Forest<C> {
    verify: bool,
    _phantom: PhantomData<C>,
}

impl<C> Forest<C> {
    pub fn new() -> Self {
        Self {
            verify: false,
            _phantom: PhantomData,
        }
    }

    /// Double-check the final potentials against the matching before returning.
    pub fn with_verification(self, verify: bool) -> Self {
        Self { verify, ..self }
    }
}

impl<C: Cost> Solver for Forest<C> {
    type Cost = C;
    type Error = Error;

    fn solve(&mut self, costs: &Matrix<C>) -> Result<Assignment<C>, Self::Error> {
        let mut state = ForestState::new(costs)?;
        state.run()?;

        if self.verify {
            state.verify()?;
        }

        let assignment = Assignment::from_pairs(costs, state.matching())?;
        log::debug!("forest: total cost {}", assignment.total_cost());
        Ok(assignment)
    }

    fn check(&self, costs: &Matrix<C>, assignment: &Assignment<C>) -> Result<(), Self::Error> {
        assignment.validate(costs)
    }
}

/// Working state of one solve. Knuth keeps row and column potentials next to the original costs;
/// here they are folded into `reduced`, so that a cell's reduced cost is always a value that was
/// stored rather than recomputed, and a slack taken from a cell stays bit-equal to it.
struct ForestState<C> {
    size: usize,
    reduced: Matrix<C>,
    // row -> matched column
    col_mate: Vec<Option<usize>>,
    // column -> matched row
    row_mate: Vec<Option<usize>>,
    parent_row: Vec<Option<usize>>,
    // forest nodes, in exploration order
    unchosen_rows: Vec<usize>,
    // `None` while no forest row has looked at the column yet
    slack: Vec<Option<C>>,
    slack_row: Vec<usize>,
}

impl<C: Cost> ForestState<C> {
    fn new(costs: &Matrix<C>) -> Result<Self, Error> {
        let size = max(costs.rows(), costs.cols());
        let mut reduced = costs.padded(size);
        for l in 0..size {
            let min = reduced.col_min(l);
            for k in 0..size {
                let v = reduced.cell_mut(k, l);
                *v = v.try_sub(min).ok_or(Error::ArithmeticOverflow)?;
            }
        }

        Ok(Self {
            size,
            reduced,
            col_mate: vec![None; size],
            row_mate: vec![None; size],
            parent_row: vec![None; size],
            unchosen_rows: Vec::with_capacity(size),
            slack: vec![None; size],
            slack_row: vec![0; size],
        })
    }

    fn run(&mut self) -> Result<(), Error> {
        self.match_row_minima()?;

        let mut unmatched = self.unchosen_rows.len();
        log::debug!(
            "forest: {unmatched} of {} rows unmatched after the initial matching",
            self.size
        );

        while unmatched > 0 {
            let (row, col) = self.grow_forest()?;
            log::trace!("breakthrough at ({row}, {col})");
            self.augment(row, col)?;
            unmatched -= 1;
            self.next_stage();
        }

        Ok(())
    }

    /// Subtracts each row minimum and matches the row to the first free column where it is
    /// attained.
    fn match_row_minima(&mut self) -> Result<(), Error> {
        for k in 0..self.size {
            let s = self.reduced.row_min(k);
            for v in self.reduced.row_mut(k) {
                *v = v.try_sub(s).ok_or(Error::ArithmeticOverflow)?;
            }

            let free_zero = (0..self.size)
                .find(|&l| self.reduced[(k, l)].is_zero() && self.row_mate[l].is_none());
            match free_zero {
                Some(l) => {
                    self.col_mate[k] = Some(l);
                    self.row_mate[l] = Some(k);
                }
                None => self.unchosen_rows.push(k),
            }
        }
        Ok(())
    }

    fn next_stage(&mut self) {
        self.parent_row.fill(None);
        self.slack.fill(None);
        self.unchosen_rows.clear();
        let free_rows = (0..self.size).filter(|&k| self.col_mate[k].is_none());
        self.unchosen_rows.extend(free_rows);
    }

    fn in_forest(&self, col: usize) -> bool {
        matches!(self.slack[col], Some(s) if s.is_zero())
    }

    /// Explores forest nodes until a zero reaches a free column, introducing new zeros whenever
    /// every node has been explored. Returns the cell that breaks through.
    fn grow_forest(&mut self) -> Result<(usize, usize), Error> {
        let mut explored = 0;

        // every round without a breakthrough adds at least one column to the forest
        for _ in 0..=self.size {
            while explored < self.unchosen_rows.len() {
                let row = self.unchosen_rows[explored];
                if let Some(col) = self.explore(row) {
                    return Ok((row, col));
                }
                explored += 1;
            }

            if let Some(breakthrough) = self.introduce_zero()? {
                return Ok(breakthrough);
            }
        }

        Err(Error::InternalInconsistency(format!(
            "no breakthrough after {} rounds",
            self.size + 1
        )))
    }

    fn explore(&mut self, k: usize) -> Option<usize> {
        for l in 0..self.size {
            if self.in_forest(l) {
                continue;
            }

            let del = self.reduced[(k, l)];
            if self.slack[l].map_or(true, |slack| del < slack) {
                if del.is_zero() {
                    match self.row_mate[l] {
                        None => return Some(l),
                        Some(mate) => {
                            self.slack[l] = Some(C::zero());
                            self.parent_row[l] = Some(k);
                            self.unchosen_rows.push(mate);
                        }
                    }
                } else {
                    self.slack[l] = Some(del);
                    self.slack_row[l] = k;
                }
            }
        }
        None
    }

    /// Raises the potentials of forest rows by the smallest positive slack `s` and compensates
    /// on forest columns, which turns at least one slack into a new zero.
    fn introduce_zero(&mut self) -> Result<Option<(usize, usize)>, Error> {
        let s = self
            .slack
            .iter()
            .flatten()
            .filter(|v| !v.is_zero())
            .fold(None, |min: Option<C>, &v| match min {
                Some(m) if m <= v => Some(m),
                _ => Some(v),
            })
            .ok_or_else(|| {
                Error::InternalInconsistency("no positive slack left to introduce a zero".into())
            })?;
        if s <= C::zero() {
            return Err(Error::InternalInconsistency(format!(
                "negative slack {s} in the forest"
            )));
        }

        self.shift_potentials(s)?;

        for l in 0..self.size {
            let slack = self.slack[l];
            let Some(v) = slack.filter(|v| !v.is_zero()) else {
                continue;
            };
            let v = v.try_sub(s).ok_or(Error::ArithmeticOverflow)?;
            self.slack[l] = Some(v);
            if !v.is_zero() {
                continue;
            }

            let k = self.slack_row[l];
            let mate = self.row_mate[l];
            match mate {
                None => return Ok(Some((k, l))),
                Some(mate) => {
                    self.parent_row[l] = Some(k);
                    self.unchosen_rows.push(mate);
                }
            }
        }

        Ok(None)
    }

    /// Lowers reduced costs by `s` on forest rows outside forest columns and raises them on
    /// forest columns outside forest rows. Every forest row has been explored at this point, so
    /// the lowered cells stay at or above their column's slack.
    fn shift_potentials(&mut self, s: C) -> Result<(), Error> {
        let mut forest_rows = vec![false; self.size];
        self.unchosen_rows.iter().for_each(|&k| forest_rows[k] = true);
        let forest_cols: Vec<bool> = (0..self.size).map(|l| self.in_forest(l)).collect();

        for (k, &in_row) in forest_rows.iter().enumerate() {
            for (l, v) in self.reduced.row_mut(k).iter_mut().enumerate() {
                *v = match (in_row, forest_cols[l]) {
                    (true, false) => v.try_sub(s),
                    (false, true) => v.try_add(s),
                    _ => Some(*v),
                }
                .ok_or(Error::ArithmeticOverflow)?;
            }
        }
        Ok(())
    }

    /// Flips the matching along the parent links, starting with `row` taking `col`.
    fn augment(&mut self, row: usize, col: usize) -> Result<(), Error> {
        let (mut k, mut l) = (row, col);
        for _ in 0..self.size {
            let previous = self.col_mate[k].replace(l);
            self.row_mate[l] = Some(k);
            match previous {
                None => return Ok(()),
                Some(j) => {
                    k = self.parent_row[j].ok_or_else(|| {
                        Error::InternalInconsistency(format!("forest column {j} has no parent row"))
                    })?;
                    l = j;
                }
            }
        }

        Err(Error::InternalInconsistency(format!(
            "augmenting from ({row}, {col}) does not reach a free row"
        )))
    }

    fn matching(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.col_mate
            .iter()
            .enumerate()
            .filter_map(|(k, l)| l.map(|l| (k, l)))
    }

    /// Reduced costs must be non-negative everywhere and zero on every matched cell.
    fn verify(&self) -> Result<(), Error> {
        for k in 0..self.size {
            if let Some(l) = (0..self.size).find(|&l| self.reduced[(k, l)] < C::zero()) {
                return Err(Error::InternalInconsistency(format!(
                    "potentials infeasible at ({k}, {l})"
                )));
            }

            match self.col_mate[k] {
                Some(l) if self.reduced[(k, l)].is_zero() => {}
                Some(l) => {
                    return Err(Error::InternalInconsistency(format!(
                        "matched cell ({k}, {l}) is not tight"
                    )))
                }
                None => {
                    return Err(Error::InternalInconsistency(format!(
                        "row {k} left unmatched"
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Forest, ForestState};
    use crate::algo::Solver;
    use crate::error::Error;
    use crate::matrix::Matrix;

    #[test]
    fn textbook_example() {
        let costs = Matrix::from_rows(&[[30, 25, 10], [15, 10, 20], [25, 20, 15]]).unwrap();
        let mut forest = Forest::new().with_verification(true);
        let assignment = forest.solve(&costs).unwrap();

        assert_eq!(assignment.total_cost(), 45);
        assert!(forest.check(&costs, &assignment).is_ok());
    }

    #[test]
    fn initial_matching_uses_row_minima() {
        let costs = Matrix::from_rows(&[[1, 2, 3], [2, 4, 6], [3, 6, 9]]).unwrap();
        let mut state = ForestState::new(&costs).unwrap();
        state.match_row_minima().unwrap();

        // after column reduction every row has its minimum in column 0
        assert_eq!(state.col_mate, [Some(0), None, None]);
        assert_eq!(state.unchosen_rows, [1, 2]);
        assert_eq!(state.reduced.row(1), &[0, 1, 2]);
        assert_eq!(state.reduced.row(2), &[0, 2, 4]);
    }

    #[test]
    fn stages_introduce_zeros_until_matched() {
        let costs = Matrix::from_rows(&[[1, 2, 3], [2, 4, 6], [3, 6, 9]]).unwrap();
        let mut state = ForestState::new(&costs).unwrap();
        state.run().unwrap();
        state.verify().unwrap();

        assert!(state.col_mate.iter().all(Option::is_some));
        let total: i32 = state.matching().map(|cell| costs[cell]).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn rectangular_and_unsigned() {
        let costs = Matrix::from_rows(&[[9u64, 2, 7], [6, 4, 3], [5, 8, 1], [7, 6, 9]]).unwrap();
        let assignment = Forest::new().with_verification(true).solve(&costs).unwrap();

        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.total_cost(), 2 + 6 + 1);
    }

    #[test]
    fn float_zeros_stay_exact() {
        let costs = Matrix::from_rows(&[
            [0.1, 0.7, 0.3, 0.9],
            [0.2, 0.6, 0.4, 0.8],
            [0.3, 0.5, 0.1, 0.7],
            [0.4, 0.4, 0.2, 0.6],
        ])
        .unwrap();
        let mut state = ForestState::new(&costs).unwrap();
        state.run().unwrap();
        state.verify().unwrap();

        for (k, l) in state.matching() {
            assert_eq!(state.reduced[(k, l)], 0.0);
        }
        assert!(state.reduced.row(0).iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn column_reduction_past_the_type_range_overflows() {
        let costs = Matrix::from_rows(&[[i64::MIN, 0], [i64::MAX, 0]]).unwrap();
        assert_eq!(Forest::new().solve(&costs), Err(Error::ArithmeticOverflow));
    }
}
