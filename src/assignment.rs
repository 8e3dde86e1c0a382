use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use serde::Serialize;

use crate::cost::Cost;
use crate::error::Error;
use crate::matrix::Matrix;

/// The result of a solve: a matching between rows and columns along with its total cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment<C> {
    row_to_col: Vec<Option<usize>>,
    col_to_row: Vec<Option<usize>>,
    total_cost: C,
}

/// A matched cell, as written out by result sinks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pairing<C> {
    pub row: usize,
    pub col: usize,
    pub cost: C,
}

impl<C: Cost> Assignment<C> {
    /// Builds an assignment from matched cells of a (possibly padded) working matrix, dropping any
    /// pairing that falls outside `costs`. Fails if the total cost does not fit `C`.
    pub(crate) fn from_pairs<I>(costs: &Matrix<C>, pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut row_to_col = vec![None; costs.rows()];
        let mut col_to_row = vec![None; costs.cols()];
        pairs
            .into_iter()
            .filter(|&(r, c)| r < costs.rows() && c < costs.cols())
            .for_each(|(r, c)| {
                row_to_col[r] = Some(c);
                col_to_row[c] = Some(r);
            });

        let mut assignment = Self {
            row_to_col,
            col_to_row,
            total_cost: C::zero(),
        };
        assignment.total_cost = assignment.cost_in(costs)?;
        Ok(assignment)
    }

    pub fn row_to_col(&self) -> &[Option<usize>] {
        &self.row_to_col
    }

    pub fn col_to_row(&self) -> &[Option<usize>] {
        &self.col_to_row
    }

    pub fn total_cost(&self) -> C {
        self.total_cost
    }

    pub fn col_for(&self, row: usize) -> Option<usize> {
        self.row_to_col.get(row).copied().flatten()
    }

    pub fn row_for(&self, col: usize) -> Option<usize> {
        self.col_to_row.get(col).copied().flatten()
    }

    /// Matched `(row, col)` cells in row order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_to_col
            .iter()
            .enumerate()
            .filter_map(|(r, c)| c.map(|c| (r, c)))
    }

    pub fn pairings<'a>(&'a self, costs: &'a Matrix<C>) -> impl Iterator<Item = Pairing<C>> + 'a {
        self.pairs().map(|(row, col)| Pairing {
            row,
            col,
            cost: costs[(row, col)],
        })
    }

    /// Number of matched rows.
    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cost_in(&self, costs: &Matrix<C>) -> Result<C, Error> {
        self.pairs().try_fold(C::zero(), |total, cell| {
            total.try_add(costs[cell]).ok_or(Error::ArithmeticOverflow)
        })
    }

    /// Checks that this is a complete matching of `costs`: both maps agree, no row or column is
    /// used twice, `min(rows, cols)` cells are matched and the total cost adds up.
    pub fn validate(&self, costs: &Matrix<C>) -> Result<(), Error> {
        if self.row_to_col.len() != costs.rows() || self.col_to_row.len() != costs.cols() {
            return Err(Error::InvalidAssignment(format!(
                "shape {}x{} does not match a {}x{} matrix",
                self.row_to_col.len(),
                self.col_to_row.len(),
                costs.rows(),
                costs.cols()
            )));
        }

        if let Some((r, c)) = self
            .pairs()
            .find(|&(r, c)| c >= costs.cols() || self.col_to_row[c] != Some(r))
        {
            return Err(Error::InvalidAssignment(format!(
                "row {r} is matched to column {c} but not the other way around"
            )));
        }
        if let Some((c, r)) = self
            .col_to_row
            .iter()
            .enumerate()
            .find_map(|(c, r)| r.filter(|&r| self.col_for(r) != Some(c)).map(|r| (c, r)))
        {
            return Err(Error::InvalidAssignment(format!(
                "column {c} is matched to row {r} but not the other way around"
            )));
        }

        let expected = min(costs.rows(), costs.cols());
        if self.len() != expected {
            return Err(Error::InvalidAssignment(format!(
                "{} cells matched, expected {expected}",
                self.len()
            )));
        }

        let total = self.cost_in(costs)?;
        if total != self.total_cost {
            return Err(Error::InvalidAssignment(format!(
                "total cost {} does not match the sum of matched costs {total}",
                self.total_cost
            )));
        }

        Ok(())
    }
}
