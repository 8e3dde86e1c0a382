use core::fmt::Debug;

use crate::assignment::Assignment;
use crate::matrix::Matrix;

pub mod forest;
pub mod munkres;

/// An exact minimum-cost assignment algorithm.
pub trait Solver {
    type Cost;
    type Error: Debug;

    /// Run the algorithm over the specified cost matrix and return a minimum-cost matching of
    /// `min(rows, cols)` cells.
    fn solve(
        &mut self,
        costs: &Matrix<Self::Cost>,
    ) -> Result<Assignment<Self::Cost>, Self::Error>;

    /// Check that `assignment` is a complete, self-consistent matching of `costs`.
    fn check(
        &self,
        costs: &Matrix<Self::Cost>,
        assignment: &Assignment<Self::Cost>,
    ) -> Result<(), Self::Error>;
}

/// How the working matrix is reduced before the initial starring.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Reduction {
    /// Subtract each row's minimum.
    #[default]
    Rows,
    /// Subtract each row's minimum, then each column's minimum.
    RowsThenColumns,
}
