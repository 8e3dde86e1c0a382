#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod assignment;
pub mod cost;
pub mod cover;
pub mod error;
pub mod mark;
pub mod matrix;

use alloc::vec::Vec;

pub use crate::algo::forest::Forest;
pub use crate::algo::munkres::Munkres;
pub use crate::algo::{Reduction, Solver};
pub use crate::assignment::{Assignment, Pairing};
pub use crate::cost::Cost;
pub use crate::error::Error;
pub use crate::matrix::{Matrix, RawMatrix};

/// Computes a minimum-cost assignment of `costs` with the default [`Munkres`] solver.
///
/// ```
/// use munkres::{solve, Matrix};
///
/// let costs = Matrix::from_rows(&[[30, 25, 10], [15, 10, 20], [25, 20, 15]])?;
/// let assignment = solve(&costs)?;
/// assert_eq!(assignment.total_cost(), 45);
/// # Ok::<(), munkres::Error>(())
/// ```
pub fn solve<C: Cost>(costs: &Matrix<C>) -> Result<Assignment<C>, Error> {
    Munkres::<C>::new().solve(costs)
}

/// Solves every matrix independently with copies of `solver`. Each solve owns its working state,
/// so callers with threads at hand may just as well fan these calls out.
pub fn solve_all<'a, S, M>(solver: &S, matrices: M) -> Vec<Result<Assignment<S::Cost>, S::Error>>
where
    S: Solver + Clone,
    S::Cost: 'a,
    M: IntoIterator<Item = &'a Matrix<S::Cost>>,
{
    matrices
        .into_iter()
        .map(|costs| solver.clone().solve(costs))
        .collect()
}
