//! The classical step-based Munkres algorithm over a square working matrix of reduced costs.

mod path;
mod potential;

use alloc::format;
use core::cmp::max;
use core::marker::PhantomData;

use crate::algo::{Reduction, Solver};
use crate::assignment::Assignment;
use crate::cost::Cost;
use crate::cover::Cover;
use crate::error::Error;
use crate::mark::{Mark, MarkGrid};
use crate::matrix::Matrix;

use self::path::PathBuilder;
use self::potential::adjust_potentials;

/// Step-based Hungarian solver.
///
/// Ties between optimal matchings are broken by the row-major order of the uncovered-zero search,
/// so solving the same matrix twice returns the same matching.
#[derive(Clone, Copy, Debug, Default)]
pub struct Munkres<C> {
    reduction: Reduction,
    verify: bool,
    _phantom: PhantomData<C>,
}

impl<C> Munkres<C> {
    pub fn new() -> Self {
        Self {
            reduction: Reduction::default(),
            verify: false,
            _phantom: PhantomData,
        }
    }

    pub fn with_reduction(self, reduction: Reduction) -> Self {
        Self { reduction, ..self }
    }

    /// Double-check dual feasibility of the final reduced matrix before returning.
    pub fn with_verification(self, verify: bool) -> Self {
        Self { verify, ..self }
    }
}

impl<C: Cost> Solver for Munkres<C> {
    type Cost = C;
    type Error = Error;

    fn solve(&mut self, costs: &Matrix<C>) -> Result<Assignment<C>, Self::Error> {
        let mut controller = StepController::new(costs);
        controller.reduce(self.reduction)?;
        controller.star_initial();
        controller.run()?;

        if self.verify {
            controller.verify()?;
        }

        let assignment = Assignment::from_pairs(costs, controller.marks.stars())?;
        log::debug!("munkres: total cost {}", assignment.total_cost());
        Ok(assignment)
    }

    fn check(&self, costs: &Matrix<C>, assignment: &Assignment<C>) -> Result<(), Self::Error> {
        assignment.validate(costs)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    CoverCheck,
    FindOpportunity,
    Augment { row: usize, col: usize },
    AdjustPotentials,
    Done,
}

/// Working state of one solve: reduced costs, marks, covers and the path buffer.
struct StepController<C> {
    size: usize,
    reduced: Matrix<C>,
    marks: MarkGrid,
    cover: Cover,
    path: PathBuilder,
    augmentations: usize,
    adjustments: usize,
}

impl<C: Cost> StepController<C> {
    fn new(costs: &Matrix<C>) -> Self {
        let size = max(costs.rows(), costs.cols());
        log::debug!(
            "munkres: {}x{} matrix, working size {size}",
            costs.rows(),
            costs.cols()
        );

        Self {
            size,
            reduced: costs.padded(size),
            marks: MarkGrid::new(size),
            cover: Cover::new(size, size),
            path: PathBuilder::with_capacity(size),
            augmentations: 0,
            adjustments: 0,
        }
    }

    fn reduce(&mut self, reduction: Reduction) -> Result<(), Error> {
        for r in 0..self.size {
            let min = self.reduced.row_min(r);
            for v in self.reduced.row_mut(r) {
                *v = v.try_sub(min).ok_or(Error::ArithmeticOverflow)?;
            }
        }

        if reduction == Reduction::RowsThenColumns {
            for c in 0..self.size {
                let min = self.reduced.col_min(c);
                for r in 0..self.size {
                    let v = self.reduced.cell_mut(r, c);
                    *v = v.try_sub(min).ok_or(Error::ArithmeticOverflow)?;
                }
            }
        }
        Ok(())
    }

    /// Stars zeros greedily so that each row and column seeds at most one star.
    fn star_initial(&mut self) {
        for r in 0..self.size {
            let free_zero = (0..self.size)
                .find(|&c| self.reduced[(r, c)].is_zero() && !self.cover.is_col_covered(c));
            if let Some(c) = free_zero {
                self.marks.star(r, c);
                self.cover.cover_row(r);
                self.cover.cover_col(c);
            }
        }
        self.cover.clear();
    }

    fn run(&mut self) -> Result<(), Error> {
        let mut step = Step::CoverCheck;
        loop {
            step = match step {
                Step::CoverCheck => self.cover_check(),
                Step::FindOpportunity => self.find_opportunity(),
                Step::Augment { row, col } => {
                    self.path.augment(&mut self.marks, (row, col), self.size)?;
                    self.cover.clear();
                    self.marks.clear_primes();
                    self.augmentations += 1;
                    Step::CoverCheck
                }
                Step::AdjustPotentials => {
                    let h = adjust_potentials(&mut self.reduced, &self.cover)?;
                    log::trace!("adjusted potentials by {h}");
                    self.adjustments += 1;
                    Step::FindOpportunity
                }
                Step::Done => {
                    log::debug!(
                        "munkres: done after {} augmentations and {} potential adjustments",
                        self.augmentations,
                        self.adjustments
                    );
                    return Ok(());
                }
            };
        }
    }

    fn cover_check(&mut self) -> Step {
        self.marks
            .stars()
            .for_each(|(_, c)| self.cover.cover_col(c));

        if self.cover.covered_cols() >= self.size {
            Step::Done
        } else {
            Step::FindOpportunity
        }
    }

    fn find_opportunity(&mut self) -> Step {
        while let Some((row, col)) = self.find_uncovered_zero() {
            self.marks.prime(row, col);
            match self.marks.find_star_in_row(row) {
                Some(star_col) => {
                    self.cover.cover_row(row);
                    self.cover.uncover_col(star_col);
                }
                None => return Step::Augment { row, col },
            }
        }
        Step::AdjustPotentials
    }

    /// First zero in row-major order whose row and column are both uncovered.
    fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        self.cover.uncovered_rows().find_map(|r| {
            self.reduced
                .row(r)
                .iter()
                .enumerate()
                .find(|&(c, v)| v.is_zero() && !self.cover.is_col_covered(c))
                .map(|(c, _)| (r, c))
        })
    }

    /// Reduced costs must be non-negative everywhere and zero on every starred cell.
    fn verify(&self) -> Result<(), Error> {
        for r in 0..self.size {
            for c in 0..self.size {
                let v = self.reduced[(r, c)];
                if v < C::zero() {
                    return Err(Error::InternalInconsistency(format!(
                        "negative reduced cost {v} at ({r}, {c})"
                    )));
                }
                if self.marks.get(r, c) == Mark::Starred && !v.is_zero() {
                    return Err(Error::InternalInconsistency(format!(
                        "starred cell ({r}, {c}) has reduced cost {v}"
                    )));
                }
            }
        }

        let stars = self.marks.stars().count();
        if stars != self.size {
            return Err(Error::InternalInconsistency(format!(
                "{stars} starred zeros, expected {}",
                self.size
            )));
        }
        Ok(())
    }
}
