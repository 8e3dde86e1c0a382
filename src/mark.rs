use alloc::vec;
use alloc::vec::Vec;

use itertools::iproduct;

/// Per-cell tag of the mark grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    None,
    /// A zero tentatively included in the matching.
    Starred,
    /// A zero explored during the current augmenting path search.
    Primed,
}

/// Square grid of marks, parallel to the reduced cost matrix.
///
/// The grid never holds more than one starred cell per row or per column.
#[derive(Clone, Debug)]
pub struct MarkGrid {
    size: usize,
    marks: Vec<Mark>,
}

impl MarkGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marks: vec![Mark::None; size * size],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Mark {
        self.marks[row * self.size + col]
    }

    pub fn star(&mut self, row: usize, col: usize) {
        debug_assert!(self.find_star_in_row(row).is_none());
        debug_assert!(self.find_star_in_col(col).is_none());
        self.set(row, col, Mark::Starred);
    }

    pub fn prime(&mut self, row: usize, col: usize) {
        self.set(row, col, Mark::Primed);
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, mark: Mark) {
        self.marks[row * self.size + col] = mark;
    }

    pub fn find_star_in_row(&self, row: usize) -> Option<usize> {
        self.find_in_row(row, Mark::Starred)
    }

    pub fn find_star_in_col(&self, col: usize) -> Option<usize> {
        (0..self.size).find(|&r| self.get(r, col) == Mark::Starred)
    }

    pub fn find_prime_in_row(&self, row: usize) -> Option<usize> {
        self.find_in_row(row, Mark::Primed)
    }

    fn find_in_row(&self, row: usize, mark: Mark) -> Option<usize> {
        self.marks[row * self.size..(row + 1) * self.size]
            .iter()
            .position(|m| *m == mark)
    }

    /// Erases every primed mark.
    pub fn clear_primes(&mut self) {
        self.marks
            .iter_mut()
            .filter(|m| **m == Mark::Primed)
            .for_each(|m| *m = Mark::None);
    }

    /// Starred cells in row-major order.
    pub fn stars(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        iproduct!(0..self.size, 0..self.size).filter(|&(r, c)| self.get(r, c) == Mark::Starred)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Mark, MarkGrid};

    #[test]
    fn star_and_prime_queries() {
        let mut marks = MarkGrid::new(3);
        marks.star(0, 2);
        marks.prime(1, 2);
        marks.prime(1, 0);

        assert_eq!(marks.find_star_in_row(0), Some(2));
        assert_eq!(marks.find_star_in_row(1), None);
        assert_eq!(marks.find_star_in_col(2), Some(0));
        assert_eq!(marks.find_prime_in_row(1), Some(0));
        assert_eq!(marks.find_prime_in_row(2), None);

        marks.clear_primes();
        assert_eq!(marks.get(1, 2), Mark::None);
        assert_eq!(marks.stars().collect::<Vec<_>>(), [(0, 2)]);
    }
}
