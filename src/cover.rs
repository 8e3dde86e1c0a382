use alloc::vec;
use alloc::vec::Vec;

use itertools::Itertools;

/// Row and column exclusion state for the uncovered-zero search.
#[derive(Clone, Debug, Default)]
pub struct Cover {
    rows: Vec<bool>,
    cols: Vec<bool>,
}

impl Cover {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![false; rows],
            cols: vec![false; cols],
        }
    }

    pub fn is_row_covered(&self, row: usize) -> bool {
        self.rows[row]
    }

    pub fn is_col_covered(&self, col: usize) -> bool {
        self.cols[col]
    }

    pub fn is_uncovered(&self, row: usize, col: usize) -> bool {
        !self.rows[row] && !self.cols[col]
    }

    pub fn cover_row(&mut self, row: usize) {
        self.rows[row] = true;
    }

    pub fn cover_col(&mut self, col: usize) {
        self.cols[col] = true;
    }

    pub fn uncover_col(&mut self, col: usize) {
        self.cols[col] = false;
    }

    pub fn covered_cols(&self) -> usize {
        self.cols.iter().filter(|&&c| c).count()
    }

    pub fn uncovered_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().positions(|&c| !c)
    }

    pub fn clear(&mut self) {
        self.rows.fill(false);
        self.cols.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::Cover;

    #[test]
    fn cover_and_clear() {
        let mut cover = Cover::new(3, 2);
        cover.cover_row(1);
        cover.cover_col(0);
        assert!(!cover.is_uncovered(1, 1));
        assert!(!cover.is_uncovered(0, 0));
        assert!(cover.is_uncovered(2, 1));
        assert_eq!(cover.covered_cols(), 1);
        assert_eq!(cover.uncovered_rows().collect::<alloc::vec::Vec<_>>(), [0, 2]);

        cover.uncover_col(0);
        assert_eq!(cover.covered_cols(), 0);
        cover.clear();
        assert!(!cover.is_row_covered(1));
    }
}
