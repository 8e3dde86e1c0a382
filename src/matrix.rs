use alloc::vec;
use alloc::vec::Vec;
use core::ops::Index;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::Error;

/// A dense row-major matrix of costs.
///
/// Every public constructor validates its input, so a `Matrix` always has at least one row and
/// one column and only contains finite costs.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(
    try_from = "RawMatrix<C>",
    bound(
        deserialize = "C: Cost + Deserialize<'de>",
        serialize = "C: Serialize"
    )
)]
pub struct Matrix<C> {
    rows: usize,
    cols: usize,
    data: Vec<C>,
}

impl<C: Cost> Matrix<C> {
    pub fn new(rows: usize, cols: usize, data: Vec<C>) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }

        let matrix = Self { rows, cols, data };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a matrix from a slice of rows, which must all have the same length.
    pub fn from_rows<R: AsRef<[C]>>(rows: &[R]) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let data: Vec<C> = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().copied())
            .collect();
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return Err(Error::ShapeMismatch {
                expected: rows.len() * cols,
                actual: data.len(),
            });
        }
        Self::new(rows.len(), cols, data)
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self, Error>
    where
        F: FnMut(usize, usize) -> C,
    {
        let data = iproduct!(0..rows, 0..cols).map(|(r, c)| f(r, c)).collect();
        Self::new(rows, cols, data)
    }

    /// A square `size`x`size` copy of this matrix, extended with zero-cost dummy cells.
    pub(crate) fn padded(&self, size: usize) -> Self {
        debug_assert!(size >= self.rows && size >= self.cols);
        let mut data = vec![C::zero(); size * size];
        (0..self.rows).for_each(|r| {
            data[r * size..r * size + self.cols].copy_from_slice(self.row(r));
        });
        Self {
            rows: size,
            cols: size,
            data,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        match iproduct!(0..self.rows, 0..self.cols).find(|&(r, c)| !self[(r, c)].is_valid()) {
            Some((row, col)) => Err(Error::InvalidCost { row, col }),
            None => Ok(()),
        }
    }

    pub fn row_min(&self, row: usize) -> C {
        min_of(self.row(row).iter().copied())
    }

    pub fn col_min(&self, col: usize) -> C {
        min_of((0..self.rows).map(|r| self[(r, col)]))
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> &mut C {
        &mut self.data[row * self.cols + col]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [C] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl<C> Matrix<C> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&C> {
        (row < self.rows && col < self.cols).then(|| &self.data[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> &[C] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl<C> Index<(usize, usize)> for Matrix<C> {
    type Output = C;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(col < self.cols, "column index {col} out of bounds");
        &self.data[row * self.cols + col]
    }
}

fn min_of<C: Cost>(mut values: impl Iterator<Item = C>) -> C {
    let first = values.next().unwrap_or_else(C::zero);
    values.fold(first, |min, v| if v < min { v } else { min })
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawMatrix<C> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<C>,
}

impl<C: Cost> TryFrom<RawMatrix<C>> for Matrix<C> {
    type Error = Error;

    fn try_from(m: RawMatrix<C>) -> Result<Self, Self::Error> {
        Self::new(m.rows, m.cols, m.data)
    }
}

impl<C> From<Matrix<C>> for RawMatrix<C> {
    fn from(m: Matrix<C>) -> Self {
        Self {
            rows: m.rows,
            cols: m.cols,
            data: m.data,
        }
    }
}
