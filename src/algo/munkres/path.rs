use alloc::format;
use alloc::vec::Vec;

use crate::error::Error;
use crate::mark::{Mark, MarkGrid};

/// Builds and applies the alternating path of primed and starred zeros.
///
/// The buffer is kept between augmentations of one solve so it is only allocated once.
#[derive(Clone, Debug, Default)]
pub(super) struct PathBuilder {
    path: Vec<(usize, usize)>,
}

impl PathBuilder {
    pub(super) fn with_capacity(size: usize) -> Self {
        Self {
            path: Vec::with_capacity(2 * size + 1),
        }
    }

    /// Grows the path from the primed zero at `start` and flips its marks, which adds one star to
    /// the matching. Returns the number of cells on the path.
    pub(super) fn augment(
        &mut self,
        marks: &mut MarkGrid,
        start: (usize, usize),
        size: usize,
    ) -> Result<usize, Error> {
        self.build(marks, start, size)?;

        self.path.iter().for_each(|&(r, c)| match marks.get(r, c) {
            Mark::Starred => marks.set(r, c, Mark::None),
            Mark::Primed => marks.set(r, c, Mark::Starred),
            Mark::None => {}
        });

        log::trace!("augmenting path {:?}", self.path);
        Ok(self.path.len())
    }

    fn build(&mut self, marks: &MarkGrid, start: (usize, usize), size: usize) -> Result<(), Error> {
        self.path.clear();
        self.path.push(start);

        let (_, mut col) = start;
        while let Some(row) = marks.find_star_in_col(col) {
            // a path visits each row at most once
            if self.path.len() > 2 * size {
                return Err(Error::InternalInconsistency(format!(
                    "augmenting path from {start:?} does not terminate"
                )));
            }
            self.path.push((row, col));

            col = marks.find_prime_in_row(row).ok_or_else(|| {
                Error::InternalInconsistency(format!(
                    "no primed zero in row {row} of a starred zero on the augmenting path"
                ))
            })?;
            self.path.push((row, col));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PathBuilder;
    use crate::error::Error;
    use crate::mark::{Mark, MarkGrid};

    #[test]
    fn flips_alternating_path() {
        // (1, 0)' -> (0, 0)* -> (0, 1)'
        let mut marks = MarkGrid::new(2);
        marks.star(0, 0);
        marks.prime(0, 1);
        marks.prime(1, 0);

        let len = PathBuilder::with_capacity(2)
            .augment(&mut marks, (1, 0), 2)
            .unwrap();

        assert_eq!(len, 3);
        assert_eq!(marks.get(1, 0), Mark::Starred);
        assert_eq!(marks.get(0, 0), Mark::None);
        assert_eq!(marks.get(0, 1), Mark::Starred);
    }

    #[test]
    fn missing_prime_is_an_internal_error() {
        let mut marks = MarkGrid::new(2);
        marks.star(0, 0);
        marks.prime(1, 0);

        let res = PathBuilder::default().augment(&mut marks, (1, 0), 2);
        assert!(matches!(res, Err(Error::InternalInconsistency(_))));
    }
}
