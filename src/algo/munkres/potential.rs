use alloc::format;

use crate::cost::Cost;
use crate::cover::Cover;
use crate::error::Error;
use crate::matrix::Matrix;

/// Smallest reduced cost among cells whose row and column are both uncovered.
pub(super) fn min_uncovered<C: Cost>(reduced: &Matrix<C>, cover: &Cover) -> Option<C> {
    cover
        .uncovered_rows()
        .flat_map(|r| {
            reduced
                .row(r)
                .iter()
                .enumerate()
                .filter(|&(c, _)| !cover.is_col_covered(c))
                .map(|(_, v)| *v)
        })
        .fold(None, |min, v| match min {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
}

/// Introduces new zeros: with `h` the minimum uncovered reduced cost, adds `h` to every covered
/// row and subtracts it from every uncovered column. Starred zeros sit in covered columns of
/// uncovered rows or uncovered columns of covered rows, so they keep a reduced cost of zero.
///
/// Returns `h`, which must be strictly positive.
pub(super) fn adjust_potentials<C: Cost>(
    reduced: &mut Matrix<C>,
    cover: &Cover,
) -> Result<C, Error> {
    let h = min_uncovered(reduced, cover).ok_or_else(|| {
        Error::InternalInconsistency("potential adjustment without any uncovered cell".into())
    })?;
    if h <= C::zero() {
        return Err(Error::InternalInconsistency(format!(
            "potential adjustment with non-positive minimum {h}"
        )));
    }

    for r in 0..reduced.rows() {
        let row_covered = cover.is_row_covered(r);
        for (c, v) in reduced.row_mut(r).iter_mut().enumerate() {
            *v = match (row_covered, cover.is_col_covered(c)) {
                (true, true) => v.try_add(h),
                (false, false) => v.try_sub(h),
                _ => Some(*v),
            }
            .ok_or(Error::ArithmeticOverflow)?;
        }
    }

    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::{adjust_potentials, min_uncovered};
    use crate::cover::Cover;
    use crate::error::Error;
    use crate::matrix::Matrix;

    #[test]
    fn creates_a_zero_among_uncovered_cells() {
        let mut reduced = Matrix::from_rows(&[[0, 3, 2], [4, 0, 6], [5, 7, 0]]).unwrap();
        let mut cover = Cover::new(3, 3);
        cover.cover_row(0);
        cover.cover_col(1);

        assert_eq!(min_uncovered(&reduced, &cover), Some(0));
        *reduced.cell_mut(2, 2) = 1;

        assert_eq!(adjust_potentials(&mut reduced, &cover), Ok(1));
        assert_eq!(reduced.row(0), &[0, 4, 2]);
        assert_eq!(reduced.row(1), &[3, 0, 5]);
        assert_eq!(reduced.row(2), &[4, 7, 0]);
    }

    #[test]
    fn zero_minimum_is_a_sequencing_defect() {
        let mut reduced = Matrix::from_rows(&[[0, 1], [1, 2]]).unwrap();
        let cover = Cover::new(2, 2);

        assert!(matches!(
            adjust_potentials(&mut reduced, &cover),
            Err(Error::InternalInconsistency(_))
        ));
    }

    #[test]
    fn fully_covered_matrix_is_a_sequencing_defect() {
        let mut reduced = Matrix::from_rows(&[[0, 1], [1, 0]]).unwrap();
        let mut cover = Cover::new(2, 2);
        cover.cover_col(0);
        cover.cover_col(1);

        assert!(adjust_potentials(&mut reduced, &cover).is_err());
    }

    #[test]
    fn covered_cells_past_the_type_range_overflow() {
        let mut reduced = Matrix::from_rows(&[[254u8, 0], [0, 3]]).unwrap();
        let mut cover = Cover::new(2, 2);
        cover.cover_row(0);
        cover.cover_col(0);

        assert_eq!(
            adjust_potentials(&mut reduced, &cover),
            Err(Error::ArithmeticOverflow)
        );
    }
}
