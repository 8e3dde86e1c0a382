use core::fmt::{Debug, Display};
use core::ops::{Add, Sub};

use num_traits::{CheckedAdd, CheckedSub, Zero};

/// A trait representing a cell weight of a cost matrix, either an integer or a float.
///
/// Reduced costs never go below zero during a solve, so unsigned types work as well as signed
/// ones. Solvers do all cost arithmetic through [`Cost::try_add`] and [`Cost::try_sub`], which
/// report overflow instead of wrapping.
pub trait Cost:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + PartialOrd
    + Zero
    + Debug
    + Display
    + Default
{
    /// Returns `false` for values that cannot take part in a sum (NaN, infinities).
    fn is_valid(&self) -> bool {
        true
    }

    /// `self + rhs`, or `None` if the result does not fit the type.
    fn try_add(self, rhs: Self) -> Option<Self>;

    /// `self - rhs`, or `None` if the result does not fit the type.
    fn try_sub(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_integer_cost {
    ($($t:ty),*) => {
        $(impl Cost for $t {
            fn try_add(self, rhs: Self) -> Option<Self> {
                CheckedAdd::checked_add(&self, &rhs)
            }

            fn try_sub(self, rhs: Self) -> Option<Self> {
                CheckedSub::checked_sub(&self, &rhs)
            }
        })*
    };
}

macro_rules! impl_float_cost {
    ($($t:ty),*) => {
        $(impl Cost for $t {
            fn is_valid(&self) -> bool {
                self.is_finite()
            }

            fn try_add(self, rhs: Self) -> Option<Self> {
                let v = self + rhs;
                v.is_finite().then_some(v)
            }

            fn try_sub(self, rhs: Self) -> Option<Self> {
                let v = self - rhs;
                v.is_finite().then_some(v)
            }
        })*
    };
}

impl_integer_cost!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_float_cost!(f32, f64);

#[cfg(test)]
mod tests {
    use super::Cost;

    #[test]
    fn floats_reject_non_finite() {
        assert!(1.5f64.is_valid());
        assert!(!f64::NAN.is_valid());
        assert!(!f64::INFINITY.is_valid());
        assert!(!f32::NEG_INFINITY.is_valid());
    }

    #[test]
    fn integers_are_always_valid() {
        assert!(i32::MIN.is_valid());
        assert!(u64::MAX.is_valid());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(200u8.try_add(55), Some(255));
        assert_eq!(200u8.try_add(56), None);
        assert_eq!(0u32.try_sub(1), None);
        assert_eq!(i32::MAX.try_sub(i32::MIN), None);
        assert_eq!(f64::MAX.try_add(f64::MAX), None);
        assert_eq!(0.5f32.try_sub(0.25), Some(0.25));
    }
}
