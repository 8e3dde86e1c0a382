use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Invalid matrix dimensions {rows}x{cols}, expected at least one row and one column
    InvalidDimensions { rows: usize, cols: usize },
    /// Matrix shape mismatch, expected {expected} cells but got {actual}
    ShapeMismatch { expected: usize, actual: usize },
    /// Invalid cost at ({row}, {col}), expected a finite value
    InvalidCost { row: usize, col: usize },
    /// Arithmetic overflow, the cost range does not fit the cost type
    ArithmeticOverflow,
    /// Internal inconsistency: {0}
    InternalInconsistency(String),
    /// Invalid assignment: {0}
    InvalidAssignment(String),
}

impl core::error::Error for Error {}
