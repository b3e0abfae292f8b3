use std::error;
use std::fmt;
use std::result;

/// An enum representing the errors returned by the collections in this crate.
///
/// Misuse of cursors and positions (stepping past the end, dereferencing the end, using a position
/// from a different map) is a programming error and panics instead.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A value lookup was made for a key that does not exist.
    KeyNotFound,
    /// Validation found a red node with a red child.
    ConsecutiveReds,
    /// Validation found two sibling subtrees with different black heights.
    UnbalancedBlacks { left: usize, right: usize },
    /// Validation found a red root.
    RedRoot,
    /// Validation found entries that are not in ascending order.
    SortOrder,
    /// Validation found a child whose parent link does not point back at its parent.
    BrokenParentLink,
    /// Validation found a different number of nodes than the map reports.
    LengthMismatch { expected: usize, actual: usize },
    /// A matrix was given zero rows or zero columns.
    EmptyMatrix,
    /// Two matrices have incompatible dimensions for an operation.
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// A cell outside of a matrix was accessed.
    IndexOutOfBounds { row: usize, column: usize },
    /// A matrix was built from storage that has no entry for a cell.
    MissingCell { row: usize, column: usize },
    /// A square matrix was required.
    NotSquare,
    /// Input could not be parsed.
    Parse(String),
    /// An accumulator overflowed.
    Overflow,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key does not exist"),
            Error::ConsecutiveReds => write!(f, "red node has a red child"),
            Error::UnbalancedBlacks { left, right } => {
                write!(f, "unbalanced black height, left: {} right: {}", left, right)
            },
            Error::RedRoot => write!(f, "root is red"),
            Error::SortOrder => write!(f, "entries are not in sorted order"),
            Error::BrokenParentLink => write!(f, "parent link does not match child link"),
            Error::LengthMismatch { expected, actual } => {
                write!(f, "expected {} entries, found {}", expected, actual)
            },
            Error::EmptyMatrix => write!(f, "matrix must have at least one row and one column"),
            Error::DimensionMismatch { left, right } => write!(
                f,
                "incompatible dimensions {}x{} and {}x{}",
                left.0, left.1, right.0, right.1,
            ),
            Error::IndexOutOfBounds { row, column } => {
                write!(f, "cell ({}, {}) is out of bounds", row, column)
            },
            Error::MissingCell { row, column } => {
                write!(f, "cell ({}, {}) has no entry", row, column)
            },
            Error::NotSquare => write!(f, "matrix is not square"),
            Error::Parse(message) => write!(f, "parse error: {}", message),
            Error::Overflow => write!(f, "overflow"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key does not exist");
        assert_eq!(
            Error::UnbalancedBlacks { left: 2, right: 1 }.to_string(),
            "unbalanced black height, left: 2 right: 1",
        );
        assert_eq!(
            Error::DimensionMismatch {
                left: (2, 3),
                right: (2, 2),
            }
            .to_string(),
            "incompatible dimensions 2x3 and 2x2",
        );
    }
}
