//! Dense matrix stored in a red black tree keyed by row-major cell index.

use crate::error::{Error, Result};
use crate::red_black_tree::RedBlackMap;
use serde::de::{self, Deserialize, Deserializer};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::result;
use std::str::FromStr;

/// A matrix with `rows * columns` cells, each stored in a `RedBlackMap` under the key
/// `row * columns + column`.
///
/// Every constructor checks that the map holds exactly one entry per cell and nothing else, so
/// cell access never misses.
///
/// # Examples
///
/// ```
/// use rb_collections::matrix::Matrix;
///
/// let a: Matrix<i64> = "2 2 1 2 3 4".parse().unwrap();
/// let b: Matrix<i64> = "2 2 0 1 1 0".parse().unwrap();
///
/// let product = a.checked_mul(&b).unwrap();
/// assert_eq!(product.to_string(), "2 1\n4 3\n");
/// assert_eq!(a.determinant(), Ok(-2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    cells: RedBlackMap<usize, T>,
}

#[derive(Deserialize)]
#[serde(rename = "Matrix")]
struct MatrixData<T> {
    rows: usize,
    columns: usize,
    cells: RedBlackMap<usize, T>,
}

fn cell_count(rows: usize, columns: usize) -> Result<usize> {
    if rows == 0 || columns == 0 {
        return Err(Error::EmptyMatrix);
    }
    rows.checked_mul(columns).ok_or(Error::Overflow)
}

impl<T> Matrix<T> {
    /// Constructs a `rows` by `columns` matrix with every cell set to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMatrix` if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> Result<Self>
    where
        T: Default,
    {
        let size = cell_count(rows, columns)?;
        let cells = (0..size).map(|index| (index, T::default())).collect();
        Ok(Matrix {
            rows,
            columns,
            cells,
        })
    }

    /// Constructs a matrix from a map that holds one entry for each key in `0..rows * columns`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMatrix` if either dimension is zero, `Error::LengthMismatch` if the map
    /// holds the wrong number of entries, and `Error::MissingCell` if some cell has no entry.
    pub fn from_tree(rows: usize, columns: usize, cells: RedBlackMap<usize, T>) -> Result<Self> {
        let size = cell_count(rows, columns)?;
        if cells.len() != size {
            return Err(Error::LengthMismatch {
                expected: size,
                actual: cells.len(),
            });
        }
        if let Some((expected, _)) = cells
            .keys()
            .enumerate()
            .find(|(expected, index)| expected != *index)
        {
            return Err(Error::MissingCell {
                row: expected / columns,
                column: expected % columns,
            });
        }
        Ok(Matrix {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the number of cells.
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    /// Returns the key under which the cell at `row` and `column` is stored.
    pub fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<usize> {
        if row >= self.rows || column >= self.columns {
            return Err(Error::IndexOutOfBounds { row, column });
        }
        Ok(self.index(row, column))
    }

    fn cell(&self, row: usize, column: usize) -> &T {
        &self.cells[&self.index(row, column)]
    }

    /// Returns an immutable reference to the cell at `row` and `column`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the cell is outside of the matrix.
    pub fn get(&self, row: usize, column: usize) -> Result<&T> {
        let index = self.check_bounds(row, column)?;
        self.cells.get(&index)
    }

    /// Returns a mutable reference to the cell at `row` and `column`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the cell is outside of the matrix.
    pub fn get_mut(&mut self, row: usize, column: usize) -> Result<&mut T> {
        let index = self.check_bounds(row, column)?;
        self.cells.get_mut(&index)
    }

    /// Folds `f` over the cells in row-major order and returns the accumulator.
    pub fn traverse<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.cells.traverse_lnr(init, |acc, _, value| f(acc, value))
    }

    /// Calls `f` on every cell in row-major order.
    pub fn traverse_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cursor = self.cells.begin_mut();
        while !cursor.is_end() {
            f(cursor.value_mut());
            cursor.move_next();
        }
    }

    /// Multiplies every cell by `factor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::matrix::Matrix;
    ///
    /// let mut matrix: Matrix<i32> = "1 3 1 -2 3".parse().unwrap();
    /// matrix.scale(2);
    /// assert_eq!(matrix.to_string(), "2 -4 6\n");
    /// ```
    pub fn scale(&mut self, factor: T)
    where
        T: Clone + Mul<Output = T>,
    {
        self.traverse_mut(|value| *value = value.clone() * factor.clone());
    }

    fn zip_with<F>(&self, other: &Matrix<T>, mut f: F) -> Result<Matrix<T>>
    where
        T: Clone,
        F: FnMut(T, T) -> T,
    {
        if self.rows != other.rows || self.columns != other.columns {
            return Err(Error::DimensionMismatch {
                left: (self.rows, self.columns),
                right: (other.rows, other.columns),
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(other.cells.iter())
            .map(|((index, a), (_, b))| (*index, f(a.clone(), b.clone())))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            columns: self.columns,
            cells,
        })
    }

    /// Returns the cell-wise sum of two matrices.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the matrices have different dimensions.
    pub fn checked_add(&self, other: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Clone + Add<Output = T>,
    {
        self.zip_with(other, |a, b| a + b)
    }

    /// Returns the cell-wise difference of two matrices.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the matrices have different dimensions.
    pub fn checked_sub(&self, other: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Clone + Sub<Output = T>,
    {
        self.zip_with(other, |a, b| a - b)
    }

    /// Returns the matrix product of `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if `self` does not have as many columns as `other` has
    /// rows.
    pub fn checked_mul(&self, other: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Clone + Default + Add<Output = T> + Mul<Output = T>,
    {
        if self.columns != other.rows {
            return Err(Error::DimensionMismatch {
                left: (self.rows, self.columns),
                right: (other.rows, other.columns),
            });
        }
        let mut cells = RedBlackMap::new();
        for row in 0..self.rows {
            for column in 0..other.columns {
                let mut sum = T::default();
                for k in 0..self.columns {
                    sum = sum + self.cell(row, k).clone() * other.cell(k, column).clone();
                }
                cells.push(row * other.columns + column, sum);
            }
        }
        Ok(Matrix {
            rows: self.rows,
            columns: other.columns,
            cells,
        })
    }

    /// Returns the determinant, expanding cofactors along the first row.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotSquare` if the matrix is not square.
    pub fn determinant(&self) -> Result<T>
    where
        T: Clone + Default + Add<Output = T> + Sub<Output = T> + Mul<Output = T>,
    {
        if self.rows != self.columns {
            return Err(Error::NotSquare);
        }
        Ok(self.cofactor_expansion())
    }

    fn cofactor_expansion(&self) -> T
    where
        T: Clone + Default + Add<Output = T> + Sub<Output = T> + Mul<Output = T>,
    {
        match self.rows {
            1 => self.cell(0, 0).clone(),
            2 => {
                self.cell(0, 0).clone() * self.cell(1, 1).clone()
                    - self.cell(0, 1).clone() * self.cell(1, 0).clone()
            },
            _ => {
                let mut det = T::default();
                for column in 0..self.columns {
                    let term =
                        self.cell(0, column).clone() * self.minor(0, column).cofactor_expansion();
                    det = if column % 2 == 0 { det + term } else { det - term };
                }
                det
            },
        }
    }

    // Returns the matrix without `skip_row` and `skip_column`.
    fn minor(&self, skip_row: usize, skip_column: usize) -> Matrix<T>
    where
        T: Clone,
    {
        let mut cells = RedBlackMap::new();
        for row in (0..self.rows).filter(|row| *row != skip_row) {
            for column in (0..self.columns).filter(|column| *column != skip_column) {
                cells.push(cells.len(), self.cell(row, column).clone());
            }
        }
        Matrix {
            rows: self.rows - 1,
            columns: self.columns - 1,
            cells,
        }
    }
}

impl<T> FromStr for Matrix<T>
where
    T: FromStr,
{
    type Err = Error;

    /// Parses whitespace separated tokens: the number of rows, the number of columns, then every
    /// cell in row-major order.
    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();
        let mut dimension = |name: &str| -> Result<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| Error::Parse(format!("missing {}", name)))?;
            token
                .parse()
                .map_err(|_| Error::Parse(format!("invalid {} `{}`", name, token)))
        };
        let rows = dimension("rows")?;
        let columns = dimension("columns")?;
        let size = cell_count(rows, columns)?;

        let mut cells = RedBlackMap::new();
        for index in 0..size {
            let token = tokens.next().ok_or_else(|| {
                Error::Parse(format!("expected {} values, found {}", size, index))
            })?;
            let value: T = token
                .parse()
                .map_err(|_| Error::Parse(format!("invalid value `{}`", token)))?;
            cells.push(index, value);
        }
        if let Some(token) = tokens.next() {
            return Err(Error::Parse(format!("unexpected trailing input `{}`", token)));
        }
        Ok(Matrix {
            rows,
            columns,
            cells,
        })
    }
}

impl<T> fmt::Display for Matrix<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.cells.iter() {
            if index % self.columns != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
            if index % self.columns == self.columns - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let MatrixData {
            rows,
            columns,
            cells,
        } = MatrixData::deserialize(deserializer)?;
        Matrix::from_tree(rows, columns, cells).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix;
    use crate::error::Error;
    use crate::red_black_tree::RedBlackMap;

    fn matrix_of(s: &str) -> Matrix<i64> {
        s.parse().unwrap()
    }

    #[test]
    fn test_new() {
        let matrix: Matrix<i64> = Matrix::new(2, 3).unwrap();
        assert_eq!(matrix.size(), 6);
        assert_eq!(matrix.get(1, 2), Ok(&0));
        assert_eq!(matrix.index(1, 2), 5);
        assert_eq!(Matrix::<i64>::new(0, 3), Err(Error::EmptyMatrix));
        assert_eq!(Matrix::<i64>::new(3, 0), Err(Error::EmptyMatrix));
    }

    #[test]
    fn test_from_tree() {
        let cells: RedBlackMap<usize, i64> = (0..4).map(|index| (index, index as i64)).collect();
        let matrix = Matrix::from_tree(2, 2, cells).unwrap();
        assert_eq!(matrix.get(1, 0), Ok(&2));

        let cells: RedBlackMap<usize, i64> = vec![(0, 0), (1, 1), (2, 2)].into_iter().collect();
        assert_eq!(
            Matrix::from_tree(2, 2, cells),
            Err(Error::LengthMismatch {
                expected: 4,
                actual: 3,
            }),
        );

        let cells: RedBlackMap<usize, i64> =
            vec![(0, 0), (1, 1), (2, 2), (4, 4)].into_iter().collect();
        assert_eq!(
            Matrix::from_tree(2, 2, cells),
            Err(Error::MissingCell { row: 1, column: 1 }),
        );
    }

    #[test]
    fn test_from_str_errors() {
        assert_eq!(
            "2".parse::<Matrix<i64>>(),
            Err(Error::Parse(String::from("missing columns"))),
        );
        assert_eq!(
            "2 2 1 2 3".parse::<Matrix<i64>>(),
            Err(Error::Parse(String::from("expected 4 values, found 3"))),
        );
        assert_eq!(
            "1 1 x".parse::<Matrix<i64>>(),
            Err(Error::Parse(String::from("invalid value `x`"))),
        );
        assert_eq!(
            "1 1 1 2".parse::<Matrix<i64>>(),
            Err(Error::Parse(String::from("unexpected trailing input `2`"))),
        );
        assert_eq!("0 1".parse::<Matrix<i64>>(), Err(Error::EmptyMatrix));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let mut matrix = matrix_of("1 2 1 2");
        assert_eq!(
            matrix.get(1, 0),
            Err(Error::IndexOutOfBounds { row: 1, column: 0 }),
        );
        assert_eq!(
            matrix.get_mut(0, 2),
            Err(Error::IndexOutOfBounds { row: 0, column: 2 }),
        );
        *matrix.get_mut(0, 1).unwrap() = 5;
        assert_eq!(matrix.get(0, 1), Ok(&5));
    }

    #[test]
    fn test_add_sub() {
        let a = matrix_of("2 2 1 2 3 4");
        let b = matrix_of("2 2 4 3 2 1");
        assert_eq!(a.checked_add(&b), Ok(matrix_of("2 2 5 5 5 5")));
        assert_eq!(a.checked_sub(&b), Ok(matrix_of("2 2 -3 -1 1 3")));
        assert_eq!(
            a.checked_add(&matrix_of("1 2 1 1")),
            Err(Error::DimensionMismatch {
                left: (2, 2),
                right: (1, 2),
            }),
        );
    }

    #[test]
    fn test_mul() {
        let a = matrix_of("2 3 1 2 3 4 5 6");
        let b = matrix_of("3 1 1 0 -1");
        assert_eq!(a.checked_mul(&b), Ok(matrix_of("2 1 -2 -2")));
        assert!(b.checked_mul(&b).is_err());
    }

    #[test]
    fn test_determinant() {
        assert_eq!(matrix_of("1 1 7").determinant(), Ok(7));
        assert_eq!(matrix_of("3 3 6 1 1 4 -2 5 2 8 7").determinant(), Ok(-306));
        assert_eq!(
            matrix_of("4 4 1 0 0 0 0 2 0 0 0 0 3 0 0 0 0 4").determinant(),
            Ok(24),
        );
        assert_eq!(matrix_of("2 3 1 2 3 4 5 6").determinant(), Err(Error::NotSquare));
    }

    #[test]
    fn test_traverse() {
        let mut matrix = matrix_of("2 2 1 2 3 4");
        assert_eq!(matrix.traverse(0, |acc, value| acc + value), 10);
        matrix.scale(-1);
        let values = matrix.traverse(Vec::new(), |mut acc, value| {
            acc.push(*value);
            acc
        });
        assert_eq!(values, vec![-1, -2, -3, -4]);
    }

    #[test]
    fn test_display() {
        assert_eq!(matrix_of("2 3 1 2 3 4 5 6").to_string(), "1 2 3\n4 5 6\n");
        assert_eq!(matrix_of("1 1 9").to_string(), "9\n");
    }
}
