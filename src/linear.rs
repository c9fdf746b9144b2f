//! Dense storage for the score grid.

use std::ops::{Index, IndexMut};

/// A row-major matrix of `f64`, indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}
impl Matrix {
    pub fn allocate(rows: usize, cols: usize) -> Self {
        let (len, overflow) = rows.overflowing_mul(cols);
        assert!(!overflow, "allocation of a {rows}x{cols} matrix failed due to overflow");
        Self {
            data: vec![0.0; len],
            rows,
            cols,
        }
    }

    /// A `dim` by `dim` matrix of zeros.
    pub fn square(dim: usize) -> Self {
        Self::allocate(dim, dim)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// All cells in row-major order.
    pub fn flatten(&self) -> &[f64] {
        &self.data
    }

    pub fn flatten_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) lies outside a {}x{} matrix",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_row_major() {
        let mut matrix = Matrix::allocate(3, 4);
        assert_eq!(3, matrix.rows());
        assert_eq!(4, matrix.cols());
        assert!(!matrix.is_square());
        for row in 0..matrix.rows() {
            for col in 0..matrix.cols() {
                assert_eq!(0.0, matrix[(row, col)]);
                matrix[(row, col)] = (row * 10 + col) as f64;
            }
        }
        assert_eq!(21.0, matrix[(2, 1)]);
        assert_eq!(&[10.0, 11.0, 12.0, 13.0], &matrix.flatten()[4..8]);
        assert_eq!(12, matrix.flatten().len());
    }

    #[test]
    fn square() {
        let matrix = Matrix::square(3);
        assert!(matrix.is_square());
        assert_eq!(9, matrix.flatten().len());
    }

    #[test]
    #[should_panic = "cell (3, 0) lies outside a 3x3 matrix"]
    fn row_overflow_panics() {
        let matrix = Matrix::square(3);
        let _ = matrix[(3, 0)];
    }

    #[test]
    #[should_panic = "cell (0, 3) lies outside a 3x3 matrix"]
    fn col_overflow_panics() {
        let matrix = Matrix::square(3);
        let _ = matrix[(0, 3)];
    }

    #[test]
    #[should_panic = "overflow"]
    fn allocate_overflow_panics() {
        Matrix::allocate(usize::MAX, 2);
    }
}
