use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::math::vector::Array1;

/// Row-major 2D container. Rows are genes, columns are features (or classes
/// for probability matrices).
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn row_slice_mut(&mut self, row: usize) -> &mut [T] {
        let start = self.offset(row, 0);
        let cols = self.cols;
        &mut self.data[start..start + cols]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |row| self.row_slice(row))
    }

    pub fn column(&self, col: usize) -> Array1<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        (0..self.rows).map(|row| self[(row, col)].clone()).collect()
    }

    pub fn select_rows(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &row in indices {
            data.extend_from_slice(self.row_slice(row));
        }
        Array2 {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Keep the given columns, in the given order.
    pub fn select_columns(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(self.rows * indices.len());
        for row in 0..self.rows {
            let slice = self.row_slice(row);
            data.extend(indices.iter().map(|&col| slice[col].clone()));
        }
        Array2 {
            data,
            rows: self.rows,
            cols: indices.len(),
        }
    }
}

impl<T: Clone> Array2<T> {
    pub fn from_elem(shape: (usize, usize), value: T) -> Self {
        let (rows, cols) = shape;
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}
