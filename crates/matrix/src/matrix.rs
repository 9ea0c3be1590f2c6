//! Row-major dense matrix with 16-byte aligned row stride.

use crate::{MatrixResizeType, Real};

/// A dense `rows x cols` matrix.
///
/// Rows are stored `stride` elements apart, where the stride is the column
/// count rounded up to a multiple of 16 bytes. An empty matrix has no
/// storage and a stride of zero. Rows are exposed as slices of exactly
/// `num_cols()` elements.
#[derive(Clone)]
pub struct Matrix<R> {
    data: Vec<R>,
    rows: usize,
    cols: usize,
    stride: usize,
}

/// Stride, in elements, for rows of `cols` elements of `R`.
pub fn aligned_stride<R: Real>(cols: usize) -> usize {
    let per_block = 16 / R::SIZE;
    cols + (per_block - cols % per_block) % per_block
}

impl<R: Real> Default for Matrix<R> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
            stride: 0,
        }
    }
}

impl<R: Real> Matrix<R> {
    /// A zero-filled matrix. Either dimension being zero yields an empty
    /// matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut m = Self::default();
        m.resize(rows, cols, MatrixResizeType::SetZero);
        m
    }

    /// Builds a matrix from equally long rows; `None` if they are ragged.
    pub fn from_rows<V: AsRef<[R]>>(rows: &[V]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        let mut m = Self::new(rows.len(), cols);
        if !m.is_empty() {
            for (i, row) in rows.iter().enumerate() {
                m.row_mut(i).copy_from_slice(row.as_ref());
            }
        }
        Some(m)
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn resize(&mut self, rows: usize, cols: usize, resize_type: MatrixResizeType) {
        let (rows, cols) = if rows == 0 || cols == 0 { (0, 0) } else { (rows, cols) };
        if resize_type == MatrixResizeType::CopyData && !self.is_empty() && rows != 0 {
            if rows == self.rows && cols == self.cols {
                return;
            }
            let fill = if rows > self.rows || cols > self.cols {
                MatrixResizeType::SetZero
            } else {
                MatrixResizeType::Undefined
            };
            let mut tmp = Self::default();
            tmp.resize(rows, cols, fill);
            let (keep_rows, keep_cols) = (rows.min(self.rows), cols.min(self.cols));
            for i in 0..keep_rows {
                tmp.row_mut(i)[..keep_cols].copy_from_slice(&self.row(i)[..keep_cols]);
            }
            self.swap(&mut tmp);
            return;
        }
        if rows == self.rows && cols == self.cols {
            if resize_type != MatrixResizeType::Undefined {
                self.set_zero();
            }
            return;
        }
        if rows == 0 {
            *self = Self::default();
            return;
        }
        let stride = aligned_stride::<R>(cols);
        if resize_type == MatrixResizeType::Undefined {
            self.data.resize(rows * stride, R::default());
        } else {
            self.data.clear();
            self.data.resize(rows * stride, R::default());
        }
        self.rows = rows;
        self.cols = cols;
        self.stride = stride;
    }

    pub fn set_zero(&mut self) {
        self.data.iter_mut().for_each(|v| *v = R::default());
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// # Panics
    ///
    /// If `i >= num_rows()`.
    pub fn row(&self, i: usize) -> &[R] {
        assert!(i < self.rows, "row index {i} out of range for {} rows", self.rows);
        let start = i * self.stride;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [R] {
        assert!(i < self.rows, "row index {i} out of range for {} rows", self.rows);
        let start = i * self.stride;
        &mut self.data[start..start + self.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[R]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn get(&self, r: usize, c: usize) -> R {
        self.row(r)[c]
    }

    pub fn set(&mut self, r: usize, c: usize, value: R) {
        self.row_mut(r)[c] = value;
    }

    pub fn column(&self, c: usize) -> Vec<R> {
        assert!(c < self.cols, "column index {c} out of range for {} cols", self.cols);
        self.rows().map(|row| row[c]).collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<R>> {
        self.rows().map(<[R]>::to_vec).collect()
    }

    /// Copies `other` into `self`, converting precision.
    ///
    /// # Panics
    ///
    /// If the dimensions differ.
    pub fn copy_from_matrix<S: Real>(&mut self, other: &Matrix<S>) {
        assert!(
            self.rows == other.num_rows() && self.cols == other.num_cols(),
            "copy_from_matrix: {}x{} vs. {}x{}",
            self.rows,
            self.cols,
            other.num_rows(),
            other.num_cols()
        );
        for i in 0..self.rows {
            for (dst, &src) in self.row_mut(i).iter_mut().zip(other.row(i)) {
                *dst = R::from_f64(src.to_f64());
            }
        }
    }

    /// A copy of `other` at this precision.
    pub fn from_matrix<S: Real>(other: &Matrix<S>) -> Self {
        let mut m = Self::new(other.num_rows(), other.num_cols());
        m.copy_from_matrix(other);
        m
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::new(self.cols, self.rows);
        for i in 0..self.rows {
            for (j, &v) in self.row(i).iter().enumerate() {
                t.set(j, i, v);
            }
        }
        t
    }

    /// Copies the block starting at (`row_offset`, `col_offset`).
    ///
    /// # Panics
    ///
    /// If the block does not fit.
    pub fn range(&self, row_offset: usize, rows: usize, col_offset: usize, cols: usize) -> Self {
        assert!(
            row_offset + rows <= self.rows && col_offset + cols <= self.cols,
            "range {row_offset}+{rows}, {col_offset}+{cols} exceeds {}x{}",
            self.rows,
            self.cols
        );
        let mut m = Self::new(rows, cols);
        if !m.is_empty() {
            for i in 0..rows {
                m.row_mut(i)
                    .copy_from_slice(&self.row(row_offset + i)[col_offset..col_offset + cols]);
            }
        }
        m
    }

    /// Element-wise `self += other`.
    ///
    /// # Panics
    ///
    /// If the dimensions differ.
    pub fn add_matrix(&mut self, other: &Self) {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "add_matrix: dimension mismatch"
        );
        for i in 0..self.rows {
            for (dst, &src) in self.row_mut(i).iter_mut().zip(other.row(i)) {
                *dst += src;
            }
        }
    }

    /// Smallest element; `None` when empty.
    pub fn min(&self) -> Option<R> {
        self.rows()
            .flat_map(|row| row.iter().copied())
            .reduce(|a, b| if b < a { b } else { a })
    }

    pub fn max(&self) -> Option<R> {
        self.rows()
            .flat_map(|row| row.iter().copied())
            .reduce(|a, b| if b > a { b } else { a })
    }
}

impl<R: Real> PartialEq for Matrix<R> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.rows().eq(other.rows())
    }
}

impl<R: Real> std::fmt::Debug for Matrix<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &self.to_rows())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride() {
        assert_eq!(aligned_stride::<f32>(1), 4);
        assert_eq!(aligned_stride::<f32>(4), 4);
        assert_eq!(aligned_stride::<f32>(5), 8);
        assert_eq!(aligned_stride::<f64>(3), 4);
        assert_eq!(Matrix::<f32>::new(2, 3).stride(), 4);
        assert_eq!(Matrix::<f32>::new(0, 3).stride(), 0);
        assert!(Matrix::<f64>::new(3, 0).is_empty());
    }

    #[test]
    fn test_resize_copy_data() {
        let mut m = Matrix::<f32>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        m.resize(3, 3, MatrixResizeType::CopyData);
        assert_eq!(
            m.to_rows(),
            vec![vec![1.0, 2.0, 0.0], vec![3.0, 4.0, 0.0], vec![0.0, 0.0, 0.0]]
        );
        m.resize(1, 2, MatrixResizeType::CopyData);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_resize_set_zero() {
        let mut m = Matrix::<f64>::from_rows(&[vec![1.0, 2.0]]).unwrap();
        m.resize(1, 2, MatrixResizeType::SetZero);
        assert_eq!(m.to_rows(), vec![vec![0.0, 0.0]]);
        m.resize(0, 0, MatrixResizeType::SetZero);
        assert!(m.is_empty());
        assert_eq!(m.stride(), 0);
    }

    #[test]
    fn test_ragged_rows() {
        assert!(Matrix::<f32>::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn test_transpose_and_range() {
        let m = Matrix::<f32>::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(
            m.transpose().to_rows(),
            vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]
        );
        assert_eq!(m.range(1, 1, 1, 2).to_rows(), vec![vec![5.0, 6.0]]);
        assert_eq!(m.column(2), vec![3.0, 6.0]);
        assert_eq!(m.min(), Some(1.0));
        assert_eq!(m.max(), Some(6.0));
    }

    #[test]
    fn test_cross_precision_copy() {
        let m = Matrix::<f64>::from_rows(&[vec![0.1, 1e-3]]).unwrap();
        let single = Matrix::<f32>::from_matrix(&m);
        assert_eq!(single.row(0), &[0.1f64 as f32, 1e-3f64 as f32]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range() {
        Matrix::<f32>::new(2, 2).row(2);
    }
}
