use std::ops::{Deref, DerefMut};

use crate::{MatrixResizeType, Real};

/// A dense vector of `f32` or `f64`.
#[derive(Clone, Default, PartialEq)]
pub struct Vector<R> {
    data: Vec<R>,
}

impl<R: Real> Vector<R> {
    pub fn new(dim: usize) -> Self {
        Self {
            data: vec![R::default(); dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.data.len()
    }

    pub fn resize(&mut self, dim: usize, resize_type: MatrixResizeType) {
        match resize_type {
            MatrixResizeType::SetZero => {
                self.data.clear();
                self.data.resize(dim, R::default());
            }
            MatrixResizeType::Undefined | MatrixResizeType::CopyData => {
                self.data.resize(dim, R::default());
            }
        }
    }

    pub fn set_zero(&mut self) {
        self.data.iter_mut().for_each(|v| *v = R::default());
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.data, &mut other.data);
    }

    pub fn from_vector<S: Real>(other: &Vector<S>) -> Self {
        other.iter().map(|&v| R::from_f64(v.to_f64())).collect()
    }

    /// Copy of `dim` elements starting at `offset`.
    ///
    /// # Panics
    ///
    /// If the range exceeds the vector.
    pub fn range(&self, offset: usize, dim: usize) -> Self {
        Self::from(self.data[offset..offset + dim].to_vec())
    }

    /// # Panics
    ///
    /// If the dimensions differ.
    pub fn add_vector(&mut self, other: &Self) {
        assert_eq!(self.dim(), other.dim(), "add_vector: dimension mismatch");
        for (dst, &src) in self.data.iter_mut().zip(other.iter()) {
            *dst += src;
        }
    }

    pub fn into_vec(self) -> Vec<R> {
        self.data
    }
}

impl<R> From<Vec<R>> for Vector<R> {
    fn from(data: Vec<R>) -> Self {
        Self { data }
    }
}

impl<R> FromIterator<R> for Vector<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<R> Deref for Vector<R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        &self.data
    }
}

impl<R> DerefMut for Vector<R> {
    fn deref_mut(&mut self) -> &mut [R] {
        &mut self.data
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for Vector<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}
