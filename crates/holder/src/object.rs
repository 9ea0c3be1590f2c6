//! Holder for self-describing objects: matrices, vectors, compressed
//! matrices and matrix shapes.

use std::io::Write;

use kaldi_io_matrix::{CompressedMatrix, Matrix, MatrixShape, Real, Vector};
use kaldi_io_wire::{init_input_stream, init_output_stream, InputStream};

use crate::holder::report;
use crate::{Holder, HolderError};

/// A value with its own binary and text encodings.
pub trait KaldiObject: Default {
    /// Used in diagnostics.
    const NAME: &'static str;

    fn write_object<W: Write + ?Sized>(
        &self,
        os: &mut W,
        binary: bool,
    ) -> Result<(), HolderError>;

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError>;

    /// The part of `self` selected by `range`.
    fn extract_range(&self, _range: &str) -> Result<Self, HolderError> {
        Err(HolderError::RangeUnsupported(Self::NAME))
    }
}

impl<R: Real> KaldiObject for Matrix<R> {
    const NAME: &'static str = "Matrix";

    fn write_object<W: Write + ?Sized>(
        &self,
        os: &mut W,
        binary: bool,
    ) -> Result<(), HolderError> {
        Ok(self.write(os, binary)?)
    }

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError> {
        Ok(self.read(is, binary)?)
    }

    fn extract_range(&self, range: &str) -> Result<Self, HolderError> {
        Ok(Matrix::extract_range(self, range)?)
    }
}

impl<R: Real> KaldiObject for Vector<R> {
    const NAME: &'static str = "Vector";

    fn write_object<W: Write + ?Sized>(
        &self,
        os: &mut W,
        binary: bool,
    ) -> Result<(), HolderError> {
        Ok(self.write(os, binary)?)
    }

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError> {
        Ok(self.read(is, binary)?)
    }

    fn extract_range(&self, range: &str) -> Result<Self, HolderError> {
        Ok(Vector::extract_range(self, range)?)
    }
}

impl KaldiObject for CompressedMatrix {
    const NAME: &'static str = "CompressedMatrix";

    fn write_object<W: Write + ?Sized>(
        &self,
        os: &mut W,
        binary: bool,
    ) -> Result<(), HolderError> {
        Ok(self.write(os, binary)?)
    }

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError> {
        Ok(self.read(is, binary)?)
    }

    fn extract_range(&self, range: &str) -> Result<Self, HolderError> {
        Ok(CompressedMatrix::extract_range(self, range)?)
    }
}

impl KaldiObject for MatrixShape {
    const NAME: &'static str = "MatrixShape";

    fn write_object<W: Write + ?Sized>(
        &self,
        _os: &mut W,
        _binary: bool,
    ) -> Result<(), HolderError> {
        Err(HolderError::ReadOnly(Self::NAME))
    }

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError> {
        *self = MatrixShape::read(is, binary)?;
        Ok(())
    }
}

/// Holds one [`KaldiObject`]; every read starts from a fresh value.
#[derive(Debug)]
pub struct KaldiObjectHolder<T> {
    value: Option<T>,
}

impl<T> Default for KaldiObjectHolder<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: KaldiObject> KaldiObjectHolder<T> {
    fn write_value<W: Write + ?Sized>(
        os: &mut W,
        binary: bool,
        value: &T,
    ) -> Result<(), HolderError> {
        init_output_stream(os, binary)?;
        value.write_object(os, binary)
    }

    fn read_value(is: &mut InputStream) -> Result<T, HolderError> {
        let binary = init_input_stream(is)?;
        let mut value = T::default();
        value.read_object(is, binary)?;
        Ok(value)
    }

    /// Takes the value out, leaving the holder empty.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T: KaldiObject> Holder for KaldiObjectHolder<T> {
    type Value = T;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &T) -> bool {
        report(T::NAME, Self::write_value(os, binary, value))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        self.value = None;
        match Self::read_value(is) {
            Ok(value) => {
                self.value = Some(value);
                true
            }
            Err(err) => report::<()>(T::NAME, Err(err)),
        }
    }

    fn value(&self) -> &T {
        self.value
            .as_ref()
            .unwrap_or_else(|| panic!("KaldiObjectHolder<{}>::value(), no value", T::NAME))
    }

    fn clear(&mut self) {
        self.value = None;
    }

    /// Logs and returns `false` for an invalid range.
    ///
    /// # Panics
    ///
    /// If `T` has no notion of range, or `other` holds no value.
    fn extract_range(&mut self, other: &Self, range: &str) -> bool {
        match other.value().extract_range(range) {
            Ok(value) => {
                self.value = Some(value);
                true
            }
            Err(HolderError::RangeUnsupported(name)) => {
                panic!("extract_range is not defined for {name}")
            }
            Err(err) => report::<()>(T::NAME, Err(err)),
        }
    }
}

pub type MatrixHolder<R> = KaldiObjectHolder<Matrix<R>>;
pub type VectorHolder<R> = KaldiObjectHolder<Vector<R>>;
pub type CompressedMatrixHolder = KaldiObjectHolder<CompressedMatrix>;
pub type MatrixShapeHolder = KaldiObjectHolder<MatrixShape>;
