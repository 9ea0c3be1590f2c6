//! Dense matrices and vectors, their binary and text codecs, the
//! compressed matrix format, HTK feature files and range extraction.
//!
//! Binary payloads carry a precision token (`FM`, `DM`, `FV`, `DV`, or one
//! of the `CM` compressed tokens). Readers accept any of them regardless of
//! the element type of the destination and convert on the fly.

pub mod compressed;
mod error;
mod htk;
mod matrix;
mod matrix_io;
mod range;
mod real;
mod shape;
mod text;
mod vector;
mod vector_io;

pub use compressed::{CompressedMatrix, CompressionMethod};
pub use error::MatrixError;
pub use htk::{read_htk, write_htk, HtkHeader};
pub use matrix::{aligned_stride, Matrix};
pub use range::{
    extract_range_specifier, parse_matrix_range, parse_vector_range, MatrixRange, VectorRange,
    LENGTH_TOLERANCE,
};
pub use real::{ElementWidth, MatrixResizeType, Real};
pub use shape::MatrixShape;
pub use vector::Vector;
