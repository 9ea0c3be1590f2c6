//! Floating point element types and resize policy.

use std::fmt::{Debug, LowerExp};
use std::ops::{Add, AddAssign};

use kaldi_io_wire::{BasicType, WireScalar};

/// `f32` or `f64`.
pub trait Real:
    WireScalar + BasicType + Debug + LowerExp + Into<f64> + Add<Output = Self> + AddAssign
{
    const MATRIX_TOKEN: &'static str;
    const VECTOR_TOKEN: &'static str;
    const WIDTH: ElementWidth;

    /// Rounds to nearest when narrowing.
    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64 {
        self.into()
    }
}

impl Real for f32 {
    const MATRIX_TOKEN: &'static str = "FM";
    const VECTOR_TOKEN: &'static str = "FV";
    const WIDTH: ElementWidth = ElementWidth::Single;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Real for f64 {
    const MATRIX_TOKEN: &'static str = "DM";
    const VECTOR_TOKEN: &'static str = "DV";
    const WIDTH: ElementWidth = ElementWidth::Double;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Precision of a serialized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementWidth {
    Single,
    Double,
}

impl ElementWidth {
    pub fn size(self) -> usize {
        match self {
            ElementWidth::Single => 4,
            ElementWidth::Double => 8,
        }
    }

    pub fn matrix_token(self) -> &'static str {
        match self {
            ElementWidth::Single => "FM",
            ElementWidth::Double => "DM",
        }
    }

    pub fn vector_token(self) -> &'static str {
        match self {
            ElementWidth::Single => "FV",
            ElementWidth::Double => "DV",
        }
    }

    /// Decodes one little-endian element of this width.
    pub fn decode(self, bytes: &[u8]) -> f64 {
        match self {
            ElementWidth::Single => f32::from_le_slice(bytes) as f64,
            ElementWidth::Double => f64::from_le_slice(bytes),
        }
    }
}

/// What happens to the contents when a matrix or vector changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixResizeType {
    /// Every element becomes zero.
    #[default]
    SetZero,
    /// Contents are unspecified; existing storage is reused.
    Undefined,
    /// The overlapping block is kept; new elements are zero.
    CopyData,
}
