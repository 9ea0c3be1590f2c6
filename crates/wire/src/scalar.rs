//! Fixed-width numeric types and their little-endian wire images.

use std::fmt::Display;
use std::str::FromStr;

/// A numeric type with a fixed-size little-endian representation.
pub trait WireScalar: Copy + Default + PartialEq + PartialOrd + Display + FromStr + Send + 'static {
    const SIZE: usize;
    const NAME: &'static str;

    fn put_le(self, out: &mut Vec<u8>);

    /// `bytes` must be exactly `SIZE` long.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

/// Integer types; their binary tag encodes width and signedness.
pub trait IntegerType: WireScalar {
    const SIGNED: bool;

    /// `size * (1 if signed else -1)`.
    fn tag() -> i8 {
        let size = Self::SIZE as i8;
        if Self::SIGNED {
            size
        } else {
            -size
        }
    }
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),*) => {
        $(
            impl WireScalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn put_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_wire_scalar!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

macro_rules! impl_integer_type {
    ($($ty:ty => $signed:expr),*) => {
        $(
            impl IntegerType for $ty {
                const SIGNED: bool = $signed;
            }
        )*
    };
}

impl_integer_type!(
    i8 => true, u8 => false, i16 => true, u16 => false,
    i32 => true, u32 => false, i64 => true, u64 => false
);
