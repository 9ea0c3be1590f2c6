//! Scalar encoding: integers, `bool`, `f32` and `f64`.

use std::io::Write;
use std::ops::AddAssign;

use kaldi_io_util::char_to_string;

use crate::scalar::{IntegerType, WireScalar};
use crate::{InputStream, WireError};

/// A scalar with a binary and a text encoding.
pub trait BasicType: Sized + Copy {
    fn write_binary<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError>;
    fn read_binary(is: &mut InputStream) -> Result<Self, WireError>;
    fn write_text<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError>;
    fn read_text(is: &mut InputStream) -> Result<Self, WireError>;

    fn write_basic<W: Write + ?Sized>(self, os: &mut W, binary: bool) -> Result<(), WireError> {
        if binary {
            self.write_binary(os)
        } else {
            self.write_text(os)
        }
    }

    fn read_basic(is: &mut InputStream, binary: bool) -> Result<Self, WireError> {
        if binary {
            Self::read_binary(is)
        } else {
            Self::read_text(is)
        }
    }
}

pub fn write_basic_type<T: BasicType, W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    value: T,
) -> Result<(), WireError> {
    value.write_basic(os, binary)
}

pub fn read_basic_type<T: BasicType>(is: &mut InputStream, binary: bool) -> Result<T, WireError> {
    T::read_basic(is, binary)
}

/// Reads a value and adds it to `target`.
pub fn read_basic_type_add<T: BasicType + AddAssign>(
    is: &mut InputStream,
    binary: bool,
    target: &mut T,
) -> Result<(), WireError> {
    *target += T::read_basic(is, binary)?;
    Ok(())
}

/// Shortest representation that parses back to the same value; very large
/// and very small magnitudes use exponent notation.
pub fn format_real<R>(value: R) -> String
where
    R: Into<f64> + std::fmt::Display + std::fmt::LowerExp + Copy,
{
    let magnitude = value.into().abs();
    if magnitude.is_finite() && magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Skips whitespace, then reads one whitespace-delimited word.
pub(crate) fn read_word(is: &mut InputStream) -> Result<(String, u64), WireError> {
    is.skip_whitespace()?;
    let position = is.position();
    let bytes = is.read_non_whitespace()?;
    if bytes.is_empty() {
        return Err(WireError::UnexpectedEof(position));
    }
    Ok((String::from_utf8_lossy(&bytes).into_owned(), position))
}

fn read_integer_binary<T: IntegerType>(is: &mut InputStream) -> Result<T, WireError> {
    let found = is.get_byte()? as i8;
    let expected = T::tag();
    if found != expected {
        return Err(WireError::IntegerType { found, expected });
    }
    let mut buf = [0u8; 8];
    is.read_exact_or_eof(&mut buf[..T::SIZE])?;
    Ok(T::from_le_slice(&buf[..T::SIZE]))
}

fn write_integer_binary<T: IntegerType, W: Write + ?Sized>(
    value: T,
    os: &mut W,
) -> Result<(), WireError> {
    let mut out = Vec::with_capacity(1 + T::SIZE);
    out.push(T::tag() as u8);
    value.put_le(&mut out);
    os.write_all(&out)?;
    Ok(())
}

macro_rules! impl_integer_basic {
    ($($ty:ty => $text:ty),*) => {
        $(
            impl BasicType for $ty {
                fn write_binary<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
                    write_integer_binary(self, os)
                }

                fn read_binary(is: &mut InputStream) -> Result<Self, WireError> {
                    read_integer_binary(is)
                }

                fn write_text<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
                    write!(os, "{} ", <$text>::from(self))?;
                    Ok(())
                }

                fn read_text(is: &mut InputStream) -> Result<Self, WireError> {
                    let (word, position) = read_word(is)?;
                    word.parse::<$text>()
                        .ok()
                        .and_then(|wide| <$ty>::try_from(wide).ok())
                        .ok_or(WireError::Parse {
                            text: word,
                            kind: stringify!($ty),
                            position,
                        })
                }
            }
        )*
    };
}

// One-byte integers go through i16 in text so they print as numbers.
impl_integer_basic!(
    i8 => i16, u8 => i16, i16 => i16, u16 => u16,
    i32 => i32, u32 => u32, i64 => i64, u64 => u64
);

impl BasicType for bool {
    fn write_binary<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        os.write_all(if self { b"T" } else { b"F" })?;
        Ok(())
    }

    fn read_binary(is: &mut InputStream) -> Result<Self, WireError> {
        read_bool(is)
    }

    fn write_text<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        os.write_all(if self { b"T " } else { b"F " })?;
        Ok(())
    }

    fn read_text(is: &mut InputStream) -> Result<Self, WireError> {
        is.skip_whitespace()?;
        read_bool(is)
    }
}

fn read_bool(is: &mut InputStream) -> Result<bool, WireError> {
    match is.peek()? {
        Some(b'T') => {
            is.get()?;
            Ok(true)
        }
        Some(b'F') => {
            is.get()?;
            Ok(false)
        }
        Some(other) => Err(WireError::Bool(char_to_string(other))),
        None => Err(WireError::UnexpectedEof(is.position())),
    }
}

/// Reads the size byte and payload of a binary float of either width.
fn read_real_binary(is: &mut InputStream) -> Result<f64, WireError> {
    match is.get_byte()? {
        4 => Ok(f32::from_le_bytes(is.read_array::<4>()?) as f64),
        8 => Ok(f64::from_le_bytes(is.read_array::<8>()?)),
        other => Err(WireError::FloatSize(char_to_string(other))),
    }
}

fn read_real_text<R: WireScalar>(is: &mut InputStream) -> Result<R, WireError> {
    let (word, position) = read_word(is)?;
    kaldi_io_util::strings::convert_string_to_real(&word).ok_or(WireError::Parse {
        text: word,
        kind: R::NAME,
        position,
    })
}

impl BasicType for f32 {
    fn write_binary<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        let mut out = vec![4u8];
        self.put_le(&mut out);
        os.write_all(&out)?;
        Ok(())
    }

    fn read_binary(is: &mut InputStream) -> Result<Self, WireError> {
        Ok(read_real_binary(is)? as f32)
    }

    fn write_text<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        write!(os, "{} ", format_real(self))?;
        Ok(())
    }

    fn read_text(is: &mut InputStream) -> Result<Self, WireError> {
        read_real_text(is)
    }
}

impl BasicType for f64 {
    fn write_binary<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        let mut out = vec![8u8];
        self.put_le(&mut out);
        os.write_all(&out)?;
        Ok(())
    }

    fn read_binary(is: &mut InputStream) -> Result<Self, WireError> {
        read_real_binary(is)
    }

    fn write_text<W: Write + ?Sized>(self, os: &mut W) -> Result<(), WireError> {
        write!(os, "{} ", format_real(self))?;
        Ok(())
    }

    fn read_text(is: &mut InputStream) -> Result<Self, WireError> {
        read_real_text(is)
    }
}
