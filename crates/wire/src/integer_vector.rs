//! Vectors of integers and of integer pairs.
//!
//! Binary: one element-size byte, an i32 count, then raw elements.
//! Text: `[ 1 2 3 ]` and `[ 1,2 3,4 ]`, each followed by a newline.

use std::io::Write;

use kaldi_io_util::char_to_string;

use crate::basic::read_word;
use crate::scalar::IntegerType;
use crate::{InputStream, WireError};

fn expect_open_bracket(is: &mut InputStream) -> Result<(), WireError> {
    is.skip_whitespace()?;
    match is.get()? {
        Some(b'[') => Ok(()),
        Some(other) => Err(WireError::Malformed(format!(
            "expected '[' at start of integer vector, saw {}",
            char_to_string(other)
        ))),
        None => Err(WireError::UnexpectedEof(is.position())),
    }
}

/// True once the closing `]` has been consumed.
fn at_close_bracket(is: &mut InputStream) -> Result<bool, WireError> {
    is.skip_whitespace()?;
    match is.peek()? {
        Some(b']') => {
            is.get()?;
            Ok(true)
        }
        Some(_) => Ok(false),
        None => Err(WireError::UnexpectedEof(is.position())),
    }
}

fn payload_len(len: usize, elem_size: usize) -> Result<usize, WireError> {
    len.checked_mul(elem_size).ok_or_else(|| {
        WireError::Malformed(format!("integer vector of {len} elements is too large"))
    })
}

fn parse_element<T: IntegerType>(word: &str, position: u64) -> Result<T, WireError> {
    word.parse().map_err(|_| WireError::Parse {
        text: word.to_string(),
        kind: T::NAME,
        position,
    })
}

fn too_long(len: usize) -> WireError {
    WireError::Malformed(format!("vector too long to write: {len}"))
}

pub fn write_integer_vector<T: IntegerType, W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    values: &[T],
) -> Result<(), WireError> {
    if binary {
        // The i32 count is written raw, without its own type tag.
        let len = i32::try_from(values.len()).map_err(|_| too_long(values.len()))?;
        let mut out = Vec::with_capacity(5 + values.len() * T::SIZE);
        out.push(T::SIZE as u8);
        out.extend_from_slice(&len.to_le_bytes());
        for &value in values {
            value.put_le(&mut out);
        }
        os.write_all(&out)?;
    } else {
        let mut line = String::from("[ ");
        for value in values {
            line.push_str(&value.to_string());
            line.push(' ');
        }
        line.push_str("]\n");
        os.write_all(line.as_bytes())?;
    }
    Ok(())
}

pub fn read_integer_vector<T: IntegerType>(
    is: &mut InputStream,
    binary: bool,
) -> Result<Vec<T>, WireError> {
    if binary {
        let len = read_raw_len(is, T::SIZE)?;
        let bytes = is.read_vec(payload_len(len, T::SIZE)?)?;
        return Ok(bytes.chunks_exact(T::SIZE).map(T::from_le_slice).collect());
    }
    expect_open_bracket(is)?;
    let mut values = Vec::new();
    while !at_close_bracket(is)? {
        let (word, position) = read_word(is)?;
        values.push(parse_element(&word, position)?);
    }
    Ok(values)
}

pub fn write_integer_pair_vector<T: IntegerType, W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    values: &[(T, T)],
) -> Result<(), WireError> {
    if binary {
        let len = i32::try_from(values.len()).map_err(|_| too_long(values.len()))?;
        let mut out = Vec::with_capacity(5 + values.len() * 2 * T::SIZE);
        out.push(T::SIZE as u8);
        out.extend_from_slice(&len.to_le_bytes());
        for &(first, second) in values {
            first.put_le(&mut out);
            second.put_le(&mut out);
        }
        os.write_all(&out)?;
    } else {
        let mut line = String::from("[ ");
        for (first, second) in values {
            line.push_str(&format!("{first},{second} "));
        }
        line.push_str("]\n");
        os.write_all(line.as_bytes())?;
    }
    Ok(())
}

pub fn read_integer_pair_vector<T: IntegerType>(
    is: &mut InputStream,
    binary: bool,
) -> Result<Vec<(T, T)>, WireError> {
    if binary {
        let len = read_raw_len(is, T::SIZE)?;
        let bytes = is.read_vec(payload_len(len, 2 * T::SIZE)?)?;
        return Ok(bytes
            .chunks_exact(2 * T::SIZE)
            .map(|pair| {
                (
                    T::from_le_slice(&pair[..T::SIZE]),
                    T::from_le_slice(&pair[T::SIZE..]),
                )
            })
            .collect());
    }
    expect_open_bracket(is)?;
    let mut values = Vec::new();
    while !at_close_bracket(is)? {
        let (word, position) = read_word(is)?;
        let (first, second) = word.split_once(',').ok_or_else(|| {
            WireError::Malformed(format!("expected ',' in integer pair, saw {word:?}"))
        })?;
        values.push((
            parse_element(first, position)?,
            parse_element(second, position)?,
        ));
    }
    Ok(values)
}

fn read_raw_len(is: &mut InputStream, size: usize) -> Result<usize, WireError> {
    match is.get()? {
        Some(found) if found as usize == size => {}
        Some(found) => {
            return Err(WireError::ElementSize {
                expected: size,
                found: char_to_string(found),
            })
        }
        None => return Err(WireError::UnexpectedEof(is.position())),
    }
    let len = i32::from_le_bytes(is.read_array::<4>()?);
    usize::try_from(len).map_err(|_| WireError::Malformed(format!("negative vector size {len}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_layout() {
        let mut buf = Vec::new();
        write_integer_vector(&mut buf, true, &[1i32, -1]).unwrap();
        assert_eq!(
            buf,
            [4, 2, 0, 0, 0, 1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]
        );
        let mut is = InputStream::from_bytes(buf);
        assert_eq!(read_integer_vector::<i32>(&mut is, true).unwrap(), vec![1, -1]);
    }

    #[test]
    fn test_element_size_mismatch() {
        let mut buf = Vec::new();
        write_integer_vector(&mut buf, true, &[1i16]).unwrap();
        let mut is = InputStream::from_bytes(buf);
        assert!(matches!(
            read_integer_vector::<i32>(&mut is, true),
            Err(WireError::ElementSize { expected: 4, .. })
        ));
    }

    #[test]
    fn test_truncated_huge_length() {
        let mut buf = vec![8];
        buf.extend_from_slice(&i32::MAX.to_le_bytes());
        buf.extend_from_slice(&7i64.to_le_bytes());
        let mut is = InputStream::from_bytes(buf.clone());
        assert!(matches!(
            read_integer_vector::<i64>(&mut is, true),
            Err(WireError::UnexpectedEof(_))
        ));
        let mut is = InputStream::from_bytes(buf);
        assert!(matches!(
            read_integer_pair_vector::<i64>(&mut is, true),
            Err(WireError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_text() {
        let mut buf = Vec::new();
        write_integer_vector(&mut buf, false, &[3u8, 200]).unwrap();
        assert_eq!(buf, b"[ 3 200 ]\n");
        let mut is = InputStream::from_bytes(buf);
        assert_eq!(read_integer_vector::<u8>(&mut is, false).unwrap(), vec![3, 200]);

        let mut is = InputStream::from_bytes(b"[]".to_vec());
        assert!(read_integer_vector::<i32>(&mut is, false).unwrap().is_empty());
    }

    #[test]
    fn test_pairs() {
        let pairs = vec![(1i32, 2), (-3, 4)];
        for binary in [true, false] {
            let mut buf = Vec::new();
            write_integer_pair_vector(&mut buf, binary, &pairs).unwrap();
            if !binary {
                assert_eq!(buf, b"[ 1,2 -3,4 ]\n");
            }
            let mut is = InputStream::from_bytes(buf);
            assert_eq!(read_integer_pair_vector::<i32>(&mut is, binary).unwrap(), pairs);
        }
    }

    #[test]
    fn test_missing_bracket() {
        let mut is = InputStream::from_bytes(b"1 2 ]".to_vec());
        assert!(read_integer_vector::<i32>(&mut is, false).is_err());
    }
}
