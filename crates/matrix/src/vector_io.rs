//! Binary and text encodings of [`Vector`].

use std::io::Write;

use kaldi_io_wire::{format_real, read_token, write_token, InputStream};

use crate::matrix_io::{
    decode_elements, payload_size, read_dimension, read_payload, write_dimension, write_elements,
};
use crate::text::{eat_line_end, parse_element, read_open_bracket, scan_number, truncate};
use crate::{ElementWidth, MatrixError, MatrixResizeType, Real, Vector};

impl<R: Real> Vector<R> {
    pub fn write<W: Write + ?Sized>(&self, os: &mut W, binary: bool) -> Result<(), MatrixError> {
        if binary {
            write_token(os, true, R::VECTOR_TOKEN)?;
            write_dimension(os, self.dim())?;
            write_elements(os, self)?;
        } else {
            let mut text = String::from(" [ ");
            for &v in self.iter() {
                text.push_str(&format_real(v));
                text.push(' ');
            }
            text.push_str("]\n");
            os.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    pub fn read(&mut self, is: &mut InputStream, binary: bool) -> Result<(), MatrixError> {
        if binary {
            let token = read_token(is, true)?;
            let width = match token.as_str() {
                "FV" => ElementWidth::Single,
                "DV" => ElementWidth::Double,
                _ => return Err(MatrixError::UnexpectedVectorToken(truncate(token))),
            };
            let dim = read_dimension(is)?;
            let bytes = read_payload(is, payload_size(1, dim, width.size())?, "vector")?;
            self.resize(dim, MatrixResizeType::Undefined);
            decode_elements(width, &bytes, self);
            Ok(())
        } else {
            self.read_text(is)
        }
    }

    /// Reads a vector and adds it to `self`; an empty `self` takes the read
    /// vector as is.
    pub fn read_add(&mut self, is: &mut InputStream, binary: bool) -> Result<(), MatrixError> {
        let mut tmp = Self::default();
        tmp.read(is, binary)?;
        if self.dim() == 0 {
            self.swap(&mut tmp);
        } else {
            if tmp.dim() != self.dim() {
                return Err(MatrixError::SizeMismatch {
                    found: tmp.dim().to_string(),
                    expected: self.dim().to_string(),
                });
            }
            self.add_vector(&tmp);
        }
        Ok(())
    }

    fn read_text(&mut self, is: &mut InputStream) -> Result<(), MatrixError> {
        if !read_open_bracket(is)? {
            self.resize(0, MatrixResizeType::SetZero);
            return Ok(());
        }
        let mut values = Vec::new();
        loop {
            match is.peek()? {
                None => return Err(MatrixError::Eof("vector")),
                Some(b']') => {
                    is.get()?;
                    eat_line_end(is)?;
                    break;
                }
                Some(b'\n' | b'\r') => return Err(MatrixError::NewlineInVector),
                Some(b' ' | b'\t') => {
                    is.get()?;
                }
                Some(_) => {
                    let word = scan_number(is)?;
                    match parse_element::<R>(&word, "vector") {
                        Some(v) => values.push(v),
                        None => return Err(MatrixError::NonNumericVectorData(truncate(word))),
                    }
                }
            }
        }
        *self = Vector::from(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_layout() {
        let v = Vector::from(vec![1.0f32, -2.5]);
        let mut buf = Vec::new();
        v.write(&mut buf, false).unwrap();
        assert_eq!(buf, b" [ 1 -2.5 ]\n");

        let mut buf = Vec::new();
        Vector::<f64>::default().write(&mut buf, false).unwrap();
        assert_eq!(buf, b" [ ]\n");
    }

    #[test]
    fn test_binary_cross_precision() {
        let v = Vector::from(vec![0.1f32, 3.0]);
        let mut buf = Vec::new();
        v.write(&mut buf, true).unwrap();
        assert!(buf.starts_with(b"FV "));
        let mut back = Vector::<f64>::default();
        back.read(&mut InputStream::from_bytes(buf), true).unwrap();
        assert_eq!(&back[..], &[0.1f32 as f64, 3.0]);
    }

    #[test]
    fn test_newline_is_error() {
        let mut v = Vector::<f32>::default();
        let err = v
            .read(&mut InputStream::from_bytes(&b"[ 1 2\n 3 ]"[..]), false)
            .unwrap_err();
        assert!(matches!(err, MatrixError::NewlineInVector));
    }

    #[test]
    fn test_empty_forms() {
        let mut v = Vector::from(vec![1.0f32]);
        v.read(&mut InputStream::from_bytes(&b" [] "[..]), false).unwrap();
        assert_eq!(v.dim(), 0);
        v.read(&mut InputStream::from_bytes(&b" [ ]\n"[..]), false).unwrap();
        assert_eq!(v.dim(), 0);
    }

    #[test]
    fn test_read_add_mismatch() {
        let mut buf = Vec::new();
        Vector::from(vec![1.0f64, 2.0]).write(&mut buf, true).unwrap();
        let mut v = Vector::from(vec![1.0f64, 1.0, 1.0]);
        assert!(v.read_add(&mut InputStream::from_bytes(buf), true).is_err());
    }
}
