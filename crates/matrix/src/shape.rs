use kaldi_io_wire::{read_token, InputStream};

use crate::compressed;
use crate::matrix_io::{payload_size, read_dimension};
use crate::text::truncate;
use crate::{ElementWidth, Matrix, MatrixError};

/// Dimensions of a stored matrix, read without decoding its elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixShape {
    pub num_rows: usize,
    pub num_cols: usize,
}

impl MatrixShape {
    /// In binary mode the payload is skipped; text matrices are parsed in
    /// full.
    pub fn read(is: &mut InputStream, binary: bool) -> Result<Self, MatrixError> {
        if !binary {
            let mut m = Matrix::<f32>::default();
            m.read(is, false)?;
            return Ok(Self {
                num_rows: m.num_rows(),
                num_cols: m.num_cols(),
            });
        }
        if is.peek()? == Some(b'C') {
            let (num_rows, num_cols) = compressed::read_shape(is)?;
            return Ok(Self { num_rows, num_cols });
        }
        let token = read_token(is, true)?;
        let width = match token.as_str() {
            "FM" => ElementWidth::Single,
            "DM" => ElementWidth::Double,
            _ => return Err(MatrixError::UnexpectedMatrixToken(truncate(token))),
        };
        let num_rows = read_dimension(is)?;
        let num_cols = read_dimension(is)?;
        let size = payload_size(num_rows, num_cols, width.size())? as u64;
        if is.skip(size)? != size {
            return Err(MatrixError::Eof("matrix"));
        }
        Ok(Self { num_rows, num_cols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompressedMatrix, CompressionMethod};

    #[test]
    fn test_shape_skips_payload() {
        let mut buf = Vec::new();
        Matrix::<f64>::new(3, 5).write(&mut buf, true).unwrap();
        CompressedMatrix::new(&Matrix::<f32>::new(10, 2), CompressionMethod::Automatic)
            .write(&mut buf, true)
            .unwrap();
        buf.push(b'!');
        let mut is = InputStream::from_bytes(buf);
        assert_eq!(
            MatrixShape::read(&mut is, true).unwrap(),
            MatrixShape { num_rows: 3, num_cols: 5 }
        );
        assert_eq!(
            MatrixShape::read(&mut is, true).unwrap(),
            MatrixShape { num_rows: 10, num_cols: 2 }
        );
        assert_eq!(is.get().unwrap(), Some(b'!'));
    }

    #[test]
    fn test_shape_truncated() {
        let mut buf = Vec::new();
        Matrix::<f32>::new(3, 5).write(&mut buf, true).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(MatrixShape::read(&mut InputStream::from_bytes(buf), true).is_err());
    }
}
