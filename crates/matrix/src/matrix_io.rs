//! Binary and text encodings of [`Matrix`].

use std::io::Write;

use kaldi_io_util::is_whitespace;
use kaldi_io_wire::{
    format_real, read_basic_type, read_token, write_basic_type, write_token, InputStream,
    WireError,
};

use crate::compressed::CompressedMatrix;
use crate::text::{eat_line_end, parse_element, read_open_bracket, scan_number, truncate};
use crate::{ElementWidth, Matrix, MatrixError, MatrixResizeType, Real};

/// Reads a binary dimension, rejecting negative values.
pub(crate) fn read_dimension(is: &mut InputStream) -> Result<usize, MatrixError> {
    let value: i32 = read_basic_type(is, true)?;
    usize::try_from(value).map_err(|_| MatrixError::BadDimension(value.into()))
}

pub(crate) fn write_dimension<W: Write + ?Sized>(
    os: &mut W,
    value: usize,
) -> Result<(), MatrixError> {
    let value = i32::try_from(value).map_err(|_| MatrixError::BadDimension(value as i64))?;
    write_basic_type(os, true, value)?;
    Ok(())
}

/// Byte length of a `rows` x `cols` payload of `elem_size`-byte elements.
pub(crate) fn payload_size(
    rows: usize,
    cols: usize,
    elem_size: usize,
) -> Result<usize, MatrixError> {
    rows.checked_mul(cols)
        .and_then(|n| n.checked_mul(elem_size))
        .ok_or(MatrixError::TooLarge { rows, cols })
}

/// Reads a `len`-byte payload; a short stream is `Eof(what)`.
pub(crate) fn read_payload(
    is: &mut InputStream,
    len: usize,
    what: &'static str,
) -> Result<Vec<u8>, MatrixError> {
    is.read_vec(len).map_err(|err| match err {
        WireError::UnexpectedEof(_) => MatrixError::Eof(what),
        other => other.into(),
    })
}

/// Decodes little-endian elements of `width` from `bytes` into `out`.
pub(crate) fn decode_elements<R: Real>(width: ElementWidth, bytes: &[u8], out: &mut [R]) {
    for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(width.size())) {
        *dst = R::from_f64(width.decode(chunk));
    }
}

pub(crate) fn write_elements<R: Real, W: Write + ?Sized>(
    os: &mut W,
    values: &[R],
) -> Result<(), MatrixError> {
    let mut buf = Vec::with_capacity(values.len() * R::SIZE);
    for &v in values {
        v.put_le(&mut buf);
    }
    os.write_all(&buf)?;
    Ok(())
}

impl<R: Real> Matrix<R> {
    pub fn write<W: Write + ?Sized>(&self, os: &mut W, binary: bool) -> Result<(), MatrixError> {
        if binary {
            write_token(os, true, R::MATRIX_TOKEN)?;
            write_dimension(os, self.num_rows())?;
            write_dimension(os, self.num_cols())?;
            for row in self.rows() {
                write_elements(os, row)?;
            }
        } else if self.num_cols() == 0 {
            os.write_all(b" [ ]\n")?;
        } else {
            let mut text = String::from(" [");
            for row in self.rows() {
                text.push_str("\n  ");
                for &v in row {
                    text.push_str(&format_real(v));
                    text.push(' ');
                }
            }
            text.push_str("]\n");
            os.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    /// Replaces the contents with a matrix read from `is`. Binary input may
    /// be single, double or compressed precision.
    pub fn read(&mut self, is: &mut InputStream, binary: bool) -> Result<(), MatrixError> {
        if binary {
            self.read_binary(is)
        } else {
            self.read_text(is)
        }
    }

    /// Reads a matrix and adds it to `self`. An empty `self` takes the
    /// read matrix as is; an empty read matrix leaves `self` unchanged.
    pub fn read_add(&mut self, is: &mut InputStream, binary: bool) -> Result<(), MatrixError> {
        let mut tmp = Self::default();
        tmp.read(is, binary)?;
        if self.is_empty() {
            self.swap(&mut tmp);
        } else if !tmp.is_empty() {
            if tmp.num_rows() != self.num_rows() || tmp.num_cols() != self.num_cols() {
                return Err(MatrixError::SizeMismatch {
                    found: format!("{}x{}", tmp.num_rows(), tmp.num_cols()),
                    expected: format!("{}x{}", self.num_rows(), self.num_cols()),
                });
            }
            self.add_matrix(&tmp);
        }
        Ok(())
    }

    fn read_binary(&mut self, is: &mut InputStream) -> Result<(), MatrixError> {
        let width = match is.peek()? {
            Some(b'C') => {
                let mut compressed = CompressedMatrix::default();
                compressed.read(is, true)?;
                *self = compressed.to_matrix();
                return Ok(());
            }
            Some(_) => {
                let token = read_token(is, true)?;
                match token.as_str() {
                    "FM" => ElementWidth::Single,
                    "DM" => ElementWidth::Double,
                    _ => return Err(MatrixError::UnexpectedMatrixToken(truncate(token))),
                }
            }
            None => return Err(MatrixError::Eof("matrix token")),
        };
        let rows = read_dimension(is)?;
        let cols = read_dimension(is)?;
        let bytes = read_payload(is, payload_size(rows, cols, width.size())?, "matrix")?;
        if rows != self.num_rows() || cols != self.num_cols() {
            self.resize(rows, cols, MatrixResizeType::Undefined);
        }
        if self.num_cols() > 0 {
            let row_bytes = self.num_cols() * width.size();
            for (i, chunk) in bytes.chunks_exact(row_bytes).enumerate() {
                decode_elements(width, chunk, self.row_mut(i));
            }
        }
        Ok(())
    }

    fn read_text(&mut self, is: &mut InputStream) -> Result<(), MatrixError> {
        if !read_open_bracket(is)? {
            self.resize(0, 0, MatrixResizeType::SetZero);
            return Ok(());
        }
        let mut rows: Vec<Vec<R>> = Vec::new();
        let mut current: Vec<R> = Vec::new();
        loop {
            let byte = match is.peek()? {
                Some(byte) => byte,
                None => return Err(MatrixError::Eof("matrix")),
            };
            match byte {
                b']' => {
                    is.get()?;
                    eat_line_end(is)?;
                    if !current.is_empty() {
                        rows.push(std::mem::take(&mut current));
                    }
                    break;
                }
                b'\n' | b';' => {
                    is.get()?;
                    if !current.is_empty() {
                        rows.push(std::mem::take(&mut current));
                    }
                }
                _ if is_whitespace(byte) => {
                    is.get()?;
                }
                _ => {
                    let word = scan_number(is)?;
                    match parse_element::<R>(&word, "matrix") {
                        Some(v) => current.push(v),
                        None => return Err(MatrixError::NonNumericData(truncate(word))),
                    }
                }
            }
        }
        let cols = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::InconsistentCols {
                    row: i,
                    found: row.len(),
                    expected: cols,
                });
            }
        }
        self.resize(rows.len(), cols, MatrixResizeType::Undefined);
        for (i, row) in rows.iter().enumerate().take(self.num_rows()) {
            self.row_mut(i).copy_from_slice(row);
        }
        Ok(())
    }
}
