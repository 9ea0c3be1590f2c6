//! Lossy compressed matrix storage.
//!
//! A compressed matrix keeps a global `(min, range)` pair and quantizes
//! every element against it, either to 16 or 8 bits per element or, for
//! speech features, to 8 bits per element interpolated between four
//! per-column percentiles.

mod compress;

use std::io::Write;

use kaldi_io_wire::{read_token, write_token, InputStream, WireScalar};

use crate::matrix_io::read_payload;
use crate::text::truncate;
use crate::{Matrix, MatrixError, MatrixResizeType, Real};

pub(crate) use compress::compress;

/// How a dense matrix is quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    /// [`CompressionMethod::SpeechFeature`] for more than eight rows,
    /// otherwise [`CompressionMethod::TwoByteAuto`].
    #[default]
    Automatic,
    /// One byte per element with per-column percentile headers.
    SpeechFeature,
    /// Two bytes per element, range from the data.
    TwoByteAuto,
    /// Two bytes per element, exact for integers in `[-32768, 32767]`.
    TwoByteSignedInteger,
    /// One byte per element, range from the data.
    OneByteAuto,
    /// One byte per element, exact for integers in `[0, 255]`.
    OneByteUnsignedInteger,
    /// One byte per element over `[0, 1]`.
    OneByteZeroOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataFormat {
    OneByteWithColHeaders,
    TwoByte,
    OneByte,
}

impl DataFormat {
    fn token(self) -> &'static str {
        match self {
            DataFormat::OneByteWithColHeaders => "CM",
            DataFormat::TwoByte => "CM2",
            DataFormat::OneByte => "CM3",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "CM" => Some(DataFormat::OneByteWithColHeaders),
            "CM2" => Some(DataFormat::TwoByte),
            "CM3" => Some(DataFormat::OneByte),
            _ => None,
        }
    }

    /// Payload size after the global header.
    /// `None` when the size does not fit in `usize`.
    fn data_size(self, rows: usize, cols: usize) -> Option<usize> {
        match self {
            DataFormat::OneByteWithColHeaders => {
                rows.checked_add(PER_COL_HEADER_SIZE)?.checked_mul(cols)
            }
            DataFormat::TwoByte => rows.checked_mul(cols)?.checked_mul(2),
            DataFormat::OneByte => rows.checked_mul(cols),
        }
    }
}

const PER_COL_HEADER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GlobalHeader {
    pub(crate) format: DataFormat,
    pub(crate) min_value: f32,
    pub(crate) range: f32,
    pub(crate) num_rows: usize,
    pub(crate) num_cols: usize,
}

impl GlobalHeader {
    pub(crate) fn uint16_to_float(&self, value: u16) -> f32 {
        self.min_value + self.range * 1.525_902_2e-5_f32 * f32::from(value)
    }
}

/// Percentiles 0, 25, 75 and 100 of one column, quantized to 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PerColHeader {
    pub(crate) percentile_0: u16,
    pub(crate) percentile_25: u16,
    pub(crate) percentile_75: u16,
    pub(crate) percentile_100: u16,
}

impl PerColHeader {
    fn parse(bytes: &[u8]) -> Self {
        let word = |i: usize| u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);
        Self {
            percentile_0: word(0),
            percentile_25: word(1),
            percentile_75: word(2),
            percentile_100: word(3),
        }
    }

    pub(crate) fn put(&self, out: &mut Vec<u8>) {
        for word in [
            self.percentile_0,
            self.percentile_25,
            self.percentile_75,
            self.percentile_100,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }

    pub(crate) fn to_floats(self, global: &GlobalHeader) -> [f32; 4] {
        [
            global.uint16_to_float(self.percentile_0),
            global.uint16_to_float(self.percentile_25),
            global.uint16_to_float(self.percentile_75),
            global.uint16_to_float(self.percentile_100),
        ]
    }
}

pub(crate) fn char_to_float(p: [f32; 4], value: u8) -> f32 {
    let [p0, p25, p75, p100] = p;
    let value = f32::from(value);
    if value <= 64.0 {
        p0 + (p25 - p0) * value * (1.0 / 64.0)
    } else if value <= 192.0 {
        p25 + (p75 - p25) * (value - 64.0) * (1.0 / 128.0)
    } else {
        p75 + (p100 - p75) * (value - 192.0) * (1.0 / 63.0)
    }
}

/// A quantized matrix; empty when it has no header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressedMatrix {
    header: Option<GlobalHeader>,
    data: Vec<u8>,
}

impl CompressedMatrix {
    pub fn new<R: Real>(matrix: &Matrix<R>, method: CompressionMethod) -> Self {
        compress(matrix, method)
    }

    pub(crate) fn from_parts(header: GlobalHeader, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            Some(data.len()),
            header.format.data_size(header.num_rows, header.num_cols)
        );
        Self {
            header: Some(header),
            data,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.header.map_or(0, |h| h.num_rows)
    }

    pub fn num_cols(&self) -> usize {
        self.header.map_or(0, |h| h.num_cols)
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none()
    }

    /// Multiplies every element by `alpha`.
    pub fn scale(&mut self, alpha: f32) {
        if let Some(header) = self.header.as_mut() {
            header.min_value *= alpha;
            header.range *= alpha;
        }
    }

    pub fn to_matrix<R: Real>(&self) -> Matrix<R> {
        let mut m = Matrix::default();
        self.copy_to_matrix(&mut m);
        m
    }

    /// Decompresses into `dest`, resizing it.
    pub fn copy_to_matrix<R: Real>(&self, dest: &mut Matrix<R>) {
        let Some(header) = self.header else {
            dest.resize(0, 0, MatrixResizeType::SetZero);
            return;
        };
        let (rows, cols) = (header.num_rows, header.num_cols);
        dest.resize(rows, cols, MatrixResizeType::Undefined);
        match header.format {
            DataFormat::OneByteWithColHeaders => {
                let (col_headers, bytes) = self.data.split_at(cols * PER_COL_HEADER_SIZE);
                for (c, raw) in col_headers.chunks_exact(PER_COL_HEADER_SIZE).enumerate() {
                    let p = PerColHeader::parse(raw).to_floats(&header);
                    let column = &bytes[c * rows..(c + 1) * rows];
                    for (r, &b) in column.iter().enumerate() {
                        dest.set(r, c, R::from_f64(char_to_float(p, b).into()));
                    }
                }
            }
            DataFormat::TwoByte => {
                let increment = (f64::from(header.range) * (1.0 / 65535.0)) as f32;
                for (r, raw) in self.data.chunks_exact(2 * cols).enumerate() {
                    for (dst, word) in dest.row_mut(r).iter_mut().zip(raw.chunks_exact(2)) {
                        let v = u16::from_le_bytes([word[0], word[1]]);
                        *dst = R::from_f64((header.min_value + f32::from(v) * increment).into());
                    }
                }
            }
            DataFormat::OneByte => {
                let increment = (f64::from(header.range) * (1.0 / 255.0)) as f32;
                for (r, raw) in self.data.chunks_exact(cols).enumerate() {
                    for (dst, &b) in dest.row_mut(r).iter_mut().zip(raw) {
                        *dst = R::from_f64((header.min_value + f32::from(b) * increment).into());
                    }
                }
            }
        }
    }

    /// The sub-block of `num_rows x num_cols` starting at
    /// (`row_offset`, `col_offset`), still compressed.
    ///
    /// # Panics
    ///
    /// If the block does not fit inside the matrix.
    pub fn range(
        &self,
        row_offset: usize,
        num_rows: usize,
        col_offset: usize,
        num_cols: usize,
    ) -> Self {
        assert!(
            row_offset + num_rows <= self.num_rows() && col_offset + num_cols <= self.num_cols(),
            "compressed range {row_offset}+{num_rows}, {col_offset}+{num_cols} exceeds {}x{}",
            self.num_rows(),
            self.num_cols()
        );
        let Some(header) = self.header else {
            return Self::default();
        };
        if num_rows == 0 || num_cols == 0 {
            return Self::default();
        }
        let (rows, cols) = (header.num_rows, header.num_cols);
        let mut data = Vec::with_capacity(header.format.data_size(num_rows, num_cols).unwrap_or(0));
        match header.format {
            DataFormat::OneByteWithColHeaders => {
                let (col_headers, bytes) = self.data.split_at(cols * PER_COL_HEADER_SIZE);
                data.extend_from_slice(
                    &col_headers[col_offset * PER_COL_HEADER_SIZE
                        ..(col_offset + num_cols) * PER_COL_HEADER_SIZE],
                );
                for c in col_offset..col_offset + num_cols {
                    let start = c * rows + row_offset;
                    data.extend_from_slice(&bytes[start..start + num_rows]);
                }
            }
            DataFormat::TwoByte | DataFormat::OneByte => {
                let width = if header.format == DataFormat::TwoByte { 2 } else { 1 };
                for r in row_offset..row_offset + num_rows {
                    let start = (r * cols + col_offset) * width;
                    data.extend_from_slice(&self.data[start..start + num_cols * width]);
                }
            }
        }
        Self::from_parts(
            GlobalHeader {
                num_rows,
                num_cols,
                ..header
            },
            data,
        )
    }

    /// Binary output keeps the compressed form; text output is the dense
    /// decompressed matrix.
    pub fn write<W: Write + ?Sized>(&self, os: &mut W, binary: bool) -> Result<(), MatrixError> {
        if !binary {
            return self.to_matrix::<f32>().write(os, false);
        }
        match self.header {
            None => {
                write_token(os, true, DataFormat::OneByteWithColHeaders.token())?;
                os.write_all(&[0u8; 16])?;
            }
            Some(header) => {
                write_token(os, true, header.format.token())?;
                let mut raw = Vec::with_capacity(16);
                header.min_value.put_le(&mut raw);
                header.range.put_le(&mut raw);
                os.write_all(&raw)?;
                let mut dims = Vec::with_capacity(8);
                for dim in [header.num_rows, header.num_cols] {
                    let dim =
                        i32::try_from(dim).map_err(|_| MatrixError::BadDimension(dim as i64))?;
                    dim.put_le(&mut dims);
                }
                os.write_all(&dims)?;
                os.write_all(&self.data)?;
            }
        }
        Ok(())
    }

    /// Reads a compressed matrix. A dense matrix (binary or text) is
    /// accepted too and compressed with the default method.
    pub fn read(&mut self, is: &mut InputStream, binary: bool) -> Result<(), MatrixError> {
        if binary && is.peek()? == Some(b'C') {
            let token = read_token(is, true)?;
            let format = DataFormat::from_token(&token)
                .ok_or_else(|| MatrixError::CompressedFormat(truncate(token)))?;
            let raw: [u8; 16] = is.read_array()?;
            let min_value = f32::from_le_slice(&raw[0..4]);
            let range = f32::from_le_slice(&raw[4..8]);
            let rows = i32::from_le_slice(&raw[8..12]);
            let cols = i32::from_le_slice(&raw[12..16]);
            let num_rows =
                usize::try_from(rows).map_err(|_| MatrixError::BadDimension(rows.into()))?;
            let num_cols =
                usize::try_from(cols).map_err(|_| MatrixError::BadDimension(cols.into()))?;
            if num_cols == 0 || num_rows == 0 {
                *self = Self::default();
                return Ok(());
            }
            let size = format.data_size(num_rows, num_cols).ok_or(MatrixError::TooLarge {
                rows: num_rows,
                cols: num_cols,
            })?;
            let data = read_payload(is, size, "compressed matrix")?;
            *self = Self::from_parts(
                GlobalHeader {
                    format,
                    min_value,
                    range,
                    num_rows,
                    num_cols,
                },
                data,
            );
            return Ok(());
        }
        let mut dense = Matrix::<f32>::default();
        dense.read(is, binary)?;
        *self = Self::new(&dense, CompressionMethod::default());
        Ok(())
    }
}

/// Skips a compressed payload, returning its dimensions.
pub(crate) fn read_shape(is: &mut InputStream) -> Result<(usize, usize), MatrixError> {
    let token = read_token(is, true)?;
    let format = DataFormat::from_token(&token)
        .ok_or_else(|| MatrixError::CompressedFormat(truncate(token)))?;
    // min and range
    is.read_array::<8>()?;
    let rows = read_raw_dimension(is)?;
    let cols = read_raw_dimension(is)?;
    if rows == 0 || cols == 0 {
        return Ok((0, 0));
    }
    let size = format
        .data_size(rows, cols)
        .ok_or(MatrixError::TooLarge { rows, cols })? as u64;
    if is.skip(size)? != size {
        return Err(MatrixError::Eof("compressed matrix"));
    }
    Ok((rows, cols))
}

fn read_raw_dimension(is: &mut InputStream) -> Result<usize, MatrixError> {
    let raw: [u8; 4] = is.read_array()?;
    let value = i32::from_le_bytes(raw);
    usize::try_from(value).map_err(|_| MatrixError::BadDimension(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Matrix<f32> {
        let mut m = Matrix::new(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                m.set(r, c, (r * cols + c) as f32 * 0.25 - 3.0);
            }
        }
        m
    }

    fn max_abs_diff(a: &Matrix<f32>, b: &Matrix<f32>) -> f32 {
        a.rows()
            .zip(b.rows())
            .flat_map(|(x, y)| x.iter().zip(y).map(|(p, q)| (p - q).abs()))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_char_to_float_knots() {
        let p = [0.0, 1.0, 3.0, 10.0];
        assert_eq!(char_to_float(p, 0), 0.0);
        assert_eq!(char_to_float(p, 64), 1.0);
        assert_eq!(char_to_float(p, 192), 3.0);
        assert_eq!(char_to_float(p, 255), 10.0);
    }

    #[test]
    fn test_formats_by_method() {
        let m = ramp(10, 3);
        let cases = [
            (CompressionMethod::Automatic, "CM "),
            (CompressionMethod::SpeechFeature, "CM "),
            (CompressionMethod::TwoByteAuto, "CM2 "),
            (CompressionMethod::OneByteAuto, "CM3 "),
        ];
        for (method, token) in cases {
            let mut buf = Vec::new();
            CompressedMatrix::new(&m, method).write(&mut buf, true).unwrap();
            assert!(buf.starts_with(token.as_bytes()), "{method:?}");
        }
        let mut buf = Vec::new();
        CompressedMatrix::new(&ramp(4, 3), CompressionMethod::Automatic)
            .write(&mut buf, true)
            .unwrap();
        assert!(buf.starts_with(b"CM2 "));
    }

    #[test]
    fn test_binary_size_and_round_trip() {
        let m = ramp(12, 5);
        let cm = CompressedMatrix::new(&m, CompressionMethod::SpeechFeature);
        let mut buf = Vec::new();
        cm.write(&mut buf, true).unwrap();
        assert_eq!(buf.len(), 3 + 16 + 5 * (8 + 12));

        let mut back = CompressedMatrix::default();
        back.read(&mut InputStream::from_bytes(buf), true).unwrap();
        assert_eq!(back, cm);
        let range = 14.75;
        assert!(max_abs_diff(&back.to_matrix(), &m) < range / 64.0);
    }

    #[test]
    fn test_integer_methods_are_exact() {
        let m = Matrix::<f32>::from_rows(&[vec![0.0, 17.0, 255.0], vec![3.0, 128.0, 1.0]]).unwrap();
        let cm = CompressedMatrix::new(&m, CompressionMethod::OneByteUnsignedInteger);
        assert_eq!(max_abs_diff(&cm.to_matrix(), &m), 0.0);

        let m = Matrix::<f32>::from_rows(&[vec![-32768.0, 0.0, 32767.0, -5.0]]).unwrap();
        let cm = CompressedMatrix::new(&m, CompressionMethod::TwoByteSignedInteger);
        assert_eq!(max_abs_diff(&cm.to_matrix(), &m), 0.0);
    }

    #[test]
    fn test_constant_matrix() {
        let m = Matrix::<f32>::from_rows(&[vec![2.0, 2.0], vec![2.0, 2.0]]).unwrap();
        let back: Matrix<f32> =
            CompressedMatrix::new(&m, CompressionMethod::TwoByteAuto).to_matrix();
        assert!(max_abs_diff(&back, &m) < 1e-3);
    }

    #[test]
    fn test_empty() {
        let cm = CompressedMatrix::new(&Matrix::<f32>::default(), CompressionMethod::Automatic);
        assert!(cm.is_empty());
        let mut buf = Vec::new();
        cm.write(&mut buf, true).unwrap();
        assert_eq!(buf.len(), 3 + 16);
        let mut back = CompressedMatrix::new(&ramp(2, 2), CompressionMethod::Automatic);
        back.read(&mut InputStream::from_bytes(buf), true).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_range_matches_dense() {
        for method in [
            CompressionMethod::SpeechFeature,
            CompressionMethod::TwoByteAuto,
            CompressionMethod::OneByteAuto,
        ] {
            let cm = CompressedMatrix::new(&ramp(10, 6), method);
            let full: Matrix<f32> = cm.to_matrix();
            let sub: Matrix<f32> = cm.range(2, 5, 1, 3).to_matrix();
            assert_eq!(sub, full.range(2, 5, 1, 3), "{method:?}");
        }
    }

    #[test]
    fn test_dense_input_is_compressed() {
        let m = ramp(3, 2);
        let mut buf = Vec::new();
        m.write(&mut buf, false).unwrap();
        let mut cm = CompressedMatrix::default();
        cm.read(&mut InputStream::from_bytes(buf), false).unwrap();
        assert_eq!(cm.num_rows(), 3);
        assert!(max_abs_diff(&cm.to_matrix(), &m) < 0.01);
    }

    #[test]
    fn test_unknown_token() {
        let mut cm = CompressedMatrix::default();
        let err = cm
            .read(&mut InputStream::from_bytes(&b"CM9 0000000000000000"[..]), true)
            .unwrap_err();
        assert!(matches!(err, MatrixError::CompressedFormat(_)));
    }
}
