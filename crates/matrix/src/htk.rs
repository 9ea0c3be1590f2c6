//! HTK feature files: a 12-byte big-endian header followed by big-endian
//! `f32` frames.

use std::io::Write;

use kaldi_io_wire::InputStream;

use crate::matrix_io::{payload_size, read_payload};
use crate::{Matrix, MatrixError, MatrixResizeType, Real};

const BASE_KIND_MASK: u16 = 0o77;
const FLAG_COMPRESSED: u16 = 0o2000;
const FLAG_CHECKSUM: u16 = 0o10000;
const FLAG_VQ: u16 = 0o40000;

const KIND_WAVEFORM: u16 = 0;
const KIND_IREFC: u16 = 5;
const KIND_DISCRETE: u16 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtkHeader {
    pub num_samples: i32,
    /// In units of 100ns.
    pub sample_period: i32,
    /// Bytes per frame.
    pub sample_size: i16,
    pub sample_kind: u16,
}

impl HtkHeader {
    fn parse(raw: &[u8; 12]) -> Self {
        Self {
            num_samples: i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            sample_period: i32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]),
            sample_size: i16::from_be_bytes([raw[8], raw[9]]),
            sample_kind: u16::from_be_bytes([raw[10], raw[11]]),
        }
    }

    fn to_bytes(self) -> [u8; 12] {
        let mut raw = [0u8; 12];
        raw[0..4].copy_from_slice(&self.num_samples.to_be_bytes());
        raw[4..8].copy_from_slice(&self.sample_period.to_be_bytes());
        raw[8..10].copy_from_slice(&self.sample_size.to_be_bytes());
        raw[10..12].copy_from_slice(&self.sample_kind.to_be_bytes());
        raw
    }
}

/// Reads an HTK file. A trailing checksum is consumed and the checksum flag
/// is cleared in the returned header.
pub fn read_htk<R: Real>(is: &mut InputStream) -> Result<(Matrix<R>, HtkHeader), MatrixError> {
    let mut header = HtkHeader::parse(&is.read_array()?);
    if header.sample_kind & (FLAG_COMPRESSED | FLAG_VQ) != 0 {
        return Err(MatrixError::Htk(format!(
            "compressed or VQ data not supported (kind {:#o})",
            header.sample_kind
        )));
    }
    let has_checksum = header.sample_kind & FLAG_CHECKSUM != 0;
    header.sample_kind &= !FLAG_CHECKSUM;
    let base = header.sample_kind & BASE_KIND_MASK;
    if matches!(base, KIND_WAVEFORM | KIND_IREFC | KIND_DISCRETE) {
        return Err(MatrixError::Htk(format!("unsupported parameter kind {base}")));
    }
    let rows = usize::try_from(header.num_samples)
        .map_err(|_| MatrixError::BadDimension(header.num_samples.into()))?;
    let size = usize::try_from(header.sample_size)
        .map_err(|_| MatrixError::BadDimension(header.sample_size.into()))?;
    let cols = size / 4;

    let bytes = read_payload(is, payload_size(rows, cols, 4)?, "HTK matrix")?;
    let mut m = Matrix::default();
    m.resize(rows, cols, MatrixResizeType::Undefined);
    if m.num_cols() > 0 {
        for (r, row) in bytes.chunks_exact(cols * 4).enumerate() {
            for (dst, chunk) in m.row_mut(r).iter_mut().zip(row.chunks_exact(4)) {
                let v = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                *dst = R::from_f64(v.into());
            }
        }
    }
    if has_checksum {
        is.read_array::<2>()?;
    }
    Ok((m, header))
}

/// Writes `m` under `header`, whose sample count and size must agree with
/// the matrix dimensions.
pub fn write_htk<R: Real, W: Write + ?Sized>(
    os: &mut W,
    m: &Matrix<R>,
    header: HtkHeader,
) -> Result<(), MatrixError> {
    if usize::try_from(header.num_samples).ok() != Some(m.num_rows())
        || usize::try_from(header.sample_size / 4).ok() != Some(m.num_cols())
    {
        return Err(MatrixError::Htk(format!(
            "header says {} frames of {} bytes, matrix is {}x{}",
            header.num_samples,
            header.sample_size,
            m.num_rows(),
            m.num_cols()
        )));
    }
    let mut out = header.to_bytes().to_vec();
    for row in m.rows() {
        for &v in row {
            out.extend_from_slice(&(v.to_f64() as f32).to_be_bytes());
        }
    }
    os.write_all(&out)?;
    Ok(())
}
