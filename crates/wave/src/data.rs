use std::io::{Read, Write};

use kaldi_io_matrix::{Matrix, MatrixResizeType};
use kaldi_io_wire::InputStream;

use crate::{WaveError, WaveInfo};

/// Magnitude of a full-scale 16-bit sample. Decoded samples are not divided
/// by it.
pub const WAVE_SAMPLE_MAX: f32 = 32768.0;

const BLOCK_SIZE: usize = 1024 * 1024;

/// Decoded audio: one row per channel, one column per sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveData {
    samp_freq: f32,
    data: Matrix<f32>,
}

impl WaveData {
    pub fn new(samp_freq: f32, data: Matrix<f32>) -> Self {
        Self { samp_freq, data }
    }

    pub fn samp_freq(&self) -> f32 {
        self.samp_freq
    }

    pub fn data(&self) -> &Matrix<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Matrix<f32> {
        &mut self.data
    }

    /// Seconds of audio.
    pub fn duration(&self) -> f32 {
        self.data.num_cols() as f32 / self.samp_freq
    }

    pub fn clear(&mut self) {
        self.data = Matrix::default();
        self.samp_freq = 0.0;
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Reads header and samples. Streamed files are read to the end of the
    /// stream; a short data chunk is decoded with a warning.
    pub fn read(is: &mut InputStream) -> Result<Self, WaveError> {
        let info = WaveInfo::read(is)?;
        let mut buffer = Vec::new();
        match info.data_bytes() {
            Some(expected) => {
                is.by_ref().take(expected as u64).read_to_end(&mut buffer)?;
                if buffer.len() < expected {
                    log::warn!(
                        "Expected {expected} bytes of wave data, but read only {} bytes. \
                         Truncated file?",
                        buffer.len()
                    );
                }
            }
            None => {
                let mut block = vec![0u8; BLOCK_SIZE];
                loop {
                    let n = is.read(&mut block)?;
                    if n == 0 {
                        break;
                    }
                    buffer.extend_from_slice(&block[..n]);
                }
            }
        }
        if buffer.is_empty() {
            return Err(WaveError::NoData);
        }

        let channels = usize::from(info.num_channels());
        let samples = buffer.len() / info.block_align();
        let mut data = Matrix::default();
        data.resize(channels, samples, MatrixResizeType::Undefined);
        for (i, frame) in buffer.chunks_exact(info.block_align()).enumerate() {
            for (j, raw) in frame.chunks_exact(2).enumerate() {
                let raw = [raw[0], raw[1]];
                let sample = if info.is_big_endian() {
                    i16::from_be_bytes(raw)
                } else {
                    i16::from_le_bytes(raw)
                };
                data.set(j, i, f32::from(sample));
            }
        }
        Ok(Self {
            samp_freq: info.samp_freq(),
            data,
        })
    }

    /// Writes a little-endian PCM file. Samples are truncated toward zero
    /// and clipped to the 16-bit range.
    pub fn write<W: Write + ?Sized>(&self, os: &mut W) -> Result<(), WaveError> {
        if self.data.is_empty() {
            return Err(WaveError::EmptyWrite);
        }
        let channels = self.data.num_rows();
        let samples = self.data.num_cols();
        let data_bytes = (channels as u64) * (samples as u64) * 2;
        let too_large = || WaveError::TooLarge(data_bytes);
        let chunk_size = u32::try_from(data_bytes + 36).map_err(|_| too_large())?;
        let num_channels = u16::try_from(channels).map_err(|_| too_large())?;
        let block_align = num_channels.checked_mul(2).ok_or_else(too_large)?;
        let samp_freq = self.samp_freq as u32;
        let byte_rate = samp_freq
            .checked_mul(u32::from(block_align))
            .ok_or(WaveError::ByteRateOverflow {
                sample_rate: samp_freq,
                channels: num_channels,
            })?;

        let mut out = Vec::with_capacity(44 + data_bytes as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&chunk_size.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&num_channels.to_le_bytes());
        out.extend_from_slice(&samp_freq.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data_bytes as u32).to_le_bytes());

        let mut num_clipped = 0usize;
        for i in 0..samples {
            for j in 0..channels {
                let elem = self.data.get(j, i).trunc();
                let sample = if elem < f32::from(i16::MIN) {
                    num_clipped += 1;
                    i16::MIN
                } else if elem > f32::from(i16::MAX) {
                    num_clipped += 1;
                    i16::MAX
                } else {
                    elem as i16
                };
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
        if num_clipped > 0 {
            log::warn!(
                "clipped {num_clipped} samples out of total {}. Reduce volume?",
                channels * samples
            );
        }
        os.write_all(&out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo() -> WaveData {
        let data =
            Matrix::from_rows(&[vec![0.0, 100.0, -32768.0], vec![1.0, -1.0, 32767.0]]).unwrap();
        WaveData::new(8000.0, data)
    }

    #[test]
    fn test_round_trip() {
        let wave = stereo();
        let mut buf = Vec::new();
        wave.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 44 + 12);
        assert_eq!(&buf[44..48], &[0, 0, 1, 0]);
        let back = WaveData::read(&mut InputStream::from_bytes(buf)).unwrap();
        assert_eq!(back, wave);
        assert_eq!(back.duration(), 3.0 / 8000.0);
    }

    #[test]
    fn test_clipping_and_truncation() {
        let data = Matrix::from_rows(&[vec![40000.0, -40000.0, 1.9, -1.9]]).unwrap();
        let mut buf = Vec::new();
        WaveData::new(16000.0, data).write(&mut buf).unwrap();
        let back = WaveData::read(&mut InputStream::from_bytes(buf)).unwrap();
        assert_eq!(back.data().row(0), &[32767.0, -32768.0, 1.0, -1.0]);
    }

    #[test]
    fn test_empty_write_fails() {
        assert!(matches!(
            WaveData::default().write(&mut Vec::new()),
            Err(WaveError::EmptyWrite)
        ));
    }

    #[test]
    fn test_header_fields_overflow() {
        let fast = WaveData::new(3.0e9, stereo().data().clone());
        assert!(matches!(
            fast.write(&mut Vec::new()),
            Err(WaveError::ByteRateOverflow { channels: 2, .. })
        ));

        let wide = WaveData::new(8000.0, Matrix::new(40_000, 1));
        assert!(matches!(wide.write(&mut Vec::new()), Err(WaveError::TooLarge(80_000))));
    }

    #[test]
    fn test_truncated_and_streamed() {
        let mut buf = Vec::new();
        stereo().write(&mut buf).unwrap();

        let mut short = buf.clone();
        short.truncate(short.len() - 4);
        let back = WaveData::read(&mut InputStream::from_bytes(short)).unwrap();
        assert_eq!(back.data().num_cols(), 2);

        let mut streamed = buf.clone();
        streamed[40..44].copy_from_slice(&0u32.to_le_bytes());
        let back = WaveData::read(&mut InputStream::from_bytes(streamed)).unwrap();
        assert_eq!(back, stereo());

        let header_only = buf[..44].to_vec();
        assert!(matches!(
            WaveData::read(&mut InputStream::from_bytes(header_only)),
            Err(WaveError::NoData)
        ));
    }

    #[test]
    fn test_rifx_samples_are_big_endian() {
        let mut buf = Vec::new();
        stereo().write(&mut buf).unwrap();
        let mut rifx = b"RIFX".to_vec();
        let be32 = |b: &[u8]| u32::from_le_bytes([b[0], b[1], b[2], b[3]]).to_be_bytes();
        let be16 = |b: &[u8]| u16::from_le_bytes([b[0], b[1]]).to_be_bytes();
        rifx.extend_from_slice(&be32(&buf[4..8]));
        rifx.extend_from_slice(&buf[8..16]);
        rifx.extend_from_slice(&be32(&buf[16..20]));
        for field in [20, 22] {
            rifx.extend_from_slice(&be16(&buf[field..field + 2]));
        }
        rifx.extend_from_slice(&be32(&buf[24..28]));
        rifx.extend_from_slice(&be32(&buf[28..32]));
        for field in [32, 34] {
            rifx.extend_from_slice(&be16(&buf[field..field + 2]));
        }
        rifx.extend_from_slice(&buf[36..40]);
        rifx.extend_from_slice(&be32(&buf[40..44]));
        for sample in buf[44..].chunks_exact(2) {
            rifx.extend_from_slice(&be16(sample));
        }
        let back = WaveData::read(&mut InputStream::from_bytes(rifx)).unwrap();
        assert_eq!(back, stereo());
    }
}
