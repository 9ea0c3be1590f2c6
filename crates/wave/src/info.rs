use kaldi_io_wire::InputStream;

use crate::WaveError;

/// RIFF chunk sizes that mark a streamed file, whose sample count is unknown.
const STREAMED_RIFF_SIZES: [u32; 2] = [0, 0xFFFF_FFFF];
/// Data chunk sizes with the same meaning. SoX writes `0x7FFFF000`, and an
/// ffmpeg to SoX pipeline has been seen writing `0xFFFFFFFE`.
const STREAMED_DATA_SIZES: [u32; 4] = [0, 0xFFFF_FFFF, 0x7FFF_F000, 0xFFFF_FFFE];

const FORMAT_PCM: u16 = 1;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;
/// KSDATAFORMAT_SUBTYPE_PCM, as four little-endian words.
const PCM_SUBFORMAT_GUID: [u32; 4] = [0x0000_0001, 0x0010_0000, 0xAA00_0080, 0x719B_3800];

/// Header of a WAV file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveInfo {
    samp_freq: f32,
    samp_count: Option<usize>,
    num_channels: u16,
    reverse_bytes: bool,
    big_endian: bool,
}

/// Reads header fields in the file's byte order.
struct ChunkReader<'a> {
    is: &'a mut InputStream,
    big_endian: bool,
}

impl ChunkReader<'_> {
    fn tag(&mut self) -> Result<[u8; 4], WaveError> {
        Ok(self.is.read_array()?)
    }

    fn expect_tag(&mut self, expected: &'static str) -> Result<(), WaveError> {
        let tag = self.tag()?;
        if tag != expected.as_bytes() {
            return Err(WaveError::UnexpectedTag {
                expected,
                found: String::from_utf8_lossy(&tag).into_owned(),
            });
        }
        Ok(())
    }

    fn u32(&mut self) -> Result<u32, WaveError> {
        let raw = self.is.read_array()?;
        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn u16(&mut self) -> Result<u16, WaveError> {
        let raw = self.is.read_array()?;
        Ok(if self.big_endian {
            u16::from_be_bytes(raw)
        } else {
            u16::from_le_bytes(raw)
        })
    }

    fn skip(&mut self, count: u32) -> Result<(), WaveError> {
        let count = u64::from(count);
        if self.is.skip(count)? != count {
            return Err(kaldi_io_wire::WireError::UnexpectedEof(self.is.position()).into());
        }
        Ok(())
    }
}

impl WaveInfo {
    /// Parses the header and leaves `is` at the first sample byte.
    pub fn read(is: &mut InputStream) -> Result<Self, WaveError> {
        let mut reader = ChunkReader {
            is,
            big_endian: false,
        };
        let riff = reader.tag()?;
        reader.big_endian = match &riff {
            b"RIFF" => false,
            b"RIFX" => true,
            _ => {
                return Err(WaveError::UnexpectedTag {
                    expected: "RIFF or RIFX",
                    found: String::from_utf8_lossy(&riff).into_owned(),
                })
            }
        };
        let riff_chunk_size = reader.u32()?;
        reader.expect_tag("WAVE")?;
        // Counts bytes of the RIFF chunk consumed so far, "WAVE" included.
        let mut riff_chunk_read: u64 = 4;

        loop {
            let tag = reader.tag()?;
            riff_chunk_read += 4;
            if &tag == b"fmt " {
                break;
            }
            let filler_size = reader.u32()?;
            reader.skip(filler_size)?;
            riff_chunk_read += 4 + u64::from(filler_size);
        }

        let fmt_size = reader.u32()?;
        let audio_format = reader.u16()?;
        let num_channels = reader.u16()?;
        let sample_rate = reader.u32()?;
        let byte_rate = reader.u32()?;
        let block_align = reader.u16()?;
        let bits_per_sample = reader.u16()?;
        let mut fmt_read = 16;
        match audio_format {
            FORMAT_PCM => {
                if fmt_size < 16 {
                    return Err(WaveError::ShortFmtChunk(fmt_size));
                }
            }
            FORMAT_EXTENSIBLE => {
                let extra_size = reader.u16()?;
                if fmt_size < 40 || extra_size < 22 {
                    return Err(WaveError::MalformedExtensible);
                }
                reader.u16()?; // valid bits per sample
                reader.u32()?; // channel mask
                let mut guid = [0u32; 4];
                for word in guid.iter_mut() {
                    *word = reader.u32()?;
                }
                if guid != PCM_SUBFORMAT_GUID {
                    return Err(WaveError::UnsupportedExtensible);
                }
                fmt_read = 40;
            }
            other => return Err(WaveError::UnsupportedFormat(other)),
        }
        if fmt_size > fmt_read {
            reader.skip(fmt_size - fmt_read)?;
        }
        if num_channels == 0 {
            return Err(WaveError::NoChannels);
        }
        if bits_per_sample != 16 {
            return Err(WaveError::BitsPerSample(bits_per_sample));
        }
        if u64::from(byte_rate) != u64::from(sample_rate) * 2 * u64::from(num_channels) {
            return Err(WaveError::ByteRate {
                found: byte_rate,
                sample_rate,
                channels: num_channels,
            });
        }
        if u32::from(block_align) != u32::from(num_channels) * 2 {
            return Err(WaveError::BlockAlign {
                found: block_align,
                channels: num_channels,
            });
        }
        riff_chunk_read += 4 + u64::from(fmt_size);

        let data_chunk_size = loop {
            let tag = reader.tag()?;
            let chunk_size = reader.u32()?;
            riff_chunk_read += 8;
            if &tag == b"data" {
                break chunk_size;
            }
            if &tag == b"fact" && chunk_size != 4 {
                log::warn!("Expected fact chunk size 4, got {chunk_size}");
            }
            reader.skip(chunk_size)?;
            riff_chunk_read += u64::from(chunk_size);
        };

        let is_streamed = STREAMED_RIFF_SIZES.contains(&riff_chunk_size)
            || STREAMED_DATA_SIZES.contains(&data_chunk_size);
        if is_streamed {
            log::debug!(
                "RIFF chunk size {riff_chunk_size}, data chunk size {data_chunk_size}: \
                 reading data to end of stream"
            );
        } else {
            let expected = riff_chunk_read + u64::from(data_chunk_size);
            if expected.abs_diff(u64::from(riff_chunk_size)) > 1 {
                log::warn!(
                    "Expected {riff_chunk_size} bytes in RIFF chunk, but after the first data \
                     block there will be {riff_chunk_read} + {data_chunk_size} bytes \
                     (multiple data chunks are not supported)"
                );
            }
        }

        Ok(Self {
            samp_freq: sample_rate as f32,
            samp_count: (!is_streamed).then(|| data_chunk_size as usize / usize::from(block_align)),
            num_channels,
            reverse_bytes: reader.big_endian != cfg!(target_endian = "big"),
            big_endian: reader.big_endian,
        })
    }

    pub fn samp_freq(&self) -> f32 {
        self.samp_freq
    }

    /// Samples per channel; `None` for streamed files.
    pub fn samp_count(&self) -> Option<usize> {
        self.samp_count
    }

    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    /// Whether the file's byte order differs from the host's.
    pub fn reverse_bytes(&self) -> bool {
        self.reverse_bytes
    }

    /// Whether samples are stored big-endian (`RIFX`).
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn is_streamed(&self) -> bool {
        self.samp_count.is_none()
    }

    pub fn block_align(&self) -> usize {
        usize::from(self.num_channels) * 2
    }

    /// Declared size of the sample data; `None` for streamed files.
    pub fn data_bytes(&self) -> Option<usize> {
        self.samp_count.map(|n| n * self.block_align())
    }

    /// Seconds; `None` for streamed files.
    pub fn duration(&self) -> Option<f32> {
        self.samp_count.map(|n| n as f32 / self.samp_freq)
    }
}
