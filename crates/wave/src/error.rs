use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wire(#[from] kaldi_io_wire::WireError),
    #[error("expected {expected}, got {found:?}")]
    UnexpectedTag { expected: &'static str, found: String },
    #[error("PCM format data needs a fmt chunk of at least 16 bytes, got {0}")]
    ShortFmtChunk(u32),
    #[error("malformed WAVE_FORMAT_EXTENSIBLE format data")]
    MalformedExtensible,
    #[error("unsupported WAVE_FORMAT_EXTENSIBLE sub-format")]
    UnsupportedExtensible,
    #[error("can read only PCM data, format id in file is {0}")]
    UnsupportedFormat(u16),
    #[error("no channels present")]
    NoChannels,
    #[error("unsupported bits_per_sample = {0}")]
    BitsPerSample(u16),
    #[error("unexpected byte rate {found} vs. {sample_rate} * 2 * {channels}")]
    ByteRate {
        found: u32,
        sample_rate: u32,
        channels: u16,
    },
    #[error("byte rate of {sample_rate} Hz * 2 * {channels} does not fit 32 bits")]
    ByteRateOverflow { sample_rate: u32, channels: u16 },
    #[error("unexpected block_align {found} vs. {channels} * 2")]
    BlockAlign { found: u16, channels: u16 },
    #[error("empty file (no data)")]
    NoData,
    #[error("attempting to write an empty wave file")]
    EmptyWrite,
    #[error("wave data of {0} bytes does not fit a RIFF chunk")]
    TooLarge(u64),
}
