use thiserror::Error;

use kaldi_io_matrix::MatrixError;
use kaldi_io_streams::StreamError;
use kaldi_io_wave::WaveError;
use kaldi_io_wire::WireError;

#[derive(Debug, Error)]
pub enum HolderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Wave(#[from] WaveError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("{0}")]
    Malformed(String),
    #[error("{0} supports binary mode only")]
    BinaryOnly(&'static str),
    #[error("{0} cannot be written")]
    ReadOnly(&'static str),
    #[error("invalid range {range:?}: {reason}")]
    Range { range: String, reason: String },
    #[error("{0} does not support range extraction")]
    RangeUnsupported(&'static str),
}
