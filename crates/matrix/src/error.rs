use thiserror::Error;

use kaldi_io_wire::WireError;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected token FM, got {0}")]
    UnexpectedMatrixToken(String),
    #[error("expected token FV, got {0}")]
    UnexpectedVectorToken(String),
    #[error("expected \"[\", got {0:?}")]
    ExpectedOpenBracket(String),
    #[error("matrix has inconsistent #cols: {found} vs. {expected} (processing row {row})")]
    InconsistentCols {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("expecting numeric matrix data, got {0:?}")]
    NonNumericData(String),
    #[error("failed to read vector: expecting numeric data, got {0:?}")]
    NonNumericVectorData(String),
    #[error("newline found while reading vector (maybe it's a matrix?)")]
    NewlineInVector,
    #[error("EOF detected while reading {0}")]
    Eof(&'static str),
    #[error("negative or oversized dimension {0}")]
    BadDimension(i64),
    #[error("{rows}x{cols} payload is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("size mismatch {found} vs. {expected}")]
    SizeMismatch { found: String, expected: String },
    #[error("unknown compressed matrix format token {0:?}")]
    CompressedFormat(String),
    #[error("HTK: {0}")]
    Htk(String),
    #[error("invalid range specifier {0:?}")]
    InvalidRange(String),
}
