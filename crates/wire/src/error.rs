use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of stream at position {0}")]
    UnexpectedEof(u64),
    #[error("did not get expected integer type, {found} vs. {expected}")]
    IntegerType { found: i8, expected: i8 },
    #[error("expected float size byte 4 or 8, saw {0}")]
    FloatSize(String),
    #[error("expected 'T' or 'F' for bool, saw {0}")]
    Bool(String),
    #[error("failed to parse {text:?} as {kind} at position {position}")]
    Parse {
        text: String,
        kind: &'static str,
        position: u64,
    },
    #[error("invalid token {0:?}")]
    InvalidToken(String),
    #[error("expected whitespace after token {token:?}, saw instead {found}")]
    TokenTerminator { token: String, found: String },
    #[error("expected token {expected:?}, got instead {found:?}")]
    ExpectedToken { expected: String, found: String },
    #[error("expected binary marker 'B' after \\0, saw {0}")]
    BinaryMarker(String),
    #[error("expected element size {expected}, saw {found}")]
    ElementSize { expected: usize, found: String },
    #[error("{0}")]
    Malformed(String),
}
