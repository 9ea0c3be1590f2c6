use std::io;

use kaldi_io_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid input filename format {0}")]
    InvalidRxfilename(String),
    #[error("invalid output filename format {0}")]
    InvalidWxfilename(String),
    #[error("failed to open {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed opening pipe, command is: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot get offset from filename {0}")]
    BadOffset(String),
    #[error("failed to seek to offset {offset} in {name}")]
    Seek { name: String, offset: u64 },
    #[error("error closing output {name}{hint}: {source}")]
    Close {
        name: String,
        hint: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("output is not open")]
    NotOpen,
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
