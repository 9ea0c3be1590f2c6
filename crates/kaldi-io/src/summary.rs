//! Inspection and conversion helpers used by the command-line tools.

use std::fmt;
use std::io::{Read, Write};

use kaldi_io_holder::{read_kaldi_object, write_kaldi_object, Blob, HolderError, KaldiObject};
use kaldi_io_matrix::{extract_range_specifier, Matrix};
use kaldi_io_streams::{Input, Output};
use kaldi_io_wave::WaveInfo;
use kaldi_io_wire::peek;
use log::debug;

/// Storage format of a matrix as found on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Binary `FM`.
    Float,
    /// Binary `DM`.
    Double,
    /// Binary `CM`, `CM2` or `CM3`.
    Compressed,
    /// Text mode; precision is not recorded.
    Text,
}

impl MatrixKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixKind::Float => "float",
            MatrixKind::Double => "double",
            MatrixKind::Compressed => "compressed",
            MatrixKind::Text => "text",
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSummary {
    pub rows: usize,
    pub cols: usize,
    pub kind: MatrixKind,
}

/// Reads the matrix named by `rxfilename` (range suffix allowed) and
/// reports its dimensions after range extraction.
pub fn summarize_matrix(rxfilename: &str) -> Result<MatrixSummary, HolderError> {
    let (path, range) = extract_range_specifier(rxfilename)?;
    let (mut input, binary) = Input::from_rxfilename(path)?;
    let kind = if binary {
        match peek(input.stream(), true)? {
            Some(b'C') => MatrixKind::Compressed,
            Some(b'D') => MatrixKind::Double,
            _ => MatrixKind::Float,
        }
    } else {
        MatrixKind::Text
    };
    let mut matrix = Matrix::<f64>::default();
    matrix.read_object(input.stream(), binary)?;
    let status = input.close();
    debug!("closed {path} with status {status}");
    let matrix = match range {
        Some(spec) => KaldiObject::extract_range(&matrix, spec)?,
        None => matrix,
    };
    Ok(MatrixSummary {
        rows: matrix.num_rows(),
        cols: matrix.num_cols(),
        kind,
    })
}

/// Parses only the header of the WAV file named by `rxfilename`.
pub fn summarize_wave(rxfilename: &str) -> Result<WaveInfo, HolderError> {
    let mut input = Input::new();
    input.open(rxfilename)?;
    let info = WaveInfo::read(input.stream())?;
    input.close();
    Ok(info)
}

/// Writes the payload of the blob at `rxfilename` to `wxfilename` as raw
/// bytes. Returns the payload length.
pub fn unwrap_blob(rxfilename: &str, wxfilename: &str) -> Result<usize, HolderError> {
    let blob: Blob = read_kaldi_object(rxfilename)?;
    let mut output = Output::create(wxfilename, true, false)?;
    output.stream().write_all(blob.as_bytes())?;
    output.close()?;
    Ok(blob.len())
}

/// Reads all bytes of `rxfilename` and writes them as a blob object to
/// `wxfilename`. Returns the payload length.
pub fn wrap_blob(rxfilename: &str, wxfilename: &str) -> Result<usize, HolderError> {
    let mut input = Input::new();
    input.open(rxfilename)?;
    let mut bytes = Vec::new();
    input.stream().read_to_end(&mut bytes)?;
    input.close();
    let blob = Blob::new(bytes);
    write_kaldi_object(&blob, wxfilename, true)?;
    Ok(blob.len())
}
