//! Scanning helpers shared by the text matrix and vector readers.

use kaldi_io_util::{convert_string_to_real, is_whitespace};
use kaldi_io_wire::InputStream;

use crate::{MatrixError, Real};

/// Collects bytes until whitespace, `]`, `;` or end of stream.
pub(crate) fn scan_number(is: &mut InputStream) -> Result<String, MatrixError> {
    let mut out = Vec::new();
    while let Some(byte) = is.peek()? {
        if is_whitespace(byte) || byte == b']' || byte == b';' {
            break;
        }
        out.push(byte);
        is.get()?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Parses one element, warning about non-finite values.
pub(crate) fn parse_element<R: Real>(word: &str, container: &str) -> Option<R> {
    let value: R = convert_string_to_real(word)?;
    let wide = value.to_f64();
    if wide.is_nan() {
        log::warn!("Reading NaN value into {container}");
    } else if wide.is_infinite() {
        log::warn!("Reading infinite value into {container}");
    }
    Some(value)
}

/// After a closing `]`, consumes an optional line terminator.
pub(crate) fn eat_line_end(is: &mut InputStream) -> Result<(), MatrixError> {
    match is.peek()? {
        Some(b'\r') => {
            is.get()?;
            if is.peek()? == Some(b'\n') {
                is.get()?;
            }
        }
        Some(b'\n') => {
            is.get()?;
        }
        _ => {}
    }
    Ok(())
}

/// Reads the opening word of a bracketed text object. Returns `false` for
/// the empty form `[]`.
pub(crate) fn read_open_bracket(is: &mut InputStream) -> Result<bool, MatrixError> {
    is.skip_whitespace()?;
    let word = String::from_utf8_lossy(&is.read_non_whitespace()?).into_owned();
    match word.as_str() {
        "[]" => Ok(false),
        "[" => Ok(true),
        "" => Err(MatrixError::Eof("opening bracket")),
        _ => Err(MatrixError::ExpectedOpenBracket(truncate(word))),
    }
}

pub(crate) fn truncate(mut word: String) -> String {
    if word.len() > 20 {
        let mut end = 20;
        while !word.is_char_boundary(end) {
            end -= 1;
        }
        word.truncate(end);
        word.push_str("...");
    }
    word
}
