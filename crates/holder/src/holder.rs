//! The value-codec contract used by archives and tables.

use std::io::Write;

use kaldi_io_wire::InputStream;

use crate::HolderError;

/// Reads and writes one archive value.
///
/// `write` and `read` report failure as `false` after logging the cause.
/// A failed `read` never leaves a partially decoded value behind: the
/// holder is reset to its empty state.
pub trait Holder: Default {
    type Value;

    /// Writes `value`, preceded by the binary-mode marker where the format
    /// has one.
    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Self::Value) -> bool;

    /// Reads a value, detecting the mode from the stream where the format
    /// has a marker.
    fn read(&mut self, is: &mut InputStream) -> bool;

    /// Whether a table reader must open the source in binary mode.
    fn is_read_in_binary() -> bool {
        true
    }

    /// # Panics
    ///
    /// If the holder has no value.
    fn value(&self) -> &Self::Value;

    fn clear(&mut self);

    fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Replaces the held value with the part of `other`'s value selected by
    /// `range`.
    ///
    /// # Panics
    ///
    /// For value types without a notion of range.
    fn extract_range(&mut self, other: &Self, range: &str) -> bool {
        let _ = (other, range);
        panic!("extract_range is not defined for this holder type");
    }
}

/// Logs a failed read or write and collapses the result to a `bool`.
pub(crate) fn report<T>(context: &str, result: Result<T, HolderError>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) => {
            log::warn!("{context}: {err}");
            false
        }
    }
}

/// Keeps a decoded value, or resets `slot` to its default when decoding
/// failed.
pub(crate) fn store<T: Default>(
    slot: &mut T,
    result: Result<T, HolderError>,
) -> Result<(), HolderError> {
    match result {
        Ok(value) => {
            *slot = value;
            Ok(())
        }
        Err(err) => {
            *slot = T::default();
            Err(err)
        }
    }
}

/// Reads up to and including the next `\n`, which is not returned. A final
/// line without a newline is accepted; end of stream before any byte is an
/// error.
pub(crate) fn read_line(is: &mut InputStream) -> Result<Vec<u8>, HolderError> {
    let mut line = Vec::new();
    loop {
        match is.get()? {
            Some(b'\n') => return Ok(line),
            Some(byte) => line.push(byte),
            None if line.is_empty() => {
                return Err(HolderError::Malformed("end of stream while reading line".into()))
            }
            None => return Ok(line),
        }
    }
}

/// After a text value: skips non-newline whitespace and consumes the
/// newline that must follow.
pub(crate) fn expect_newline(is: &mut InputStream) -> Result<(), HolderError> {
    while let Some(byte) = is.peek()? {
        if byte == b'\n' || !kaldi_io_util::is_whitespace(byte) {
            break;
        }
        is.get()?;
    }
    match is.get()? {
        Some(b'\n') => Ok(()),
        other => Err(HolderError::Malformed(format!(
            "expected newline, got {}",
            other.map_or_else(|| "end of stream".to_string(), kaldi_io_util::char_to_string)
        ))),
    }
}
