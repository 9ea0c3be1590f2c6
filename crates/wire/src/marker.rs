//! The `\0B` binary-mode marker.

use std::io::Write;

use kaldi_io_util::char_to_string;

use crate::{InputStream, WireError};

pub const BINARY_MARKER: [u8; 2] = [0, b'B'];

/// Writes the marker when `binary` is set; text streams get no header.
pub fn init_output_stream<W: Write + ?Sized>(os: &mut W, binary: bool) -> Result<(), WireError> {
    if binary {
        os.write_all(&BINARY_MARKER)?;
    }
    Ok(())
}

/// Consumes the marker if present and reports whether the stream is binary.
/// `\0` followed by anything but `B` is an error.
pub fn init_input_stream(is: &mut InputStream) -> Result<bool, WireError> {
    if is.peek()? != Some(0) {
        return Ok(false);
    }
    is.get()?;
    match is.peek()? {
        Some(b'B') => {
            is.get()?;
            Ok(true)
        }
        Some(other) => Err(WireError::BinaryMarker(char_to_string(other))),
        None => Err(WireError::BinaryMarker("end of stream".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_detection() {
        let mut buf = Vec::new();
        init_output_stream(&mut buf, true).unwrap();
        buf.extend_from_slice(b"rest");
        let mut is = InputStream::from_bytes(buf);
        assert!(init_input_stream(&mut is).unwrap());
        assert_eq!(is.peek().unwrap(), Some(b'r'));

        let mut is = InputStream::from_bytes(b"text".to_vec());
        assert!(!init_input_stream(&mut is).unwrap());
        assert_eq!(is.position(), 0);

        let mut is = InputStream::from_bytes(Vec::new());
        assert!(!init_input_stream(&mut is).unwrap());
    }

    #[test]
    fn test_bad_marker() {
        let mut is = InputStream::from_bytes(vec![0, b'X']);
        assert!(matches!(
            init_input_stream(&mut is),
            Err(WireError::BinaryMarker(_))
        ));
    }

    #[test]
    fn test_text_output_has_no_header() {
        let mut buf = Vec::new();
        init_output_stream(&mut buf, false).unwrap();
        assert!(buf.is_empty());
    }
}
