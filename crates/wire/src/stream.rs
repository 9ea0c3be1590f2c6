//! Byte input with one-byte lookahead and pushback.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::process::ChildStdout;

use kaldi_io_util::is_whitespace;

use crate::WireError;

/// Buffered byte source an [`InputStream`] reads from.
///
/// Sources that can reposition themselves override [`Source::seek_to`].
pub trait Source: BufRead + Send {
    fn seek_to(&mut self, _offset: u64) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stream is not seekable",
        ))
    }
}

impl Source for BufReader<File> {
    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }
}

impl Source for Cursor<Vec<u8>> {
    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.set_position(offset);
        Ok(())
    }
}

impl Source for BufReader<io::Stdin> {}

impl Source for BufReader<ChildStdout> {}

/// A readable byte stream with `peek`, `get` and `unget`.
///
/// The position counts bytes consumed since the stream was created or last
/// repositioned with [`InputStream::seek_to`].
pub struct InputStream {
    source: Box<dyn Source>,
    pushback: Vec<u8>,
    position: u64,
}

impl InputStream {
    pub fn new<S: Source + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            pushback: Vec::new(),
            position: 0,
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Next byte without consuming it; `None` at end of stream.
    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        if let Some(&byte) = self.pushback.last() {
            return Ok(Some(byte));
        }
        let buf = self.source.fill_buf()?;
        Ok(buf.first().copied())
    }

    pub fn get(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.pop() {
            self.position += 1;
            return Ok(Some(byte));
        }
        let byte = match self.source.fill_buf()?.first() {
            Some(&byte) => byte,
            None => return Ok(None),
        };
        self.source.consume(1);
        self.position += 1;
        Ok(Some(byte))
    }

    /// Pushes a byte back so the next `get` returns it.
    pub fn unget(&mut self, byte: u8) {
        self.pushback.push(byte);
        self.position = self.position.saturating_sub(1);
    }

    pub fn skip_whitespace(&mut self) -> io::Result<()> {
        while let Some(byte) = self.peek()? {
            if !is_whitespace(byte) {
                break;
            }
            self.get()?;
        }
        Ok(())
    }

    /// Like [`InputStream::get`] but end of stream is an error.
    pub fn get_byte(&mut self) -> Result<u8, WireError> {
        self.get()?.ok_or(WireError::UnexpectedEof(self.position))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        self.read_exact_or_eof(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `len` bytes into a buffer that grows only as data
    /// arrives, so a corrupt length cannot force a large allocation.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::new();
        self.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(WireError::UnexpectedEof(self.position));
        }
        Ok(buf)
    }

    pub fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        self.read_exact(buf).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                WireError::UnexpectedEof(self.position)
            } else {
                WireError::Io(err)
            }
        })
    }

    /// Reads and discards up to `count` bytes, returning how many were
    /// actually skipped.
    pub fn skip(&mut self, count: u64) -> io::Result<u64> {
        io::copy(&mut self.by_ref().take(count), &mut io::sink())
    }

    /// Repositions the underlying source and discards any pushback.
    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.source.seek_to(offset)?;
        self.pushback.clear();
        self.position = offset;
        Ok(())
    }

    pub fn at_eof(&mut self) -> io::Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Reads bytes up to, but not including, the next whitespace byte.
    pub fn read_non_whitespace(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(byte) = self.peek()? {
            if is_whitespace(byte) {
                break;
            }
            out.push(byte);
            self.get()?;
        }
        Ok(out)
    }
}

impl Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(byte) = self.pushback.pop() {
            buf[0] = byte;
            self.position += 1;
            return Ok(1);
        }
        let n = self.source.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl std::fmt::Debug for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStream")
            .field("position", &self.position)
            .field("pushback", &self.pushback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_get_unget() {
        let mut is = InputStream::from_bytes(b"ab".to_vec());
        assert_eq!(is.peek().unwrap(), Some(b'a'));
        assert_eq!(is.get().unwrap(), Some(b'a'));
        assert_eq!(is.position(), 1);
        is.unget(b'a');
        assert_eq!(is.position(), 0);
        assert_eq!(is.get().unwrap(), Some(b'a'));
        assert_eq!(is.get().unwrap(), Some(b'b'));
        assert_eq!(is.get().unwrap(), None);
        assert!(is.at_eof().unwrap());
    }

    #[test]
    fn test_read_drains_pushback_first() {
        let mut is = InputStream::from_bytes(b"xyz".to_vec());
        is.get().unwrap();
        is.unget(b'Q');
        let mut buf = [0u8; 3];
        is.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"Qyz");
    }

    #[test]
    fn test_seek_and_skip() {
        let mut is = InputStream::from_bytes((0u8..20).collect::<Vec<_>>());
        assert_eq!(is.skip(5).unwrap(), 5);
        assert_eq!(is.get().unwrap(), Some(5));
        is.seek_to(15).unwrap();
        assert_eq!(is.position(), 15);
        assert_eq!(is.get().unwrap(), Some(15));
        assert_eq!(is.skip(100).unwrap(), 4);
    }

    #[test]
    fn test_read_array_eof() {
        let mut is = InputStream::from_bytes(vec![1, 2]);
        assert!(matches!(
            is.read_array::<4>(),
            Err(WireError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_whitespace_helpers() {
        let mut is = InputStream::from_bytes(b" \t\nfoo bar".to_vec());
        is.skip_whitespace().unwrap();
        assert_eq!(is.read_non_whitespace().unwrap(), b"foo");
        assert_eq!(is.peek().unwrap(), Some(b' '));
    }
}
