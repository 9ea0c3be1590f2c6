//! `path:offset` reads.
//!
//! The backend stays open across [`ReadBackend::open`] calls. Reopening the
//! same path in the same mode only repositions the stream, which keeps
//! random access into one archive cheap.

use std::fs::File;
use std::io::BufReader;

use kaldi_io_wire::InputStream;
use log::debug;

use super::ReadBackend;
use crate::{split_offset_filename, ResourceKind, StreamError};

/// Forward distance, in bytes, below which reading is used instead of a seek.
pub const OFFSET_READ_AHEAD_LIMIT: u64 = 100;

#[derive(Default)]
pub struct OffsetFileInput {
    filename: String,
    binary: bool,
    stream: Option<InputStream>,
}

impl OffsetFileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    fn open_file(&mut self, filename: &str, binary: bool) -> Result<(), StreamError> {
        let file = File::open(filename).map_err(|source| StreamError::Open {
            name: filename.to_string(),
            source,
        })?;
        self.filename = filename.to_string();
        self.binary = binary;
        self.stream = Some(InputStream::new(BufReader::new(file)));
        Ok(())
    }

    fn seek(&mut self, offset: u64) -> Result<(), StreamError> {
        let Some(stream) = self.stream.as_mut() else {
            panic!("OffsetFileInput::seek(), file is not open");
        };
        let current = stream.position();
        if current == offset {
            return Ok(());
        }
        if current < offset && current + OFFSET_READ_AHEAD_LIMIT > offset {
            let skipped = stream.skip(offset - current)?;
            if current + skipped == offset {
                return Ok(());
            }
            return Err(StreamError::Seek {
                name: self.filename.clone(),
                offset,
            });
        }
        if stream.seek_to(offset).is_err() {
            self.stream = None;
            return Err(StreamError::Seek {
                name: self.filename.clone(),
                offset,
            });
        }
        Ok(())
    }
}

impl ReadBackend for OffsetFileInput {
    fn open(&mut self, rxfilename: &str, binary: bool) -> Result<(), StreamError> {
        let (filename, offset) = split_offset_filename(rxfilename)
            .ok_or_else(|| StreamError::BadOffset(rxfilename.to_string()))?;
        if self.stream.is_some() && filename == self.filename && binary == self.binary {
            debug!("reusing open {filename} to seek to {offset}");
        } else {
            self.stream = None;
            self.open_file(filename, binary)?;
        }
        self.seek(offset)
    }

    fn stream(&mut self) -> &mut InputStream {
        match self.stream.as_mut() {
            Some(stream) => stream,
            None => panic!("OffsetFileInput::stream(), file is not open"),
        }
    }

    fn close(&mut self) -> i32 {
        if self.stream.take().is_none() {
            panic!("OffsetFileInput::close(), file is not open");
        }
        0
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::OffsetFile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reuse_and_seek_both_ways() {
        let file = fixture();
        let path = file.path().to_str().unwrap().to_string();
        let mut backend = OffsetFileInput::new();

        backend.open(&format!("{path}:10"), true).unwrap();
        assert_eq!(backend.stream().get().unwrap(), Some(10));
        // Short hop forward is read, not sought.
        backend.open(&format!("{path}:60"), true).unwrap();
        assert_eq!(backend.stream().get().unwrap(), Some(60));
        // Long hop forward.
        backend.open(&format!("{path}:700"), true).unwrap();
        assert_eq!(backend.stream().get().unwrap(), Some((700 % 256) as u8));
        // Backwards.
        backend.open(&format!("{path}:3"), true).unwrap();
        assert_eq!(backend.stream().get().unwrap(), Some(3));
        assert_eq!(backend.filename(), path);
    }

    #[test]
    fn test_missing_file() {
        let mut backend = OffsetFileInput::new();
        assert!(matches!(
            backend.open("/nonexistent/dir/x.ark:5", true),
            Err(StreamError::Open { .. })
        ));
        assert!(!backend.is_open());
    }
}
