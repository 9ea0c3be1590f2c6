//! Writable handle over any output backend.

use std::io::Write;

use kaldi_io_wire::init_output_stream;
use log::{error, warn};

use crate::backend::{OutputBackend, WriteBackend};
use crate::{classify_wxfilename, printable_wxfilename, ResourceKind, StreamError};

/// Owns at most one open output backend.
///
/// Dropping an open `Output` closes it; a failed close at that point means
/// data may have been lost and is treated as fatal.
#[derive(Default)]
pub struct Output {
    filename: String,
    backend: Option<OutputBackend>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `wxfilename`, failing with an error instead of returning a
    /// closed handle.
    pub fn create(wxfilename: &str, binary: bool, write_header: bool) -> Result<Self, StreamError> {
        let mut output = Self::new();
        output.open(wxfilename, binary, write_header)?;
        Ok(output)
    }

    /// Opens `wxfilename`. With `write_header` set, binary streams start
    /// with the `\0B` marker.
    pub fn open(
        &mut self,
        wxfilename: &str,
        binary: bool,
        write_header: bool,
    ) -> Result<(), StreamError> {
        if self.backend.is_some() {
            self.close()?;
        }
        let kind = classify_wxfilename(wxfilename);
        let Some(mut backend) = OutputBackend::for_kind(kind) else {
            warn!(
                "Invalid output filename format {}",
                printable_wxfilename(wxfilename)
            );
            return Err(StreamError::InvalidWxfilename(wxfilename.to_string()));
        };
        backend.open(wxfilename, binary)?;
        if write_header {
            init_output_stream(backend.stream(), binary)?;
        }
        self.filename = wxfilename.to_string();
        self.backend = Some(backend);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.is_open())
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    /// The open stream.
    ///
    /// # Panics
    ///
    /// If the handle is not open.
    pub fn stream(&mut self) -> &mut (dyn Write + Send) {
        match self.backend.as_mut() {
            Some(backend) => backend.stream(),
            None => panic!("Output::stream() called but not open"),
        }
    }

    /// Flushes and closes. Closing a handle that is not open is an error.
    pub fn close(&mut self) -> Result<(), StreamError> {
        match self.backend.take() {
            Some(mut backend) => backend.close(),
            None => Err(StreamError::NotOpen),
        }
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if self.backend.is_none() {
            return;
        }
        if let Err(err) = self.close() {
            error!(
                "Error closing output {}: {err}",
                printable_wxfilename(&self.filename)
            );
            if !std::thread::panicking() {
                panic!("failed to close output {}: {err}", self.filename);
            }
        }
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("filename", &self.filename)
            .field("kind", &self.kind())
            .finish()
    }
}
