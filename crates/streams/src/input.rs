//! Readable handle over any input backend.

use kaldi_io_wire::{init_input_stream, InputStream};
use log::warn;

use crate::backend::{InputBackend, ReadBackend};
use crate::{classify_rxfilename, printable_rxfilename, ResourceKind, StreamError};

/// Owns at most one open input backend.
///
/// Opening while open closes the previous backend first, except when both
/// the old and the new descriptor address offsets: then the open backend is
/// reused so that a same-file reopen is just a seek.
#[derive(Default)]
pub struct Input {
    backend: Option<InputBackend>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `rxfilename` and detects the binary-mode marker. Returns the
    /// handle and whether the contents are binary.
    pub fn from_rxfilename(rxfilename: &str) -> Result<(Self, bool), StreamError> {
        let mut input = Self::new();
        let binary = input.open_detect(rxfilename)?;
        Ok((input, binary))
    }

    /// Opens without looking for a binary-mode marker.
    pub fn open(&mut self, rxfilename: &str) -> Result<(), StreamError> {
        self.open_internal(rxfilename, true, false).map(|_| ())
    }

    /// Opens and consumes the binary-mode marker if present. Returns true
    /// when the contents are binary.
    pub fn open_detect(&mut self, rxfilename: &str) -> Result<bool, StreamError> {
        self.open_internal(rxfilename, true, true)
    }

    /// Opens with an explicit file mode, with or without marker detection.
    pub fn open_with_mode(
        &mut self,
        rxfilename: &str,
        file_binary: bool,
        detect_binary: bool,
    ) -> Result<bool, StreamError> {
        self.open_internal(rxfilename, file_binary, detect_binary)
    }

    fn open_internal(
        &mut self,
        rxfilename: &str,
        file_binary: bool,
        detect_binary: bool,
    ) -> Result<bool, StreamError> {
        let kind = classify_rxfilename(rxfilename);
        let reuse = kind == ResourceKind::OffsetFile
            && self.kind() == Some(ResourceKind::OffsetFile);
        let mut backend = match self.backend.take() {
            Some(backend) if reuse => backend,
            previous => {
                if let Some(mut previous) = previous {
                    if previous.is_open() {
                        previous.close();
                    }
                }
                InputBackend::for_kind(kind).ok_or_else(|| {
                    warn!(
                        "Invalid input filename format {}",
                        printable_rxfilename(rxfilename)
                    );
                    StreamError::InvalidRxfilename(rxfilename.to_string())
                })?
            }
        };
        backend.open(rxfilename, file_binary)?;
        let detected = if detect_binary {
            init_input_stream(backend.stream())
        } else {
            Ok(false)
        };
        self.backend = Some(backend);
        Ok(detected?)
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
    pub fn stream(&mut self) -> &mut InputStream {
        match self.backend.as_mut() {
            Some(backend) if backend.is_open() => backend.stream(),
            _ => panic!("Input::stream(), not open"),
        }
    }

    /// Closes the backend. Returns the pipe exit status, or 0 for other
    /// backends and when nothing was open.
    pub fn close(&mut self) -> i32 {
        match self.backend.take() {
            Some(mut backend) if backend.is_open() => backend.close(),
            _ => 0,
        }
    }
}

impl Drop for Input {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input").field("kind", &self.kind()).finish()
    }
}
