//! One backend per resource kind.
//!
//! The set of kinds is closed, so backends are dispatched through the
//! [`InputBackend`] and [`OutputBackend`] enums rather than trait objects.
//! Each variant implements [`ReadBackend`] or [`WriteBackend`].

mod file;
mod offset;
mod pipe;
mod standard;

use std::io::Write;

use kaldi_io_wire::InputStream;

use crate::{ResourceKind, StreamError};

pub use file::{FileInput, FileOutput};
pub use offset::{OffsetFileInput, OFFSET_READ_AHEAD_LIMIT};
pub use pipe::{PipeInput, PipeOutput};
pub use standard::{StandardInput, StandardOutput};

/// Readable side of a backend.
///
/// `stream` and `close` on a backend that is not open are contract
/// violations and panic.
pub trait ReadBackend {
    fn open(&mut self, rxfilename: &str, binary: bool) -> Result<(), StreamError>;
    fn stream(&mut self) -> &mut InputStream;
    /// Releases the backend; returns the exit status for pipes, else 0.
    fn close(&mut self) -> i32;
    fn is_open(&self) -> bool;
    fn kind(&self) -> ResourceKind;
}

/// Writable side of a backend.
pub trait WriteBackend {
    fn open(&mut self, wxfilename: &str, binary: bool) -> Result<(), StreamError>;
    fn stream(&mut self) -> &mut (dyn Write + Send);
    /// Flushes and releases the backend.
    fn close(&mut self) -> Result<(), StreamError>;
    fn is_open(&self) -> bool;
    fn kind(&self) -> ResourceKind;
}

pub enum InputBackend {
    File(FileInput),
    Standard(StandardInput),
    Pipe(PipeInput),
    Offset(OffsetFileInput),
}

impl InputBackend {
    /// An unopened backend for `kind`; `None` for [`ResourceKind::Invalid`].
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::File => Some(Self::File(FileInput::new())),
            ResourceKind::StandardStream => Some(Self::Standard(StandardInput::new())),
            ResourceKind::Pipe => Some(Self::Pipe(PipeInput::new())),
            ResourceKind::OffsetFile => Some(Self::Offset(OffsetFileInput::new())),
            ResourceKind::Invalid => None,
        }
    }

    fn inner(&mut self) -> &mut dyn ReadBackend {
        match self {
            Self::File(b) => b,
            Self::Standard(b) => b,
            Self::Pipe(b) => b,
            Self::Offset(b) => b,
        }
    }

    fn inner_ref(&self) -> &dyn ReadBackend {
        match self {
            Self::File(b) => b,
            Self::Standard(b) => b,
            Self::Pipe(b) => b,
            Self::Offset(b) => b,
        }
    }
}

impl ReadBackend for InputBackend {
    fn open(&mut self, rxfilename: &str, binary: bool) -> Result<(), StreamError> {
        self.inner().open(rxfilename, binary)
    }

    fn stream(&mut self) -> &mut InputStream {
        self.inner().stream()
    }

    fn close(&mut self) -> i32 {
        self.inner().close()
    }

    fn is_open(&self) -> bool {
        self.inner_ref().is_open()
    }

    fn kind(&self) -> ResourceKind {
        self.inner_ref().kind()
    }
}

pub enum OutputBackend {
    File(FileOutput),
    Standard(StandardOutput),
    Pipe(PipeOutput),
}

impl OutputBackend {
    /// `None` for kinds that cannot be written.
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::File => Some(Self::File(FileOutput::new())),
            ResourceKind::StandardStream => Some(Self::Standard(StandardOutput::new())),
            ResourceKind::Pipe => Some(Self::Pipe(PipeOutput::new())),
            ResourceKind::OffsetFile | ResourceKind::Invalid => None,
        }
    }

    fn inner(&mut self) -> &mut dyn WriteBackend {
        match self {
            Self::File(b) => b,
            Self::Standard(b) => b,
            Self::Pipe(b) => b,
        }
    }

    fn inner_ref(&self) -> &dyn WriteBackend {
        match self {
            Self::File(b) => b,
            Self::Standard(b) => b,
            Self::Pipe(b) => b,
        }
    }
}

impl WriteBackend for OutputBackend {
    fn open(&mut self, wxfilename: &str, binary: bool) -> Result<(), StreamError> {
        self.inner().open(wxfilename, binary)
    }

    fn stream(&mut self) -> &mut (dyn Write + Send) {
        self.inner().stream()
    }

    fn close(&mut self) -> Result<(), StreamError> {
        self.inner().close()
    }

    fn is_open(&self) -> bool {
        self.inner_ref().is_open()
    }

    fn kind(&self) -> ResourceKind {
        self.inner_ref().kind()
    }
}
