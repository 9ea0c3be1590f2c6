use std::io::{self, BufReader, BufWriter, Write};

use kaldi_io_wire::InputStream;

use super::{ReadBackend, WriteBackend};
use crate::{ResourceKind, StreamError};

/// Standard input. Bytes buffered by this handle are dropped on close.
#[derive(Default)]
pub struct StandardInput {
    stream: Option<InputStream>,
}

impl StandardInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadBackend for StandardInput {
    // End of input is valid input, so opening never fails.
    fn open(&mut self, _rxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.stream.is_none(), "StandardInput::open(), already open");
        self.stream = Some(InputStream::new(BufReader::new(io::stdin())));
        Ok(())
    }

    fn stream(&mut self) -> &mut InputStream {
        match self.stream.as_mut() {
            Some(stream) => stream,
            None => panic!("StandardInput::stream(), object not initialized"),
        }
    }

    fn close(&mut self) -> i32 {
        if self.stream.take().is_none() {
            panic!("StandardInput::close(), file is not open");
        }
        0
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::StandardStream
    }
}

#[derive(Default)]
pub struct StandardOutput {
    writer: Option<BufWriter<io::Stdout>>,
}

impl StandardOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WriteBackend for StandardOutput {
    fn open(&mut self, _wxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.writer.is_none(), "StandardOutput::open(), already open");
        self.writer = Some(BufWriter::new(io::stdout()));
        Ok(())
    }

    fn stream(&mut self) -> &mut (dyn Write + Send) {
        match self.writer.as_mut() {
            Some(writer) => writer,
            None => panic!("StandardOutput::stream(), object not initialized"),
        }
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let Some(mut writer) = self.writer.take() else {
            panic!("StandardOutput::close(), file is not open");
        };
        writer.flush().map_err(|source| StreamError::Close {
            name: "standard output".to_string(),
            hint: "",
            source,
        })
    }

    fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::StandardStream
    }
}
