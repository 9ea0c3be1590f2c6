use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use kaldi_io_wire::InputStream;
use log::debug;

use super::{ReadBackend, WriteBackend};
use crate::{ResourceKind, StreamError};

#[derive(Default)]
pub struct FileInput {
    stream: Option<InputStream>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadBackend for FileInput {
    fn open(&mut self, rxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.stream.is_none(), "FileInput::open(), already open");
        let file = File::open(rxfilename).map_err(|source| StreamError::Open {
            name: rxfilename.to_string(),
            source,
        })?;
        debug!("opened {rxfilename} for reading");
        self.stream = Some(InputStream::new(BufReader::new(file)));
        Ok(())
    }

    fn stream(&mut self) -> &mut InputStream {
        match self.stream.as_mut() {
            Some(stream) => stream,
            None => panic!("FileInput::stream(), file is not open"),
        }
    }

    fn close(&mut self) -> i32 {
        if self.stream.take().is_none() {
            panic!("FileInput::close(), file is not open");
        }
        0
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::File
    }
}

#[derive(Default)]
pub struct FileOutput {
    filename: String,
    writer: Option<BufWriter<File>>,
}

impl FileOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WriteBackend for FileOutput {
    fn open(&mut self, wxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.writer.is_none(), "FileOutput::open(), already open");
        let file = File::create(wxfilename).map_err(|source| StreamError::Open {
            name: wxfilename.to_string(),
            source,
        })?;
        debug!("opened {wxfilename} for writing");
        self.filename = wxfilename.to_string();
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn stream(&mut self) -> &mut (dyn Write + Send) {
        match self.writer.as_mut() {
            Some(writer) => writer,
            None => panic!("FileOutput::stream(), file is not open"),
        }
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let Some(writer) = self.writer.take() else {
            panic!("FileOutput::close(), file is not open");
        };
        writer.into_inner().map(drop).map_err(|err| StreamError::Close {
            name: self.filename.clone(),
            hint: " (disk full?)",
            source: err.into_error(),
        })
    }

    fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::File
    }
}
