//! Shell pipes. The descriptor minus its `|` is run with `sh -c`.

use std::io::{BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use kaldi_io_wire::InputStream;
use log::{debug, warn};

use super::{ReadBackend, WriteBackend};
use crate::{printable_rxfilename, ResourceKind, StreamError};

fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        // Killed by a signal.
        None => -1,
    }
}

/// Waits for the child and warns about a non-zero exit status.
fn reap(child: &mut Child, descriptor: &str) -> i32 {
    match child.wait() {
        Ok(status) => {
            let code = exit_code(status);
            if code != 0 {
                warn!("Pipe {descriptor} had nonzero return status {code}");
            }
            code
        }
        Err(err) => {
            warn!("Pipe {descriptor}: failed waiting for process: {err}");
            -1
        }
    }
}

/// Reads the standard output of `command |`.
#[derive(Default)]
pub struct PipeInput {
    descriptor: String,
    child: Option<Child>,
    stream: Option<InputStream>,
}

impl PipeInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadBackend for PipeInput {
    fn open(&mut self, rxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.child.is_none(), "PipeInput::open(), already open");
        let command = rxfilename.strip_suffix('|').unwrap_or(rxfilename);
        let mut child = shell(command)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| StreamError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            return Err(StreamError::Spawn {
                command: command.to_string(),
                source: std::io::Error::other("no stdout handle"),
            });
        };
        debug!("spawned read pipe: {command}");
        let mut stream = InputStream::new(BufReader::new(stdout));
        if stream.at_eof()? {
            // An empty pipe may be valid.
            warn!(
                "Pipe opened with command {} is empty.",
                printable_rxfilename(rxfilename)
            );
        }
        self.descriptor = rxfilename.to_string();
        self.child = Some(child);
        self.stream = Some(stream);
        Ok(())
    }

    fn stream(&mut self) -> &mut InputStream {
        match self.stream.as_mut() {
            Some(stream) => stream,
            None => panic!("PipeInput::stream(), object not initialized"),
        }
    }

    fn close(&mut self) -> i32 {
        let Some(mut child) = self.child.take() else {
            panic!("PipeInput::close(), file is not open");
        };
        // Dropping the read end first lets a producer blocked on a full
        // pipe terminate.
        self.stream = None;
        reap(&mut child, &self.descriptor)
    }

    fn is_open(&self) -> bool {
        self.child.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Pipe
    }
}

impl Drop for PipeInput {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.close();
        }
    }
}

/// Feeds the standard input of `| command`.
#[derive(Default)]
pub struct PipeOutput {
    descriptor: String,
    child: Option<Child>,
    writer: Option<BufWriter<ChildStdin>>,
}

impl PipeOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WriteBackend for PipeOutput {
    fn open(&mut self, wxfilename: &str, _binary: bool) -> Result<(), StreamError> {
        assert!(self.child.is_none(), "PipeOutput::open(), already open");
        let command = wxfilename.strip_prefix('|').unwrap_or(wxfilename);
        let mut child = shell(command)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| StreamError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let Some(stdin) = child.stdin.take() else {
            return Err(StreamError::Spawn {
                command: command.to_string(),
                source: std::io::Error::other("no stdin handle"),
            });
        };
        debug!("spawned write pipe: {command}");
        self.descriptor = wxfilename.to_string();
        self.child = Some(child);
        self.writer = Some(BufWriter::new(stdin));
        Ok(())
    }

    fn stream(&mut self) -> &mut (dyn Write + Send) {
        match self.writer.as_mut() {
            Some(writer) => writer,
            None => panic!("PipeOutput::stream(), object not initialized"),
        }
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let Some(mut child) = self.child.take() else {
            panic!("PipeOutput::close(), file is not open");
        };
        let flushed = match self.writer.take() {
            // Dropping the writer closes the pipe so the child sees EOF.
            Some(writer) => writer.into_inner().map(drop).map_err(|err| err.into_error()),
            None => Ok(()),
        };
        reap(&mut child, &self.descriptor);
        flushed.map_err(|source| StreamError::Close {
            name: self.descriptor.clone(),
            hint: "",
            source,
        })
    }

    fn is_open(&self) -> bool {
        self.child.is_some()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Pipe
    }
}

impl Drop for PipeOutput {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(err) = self.close() {
                warn!("{err}");
            }
        }
    }
}
