//! Holders for scalars and (nested) sequences of scalars.
//!
//! Text forms are one line per value: `7`, `1 2 3`, `1 2 ; 3 ; ` and
//! `1 2 ; 3 4`.

use std::io::Write;

use kaldi_io_wire::{
    init_input_stream, init_output_stream, read_basic_type, write_basic_type, BasicType,
    InputStream,
};

use crate::holder::{expect_newline, read_line, report, store};
use crate::{Holder, HolderError};

/// Reads a binary `i32` count, rejecting negative values.
pub(crate) fn read_count(is: &mut InputStream) -> Result<usize, HolderError> {
    let n: i32 = read_basic_type(is, true)?;
    usize::try_from(n).map_err(|_| HolderError::Malformed(format!("negative size {n}")))
}

pub(crate) fn write_count<W: Write + ?Sized>(os: &mut W, n: usize) -> Result<(), HolderError> {
    let n = i32::try_from(n).map_err(|_| HolderError::Malformed(format!("size {n} too large")))?;
    write_basic_type(os, true, n)?;
    Ok(())
}

/// A single scalar.
#[derive(Debug, Default)]
pub struct BasicHolder<T> {
    value: T,
}

impl<T: BasicType + Default> BasicHolder<T> {
    fn write_value<W: Write + ?Sized>(
        os: &mut W,
        binary: bool,
        value: &T,
    ) -> Result<(), HolderError> {
        init_output_stream(os, binary)?;
        write_basic_type(os, binary, *value)?;
        if !binary {
            os.write_all(b"\n")?;
        }
        Ok(())
    }

    fn read_value(is: &mut InputStream) -> Result<T, HolderError> {
        let binary = init_input_stream(is)?;
        let value = read_basic_type(is, binary)?;
        if !binary {
            expect_newline(is)?;
        }
        Ok(value)
    }
}

impl<T: BasicType + Default> Holder for BasicHolder<T> {
    type Value = T;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &T) -> bool {
        report("BasicHolder::write", Self::write_value(os, binary, value))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        report("BasicHolder::read", store(&mut self.value, Self::read_value(is)))
    }

    fn value(&self) -> &T {
        &self.value
    }

    fn clear(&mut self) {
        self.value = T::default();
    }
}

/// A sequence of scalars; text form is one line.
#[derive(Debug, Default)]
pub struct BasicVectorHolder<T> {
    value: Vec<T>,
}

impl<T: BasicType + Default> BasicVectorHolder<T> {
    fn write_value<W: Write + ?Sized>(
        os: &mut W,
        binary: bool,
        value: &[T],
    ) -> Result<(), HolderError> {
        init_output_stream(os, binary)?;
        if binary {
            write_count(os, value.len())?;
        }
        for &v in value {
            write_basic_type(os, binary, v)?;
        }
        if !binary {
            os.write_all(b"\n")?;
        }
        Ok(())
    }

    fn read_value(is: &mut InputStream) -> Result<Vec<T>, HolderError> {
        let mut value = Vec::new();
        let binary = init_input_stream(is)?;
        if binary {
            let n = read_count(is)?;
            for _ in 0..n {
                value.push(read_basic_type(is, true)?);
            }
        } else {
            let mut line = InputStream::from_bytes(read_line(is)?);
            loop {
                line.skip_whitespace()?;
                if line.at_eof()? {
                    break;
                }
                value.push(read_basic_type(&mut line, false)?);
            }
        }
        Ok(value)
    }
}

impl<T: BasicType + Default> Holder for BasicVectorHolder<T> {
    type Value = Vec<T>;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Vec<T>) -> bool {
        report("BasicVectorHolder::write", Self::write_value(os, binary, value))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        report("BasicVectorHolder::read", store(&mut self.value, Self::read_value(is)))
    }

    fn value(&self) -> &Vec<T> {
        &self.value
    }

    fn clear(&mut self) {
        self.value = Vec::new();
    }
}

/// A sequence of sequences; in text every inner sequence ends with `;`.
#[derive(Debug, Default)]
pub struct BasicVectorVectorHolder<T> {
    value: Vec<Vec<T>>,
}

impl<T: BasicType + Default> BasicVectorVectorHolder<T> {
    fn write_value<W: Write + ?Sized>(
        os: &mut W,
        binary: bool,
        value: &[Vec<T>],
    ) -> Result<(), HolderError> {
        init_output_stream(os, binary)?;
        if binary {
            write_count(os, value.len())?;
            for inner in value {
                write_count(os, inner.len())?;
                for &v in inner {
                    write_basic_type(os, true, v)?;
                }
            }
        } else {
            for inner in value {
                for &v in inner {
                    write_basic_type(os, false, v)?;
                }
                os.write_all(b"; ")?;
            }
            os.write_all(b"\n")?;
        }
        Ok(())
    }

    fn read_value(is: &mut InputStream) -> Result<Vec<Vec<T>>, HolderError> {
        let mut value = Vec::new();
        let binary = init_input_stream(is)?;
        if binary {
            let n = read_count(is)?;
            for _ in 0..n {
                let m = read_count(is)?;
                let mut inner = Vec::with_capacity(m.min(1 << 16));
                for _ in 0..m {
                    inner.push(read_basic_type(is, true)?);
                }
                value.push(inner);
            }
            return Ok(value);
        }
        let mut line = InputStream::from_bytes(read_line(is)?);
        let mut current = Vec::new();
        loop {
            line.skip_whitespace()?;
            match line.peek()? {
                None => break,
                Some(b';') => {
                    line.get()?;
                    value.push(std::mem::take(&mut current));
                }
                Some(_) => current.push(read_basic_type(&mut line, false)?),
            }
        }
        if !current.is_empty() {
            return Err(HolderError::Malformed(
                "unterminated sequence (missing ';')".into(),
            ));
        }
        Ok(value)
    }
}

impl<T: BasicType + Default> Holder for BasicVectorVectorHolder<T> {
    type Value = Vec<Vec<T>>;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Vec<Vec<T>>) -> bool {
        report("BasicVectorVectorHolder::write", Self::write_value(os, binary, value))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        report("BasicVectorVectorHolder::read", store(&mut self.value, Self::read_value(is)))
    }

    fn value(&self) -> &Vec<Vec<T>> {
        &self.value
    }

    fn clear(&mut self) {
        self.value = Vec::new();
    }
}

/// A sequence of pairs; text form `a b ; c d`.
#[derive(Debug, Default)]
pub struct BasicPairVectorHolder<T> {
    value: Vec<(T, T)>,
}

impl<T: BasicType + Default> BasicPairVectorHolder<T> {
    fn write_value<W: Write + ?Sized>(
        os: &mut W,
        binary: bool,
        value: &[(T, T)],
    ) -> Result<(), HolderError> {
        init_output_stream(os, binary)?;
        if binary {
            write_count(os, value.len())?;
        }
        for (i, &(a, b)) in value.iter().enumerate() {
            write_basic_type(os, binary, a)?;
            write_basic_type(os, binary, b)?;
            if !binary && i + 1 != value.len() {
                os.write_all(b"; ")?;
            }
        }
        if !binary {
            os.write_all(b"\n")?;
        }
        Ok(())
    }

    fn read_value(is: &mut InputStream) -> Result<Vec<(T, T)>, HolderError> {
        let mut value = Vec::new();
        let binary = init_input_stream(is)?;
        if binary {
            let n = read_count(is)?;
            for _ in 0..n {
                let a = read_basic_type(is, true)?;
                let b = read_basic_type(is, true)?;
                value.push((a, b));
            }
            return Ok(value);
        }
        let mut line = InputStream::from_bytes(read_line(is)?);
        loop {
            line.skip_whitespace()?;
            if line.at_eof()? {
                break;
            }
            let a = read_basic_type(&mut line, false)?;
            let b = read_basic_type(&mut line, false)?;
            value.push((a, b));
            line.skip_whitespace()?;
            match line.get()? {
                None => break,
                Some(b';') => {}
                Some(other) => {
                    return Err(HolderError::Malformed(format!(
                        "expected ';' between pairs, got {}",
                        kaldi_io_util::char_to_string(other)
                    )))
                }
            }
        }
        Ok(value)
    }
}

impl<T: BasicType + Default> Holder for BasicPairVectorHolder<T> {
    type Value = Vec<(T, T)>;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Vec<(T, T)>) -> bool {
        report("BasicPairVectorHolder::write", Self::write_value(os, binary, value))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        report("BasicPairVectorHolder::read", store(&mut self.value, Self::read_value(is)))
    }

    fn value(&self) -> &Vec<(T, T)> {
        &self.value
    }

    fn clear(&mut self) {
        self.value = Vec::new();
    }
}
