//! Per-frame posteriors: `(id, weight)` lists, and the Gaussian-level
//! variant carrying a weight vector per id.

use std::io::Write;

use kaldi_io_matrix::Vector;
use kaldi_io_wire::{
    format_real, init_input_stream, init_output_stream, read_basic_type, write_basic_type,
    InputStream,
};

use crate::basic::{read_count, write_count};
use crate::holder::{read_line, report, store};
use crate::{Holder, HolderError};

/// For each frame, a list of `(id, weight)` pairs.
pub type Posterior = Vec<Vec<(i32, f32)>>;

/// For each frame, a list of ids each with a vector of weights.
pub type GaussPost = Vec<Vec<(i32, Vector<f32>)>>;

/// Frame counts above this are taken to be corruption.
const MAX_FRAMES: usize = 10_000_000;

/// Binary: frame count, then per frame a pair count and the pairs. Text:
/// one line of `[ id weight ... ]` groups.
pub fn write_posterior<W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    post: &Posterior,
) -> Result<(), HolderError> {
    if binary {
        write_count(os, post.len())?;
        for frame in post {
            write_count(os, frame.len())?;
            for &(id, weight) in frame {
                write_basic_type(os, true, id)?;
                write_basic_type(os, true, weight)?;
            }
        }
        return Ok(());
    }
    let mut line = String::new();
    for frame in post {
        line.push_str("[ ");
        for &(id, weight) in frame {
            line.push_str(&format!("{id} {} ", format_real(weight)));
        }
        line.push_str("] ");
    }
    line.push('\n');
    os.write_all(line.as_bytes())?;
    Ok(())
}

pub fn read_posterior(is: &mut InputStream, binary: bool) -> Result<Posterior, HolderError> {
    if binary {
        let n = read_count(is)?;
        if n > MAX_FRAMES {
            return Err(HolderError::Malformed(format!(
                "reading posterior: improbably large size {n}"
            )));
        }
        let mut post = Vec::with_capacity(n);
        for _ in 0..n {
            let m = read_count(is)?;
            let mut frame = Vec::with_capacity(m.min(1 << 16));
            for _ in 0..m {
                let id: i32 = read_basic_type(is, true)?;
                let weight: f32 = read_basic_type(is, true)?;
                frame.push((id, weight));
            }
            post.push(frame);
        }
        return Ok(post);
    }
    let mut line = InputStream::from_bytes(read_line(is)?);
    let mut post = Vec::new();
    loop {
        line.skip_whitespace()?;
        if line.at_eof()? {
            break;
        }
        let open = line.read_non_whitespace()?;
        if open != b"[" {
            return Err(HolderError::Malformed(format!(
                "reading posterior: expected '[', got {:?}",
                String::from_utf8_lossy(&open)
            )));
        }
        let mut frame = Vec::new();
        loop {
            line.skip_whitespace()?;
            if line.peek()? == Some(b']') {
                line.get()?;
                break;
            }
            let id: i32 = read_basic_type(&mut line, false)?;
            let weight: f32 = read_basic_type(&mut line, false)?;
            frame.push((id, weight));
        }
        post.push(frame);
    }
    Ok(post)
}

pub fn write_gauss_post<W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    gpost: &GaussPost,
) -> Result<(), HolderError> {
    write_count_mode(os, binary, gpost.len())?;
    for frame in gpost {
        write_count_mode(os, binary, frame.len())?;
        for (id, weights) in frame {
            write_basic_type(os, binary, *id)?;
            weights.write(os, binary)?;
        }
    }
    if !binary {
        os.write_all(b"\n")?;
    }
    Ok(())
}

pub fn read_gauss_post(is: &mut InputStream, binary: bool) -> Result<GaussPost, HolderError> {
    let n = read_count_mode(is, binary)?;
    let mut gpost = Vec::with_capacity(n.min(MAX_FRAMES));
    for _ in 0..n {
        let m = read_count_mode(is, binary)?;
        let mut frame = Vec::with_capacity(m.min(1 << 16));
        for _ in 0..m {
            let id: i32 = read_basic_type(is, binary)?;
            let mut weights = Vector::default();
            weights.read(is, binary)?;
            frame.push((id, weights));
        }
        gpost.push(frame);
    }
    Ok(gpost)
}

fn write_count_mode<W: Write + ?Sized>(
    os: &mut W,
    binary: bool,
    n: usize,
) -> Result<(), HolderError> {
    if binary {
        return write_count(os, n);
    }
    let n = i32::try_from(n).map_err(|_| HolderError::Malformed(format!("size {n} too large")))?;
    write_basic_type(os, false, n)?;
    Ok(())
}

fn read_count_mode(is: &mut InputStream, binary: bool) -> Result<usize, HolderError> {
    if binary {
        return read_count(is);
    }
    let n: i32 = read_basic_type(is, false)?;
    usize::try_from(n).map_err(|_| HolderError::Malformed(format!("negative size {n}")))
}

#[derive(Debug, Default)]
pub struct PosteriorHolder {
    value: Posterior,
}

impl Holder for PosteriorHolder {
    type Value = Posterior;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Posterior) -> bool {
        let result = init_output_stream(os, binary)
            .map_err(HolderError::from)
            .and_then(|()| write_posterior(os, binary, value));
        report("PosteriorHolder::write", result)
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = init_input_stream(is)
            .map_err(HolderError::from)
            .and_then(|binary| read_posterior(is, binary));
        report("PosteriorHolder::read", store(&mut self.value, result))
    }

    fn value(&self) -> &Posterior {
        &self.value
    }

    fn clear(&mut self) {
        self.value = Posterior::new();
    }
}

#[derive(Debug, Default)]
pub struct GaussPostHolder {
    value: GaussPost,
}

impl Holder for GaussPostHolder {
    type Value = GaussPost;

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &GaussPost) -> bool {
        let result = init_output_stream(os, binary)
            .map_err(HolderError::from)
            .and_then(|()| write_gauss_post(os, binary, value));
        report("GaussPostHolder::write", result)
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = init_input_stream(is)
            .map_err(HolderError::from)
            .and_then(|binary| read_gauss_post(is, binary));
        report("GaussPostHolder::read", store(&mut self.value, result))
    }

    fn value(&self) -> &GaussPost {
        &self.value
    }

    fn clear(&mut self) {
        self.value = GaussPost::new();
    }
}
