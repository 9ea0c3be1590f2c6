//! Kaldi-compatible I/O.
//!
//! This crate re-exports the layers of the workspace under one name:
//!
//! - [`util`] - string helpers, semaphore and the stderr logger
//! - [`wire`] - binary/text primitives over an [`InputStream`]
//! - [`streams`] - descriptor classification and [`Input`]/[`Output`]
//! - [`matrix`] - dense and compressed matrices, vectors, HTK, ranges
//! - [`wave`] - RIFF/WAVE parsing and writing
//! - [`holder`] - value codecs and whole-object reads
//!
//! [`summary`] backs the `matrix-info`, `wav-info` and `copy-blob` tools.

pub mod summary;

pub use kaldi_io_holder as holder;
pub use kaldi_io_matrix as matrix;
pub use kaldi_io_streams as streams;
pub use kaldi_io_util as util;
pub use kaldi_io_wave as wave;
pub use kaldi_io_wire as wire;

pub use kaldi_io_holder::{
    read_kaldi_object, write_kaldi_object, Blob, BlobHolder, CompressedMatrixHolder, Holder,
    HolderError, KaldiObject, MatrixHolder, VectorHolder, WaveHolder,
};
pub use kaldi_io_matrix::{CompressedMatrix, CompressionMethod, Matrix, MatrixError, Vector};
pub use kaldi_io_streams::{Input, Output, ResourceKind, StreamError};
pub use kaldi_io_wave::{WaveData, WaveError, WaveInfo};
pub use kaldi_io_wire::{InputStream, WireError};
