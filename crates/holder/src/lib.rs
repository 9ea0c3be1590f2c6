//! Holders: the pluggable value codecs behind archives and tables.
//!
//! Every holder implements [`Holder`]; reads and writes report failure as
//! `false` and log the cause. [`read_kaldi_object`] and
//! [`write_kaldi_object`] move a single object through any descriptor.

mod basic;
mod blob;
mod error;
mod holder;
mod htk;
mod io;
mod object;
mod posterior;
mod token;
mod wave;

pub use basic::{BasicHolder, BasicPairVectorHolder, BasicVectorHolder, BasicVectorVectorHolder};
pub use blob::{Blob, BlobHolder, BLOB_MAGIC};
pub use error::HolderError;
pub use holder::Holder;
pub use htk::HtkMatrixHolder;
pub use io::{read_kaldi_object, write_kaldi_object};
pub use object::{
    CompressedMatrixHolder, KaldiObject, KaldiObjectHolder, MatrixHolder, MatrixShapeHolder,
    VectorHolder,
};
pub use posterior::{
    read_gauss_post, read_posterior, write_gauss_post, write_posterior, GaussPost,
    GaussPostHolder, Posterior, PosteriorHolder,
};
pub use token::{TokenHolder, TokenVectorHolder};
pub use wave::{WaveHolder, WaveInfoHolder};
