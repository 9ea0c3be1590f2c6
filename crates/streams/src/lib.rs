//! Resource descriptors and the streams behind them.
//!
//! A descriptor is classified without touching the file system
//! ([`classify_rxfilename`], [`classify_wxfilename`]); an [`Input`] or
//! [`Output`] handle then opens the matching backend:
//!
//! - `""` or `"-"`: standard input / standard output
//! - `"gunzip -c foo.gz |"`: a read pipe
//! - `"| gzip -c > foo.gz"`: a write pipe
//! - `"foo.ark:1234"`: byte offset 1234 of `foo.ark`, read only
//! - anything else without misplaced pipes or padding: a plain file

pub mod backend;
mod classify;
mod error;
mod input;
mod output;

pub use classify::{
    classify, classify_rxfilename, classify_wxfilename, is_archive_specifier,
    printable_rxfilename, printable_wxfilename, split_offset_filename, Direction, ResourceKind,
};
pub use error::StreamError;
pub use input::Input;
pub use output::Output;
