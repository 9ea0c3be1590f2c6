//! Shared helpers for the kaldi-io crates.
//!
//! - [`strings`] - token validity, character rendering, numeric parsing
//! - [`logging`] - stderr output for `log` records via `tracing_subscriber`
//! - [`Semaphore`] - counting wait/signal primitive for producer/consumer handoff

pub mod logging;
mod semaphore;
pub mod strings;

pub use semaphore::Semaphore;
pub use strings::{
    char_to_string, convert_string_to_integer, convert_string_to_real, is_token, is_whitespace,
    split_string_to_vector,
};
