//! 16-bit PCM WAV files.
//!
//! [`WaveInfo`] parses the RIFF/RIFX header up to the start of the sample
//! data; [`WaveData`] additionally decodes the samples into a matrix with
//! one row per channel. Samples keep their integer scale: a full-scale
//! sample reads as `±32768.0`, not `±1.0`.

mod data;
mod error;
mod info;

pub use data::{WaveData, WAVE_SAMPLE_MAX};
pub use error::WaveError;
pub use info::WaveInfo;
