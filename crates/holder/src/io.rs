//! Whole-object reads and writes by descriptor.

use kaldi_io_matrix::extract_range_specifier;
use kaldi_io_streams::{Input, Output};

use crate::object::KaldiObject;
use crate::HolderError;

/// Reads one object from `rxfilename`, which may carry a range suffix
/// such as `feats.ark:1024[0:99]`.
pub fn read_kaldi_object<T: KaldiObject>(rxfilename: &str) -> Result<T, HolderError> {
    let (path, range) = extract_range_specifier(rxfilename)?;
    let (mut input, binary) = Input::from_rxfilename(path)?;
    let mut value = T::default();
    value.read_object(input.stream(), binary)?;
    let status = input.close();
    if status != 0 {
        log::warn!("{path}: input closed with status {status}");
    }
    match range {
        Some(spec) => value.extract_range(spec),
        None => Ok(value),
    }
}

/// Writes `value` to `wxfilename`, with the binary-mode marker in binary
/// mode.
pub fn write_kaldi_object<T: KaldiObject>(
    value: &T,
    wxfilename: &str,
    binary: bool,
) -> Result<(), HolderError> {
    let mut output = Output::create(wxfilename, binary, true)?;
    value.write_object(output.stream(), binary)?;
    output.close()?;
    Ok(())
}
