use std::io::Write;

use kaldi_io_wave::{WaveData, WaveInfo};
use kaldi_io_wire::InputStream;

use crate::holder::{report, store};
use crate::{Holder, HolderError};

/// WAV files; the mode flag is ignored and there is no binary-mode marker.
#[derive(Debug, Default)]
pub struct WaveHolder {
    value: WaveData,
}

impl Holder for WaveHolder {
    type Value = WaveData;

    fn write<W: Write + ?Sized>(os: &mut W, _binary: bool, value: &WaveData) -> bool {
        report("WaveHolder::write", value.write(os).map_err(HolderError::from))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = WaveData::read(is).map_err(HolderError::from);
        report("WaveHolder::read", store(&mut self.value, result))
    }

    fn value(&self) -> &WaveData {
        &self.value
    }

    fn clear(&mut self) {
        self.value.clear();
    }
}

/// Reads only the header of a WAV file. Writing is not supported.
#[derive(Debug, Default)]
pub struct WaveInfoHolder {
    value: WaveInfo,
}

impl Holder for WaveInfoHolder {
    type Value = WaveInfo;

    fn write<W: Write + ?Sized>(_os: &mut W, _binary: bool, _value: &WaveInfo) -> bool {
        report::<()>("WaveInfoHolder::write", Err(HolderError::ReadOnly("WaveInfo")))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = WaveInfo::read(is).map_err(HolderError::from);
        report("WaveInfoHolder::read", store(&mut self.value, result))
    }

    fn value(&self) -> &WaveInfo {
        &self.value
    }

    fn clear(&mut self) {
        self.value = WaveInfo::default();
    }
}
