use std::io::Write;

use kaldi_io_matrix::{read_htk, write_htk, HtkHeader, Matrix};
use kaldi_io_wire::InputStream;

use crate::holder::{report, store};
use crate::{Holder, HolderError};

/// HTK feature files; binary only, with no binary-mode marker.
#[derive(Debug, Default)]
pub struct HtkMatrixHolder {
    value: (Matrix<f32>, HtkHeader),
}

impl Holder for HtkMatrixHolder {
    type Value = (Matrix<f32>, HtkHeader);

    fn write<W: Write + ?Sized>(os: &mut W, binary: bool, value: &Self::Value) -> bool {
        let result = if binary {
            write_htk(os, &value.0, value.1).map_err(HolderError::from)
        } else {
            Err(HolderError::BinaryOnly("HTK matrix"))
        };
        report("HtkMatrixHolder::write", result)
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = read_htk(is).map_err(HolderError::from);
        report("HtkMatrixHolder::read", store(&mut self.value, result))
    }

    fn value(&self) -> &Self::Value {
        &self.value
    }

    fn clear(&mut self) {
        self.value = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_only() {
        let header = HtkHeader {
            num_samples: 1,
            sample_period: 100_000,
            sample_size: 8,
            sample_kind: 9,
        };
        let value = (Matrix::<f32>::from_rows(&[vec![1.0, 2.0]]).unwrap(), header);
        assert!(!HtkMatrixHolder::write(&mut Vec::new(), false, &value));

        let mut buf = Vec::new();
        assert!(HtkMatrixHolder::write(&mut buf, true, &value));
        assert_eq!(buf.len(), 12 + 8);
        let mut holder = HtkMatrixHolder::default();
        assert!(holder.read(&mut InputStream::from_bytes(buf)));
        assert_eq!(holder.value(), &value);
    }
}
