//! Opaque byte payloads stored as archive entries.
//!
//! Binary layout after the binary-mode marker: a little-endian `i32` magic
//! number, a little-endian `i64` length, then the bytes.

use std::io::{Read, Write};

use kaldi_io_util::convert_string_to_integer;
use kaldi_io_wire::InputStream;

use crate::object::{KaldiObject, KaldiObjectHolder};
use crate::HolderError;

pub const BLOB_MAGIC: i32 = 0x2022_1114;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes `start` through `end` inclusive, from a `start:end` specifier.
    /// An empty `start` means 0; an empty `end` or `-1` means the last byte.
    pub fn range(&self, spec: &str) -> Result<Self, HolderError> {
        let invalid = |reason: &str| HolderError::Range {
            range: spec.to_string(),
            reason: reason.to_string(),
        };
        let (start, end) = spec.split_once(':').ok_or_else(|| invalid("expected start:end"))?;
        let start: i64 = if start.is_empty() {
            0
        } else {
            convert_string_to_integer(start).ok_or_else(|| invalid("bad start"))?
        };
        let end: i64 = if end.is_empty() {
            -1
        } else {
            convert_string_to_integer(end).ok_or_else(|| invalid("bad end"))?
        };
        let len = self.data.len() as i64;
        let end = if end == -1 { len - 1 } else { end };
        if start < 0 || end < start || end >= len {
            return Err(invalid(&format!("outside a blob of {len} bytes")));
        }
        Ok(Self::new(self.data[start as usize..=end as usize].to_vec()))
    }
}

impl KaldiObject for Blob {
    const NAME: &'static str = "Blob";

    fn write_object<W: Write + ?Sized>(
        &self,
        os: &mut W,
        binary: bool,
    ) -> Result<(), HolderError> {
        if !binary {
            return Err(HolderError::BinaryOnly(Self::NAME));
        }
        let mut header = Vec::with_capacity(12);
        header.extend_from_slice(&BLOB_MAGIC.to_le_bytes());
        header.extend_from_slice(&(self.data.len() as i64).to_le_bytes());
        os.write_all(&header)?;
        os.write_all(&self.data)?;
        Ok(())
    }

    fn read_object(&mut self, is: &mut InputStream, binary: bool) -> Result<(), HolderError> {
        if !binary {
            return Err(HolderError::BinaryOnly(Self::NAME));
        }
        let magic = i32::from_le_bytes(is.read_array()?);
        if magic != BLOB_MAGIC {
            return Err(HolderError::Malformed(format!(
                "blob magic {magic:#x}, expected {BLOB_MAGIC:#x}"
            )));
        }
        let len = i64::from_le_bytes(is.read_array()?);
        let len = u64::try_from(len)
            .map_err(|_| HolderError::Malformed(format!("negative blob length {len}")))?;
        self.data.clear();
        let read = is.by_ref().take(len).read_to_end(&mut self.data)?;
        if read as u64 != len {
            return Err(HolderError::Malformed(format!(
                "blob truncated: expected {len} bytes, got {read}"
            )));
        }
        Ok(())
    }

    fn extract_range(&self, range: &str) -> Result<Self, HolderError> {
        self.range(range)
    }
}

pub type BlobHolder = KaldiObjectHolder<Blob>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Holder;

    #[test]
    fn test_layout() {
        let mut buf = Vec::new();
        assert!(BlobHolder::write(&mut buf, true, &Blob::new(b"hi".to_vec())));
        assert_eq!(
            buf,
            [0, b'B', 0x14, 0x11, 0x22, 0x20, 2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']
        );
        let mut holder = BlobHolder::default();
        assert!(holder.read(&mut InputStream::from_bytes(buf)));
        assert_eq!(holder.value().as_bytes(), b"hi");
    }

    #[test]
    fn test_text_mode_fails() {
        assert!(!BlobHolder::write(&mut Vec::new(), false, &Blob::default()));
        let mut holder = BlobHolder::default();
        assert!(!holder.read(&mut InputStream::from_bytes(&b"text"[..])));
    }

    #[test]
    fn test_truncated_and_bad_magic() {
        let mut buf = Vec::new();
        BlobHolder::write(&mut buf, true, &Blob::new(vec![1, 2, 3]));
        let mut holder = BlobHolder::default();
        assert!(!holder.read(&mut InputStream::from_bytes(buf[..buf.len() - 1].to_vec())));
        buf[2] = 0;
        assert!(!holder.read(&mut InputStream::from_bytes(buf)));
    }

    #[test]
    fn test_range() {
        let blob = Blob::new((0u8..10).collect());
        assert_eq!(blob.range("2:4").unwrap().as_bytes(), &[2, 3, 4]);
        assert_eq!(blob.range("7:-1").unwrap().as_bytes(), &[7, 8, 9]);
        assert_eq!(blob.range(":").unwrap().len(), 10);
        for bad in ["4:2", "0:10", "-2:3", "3", "a:b"] {
            assert!(blob.range(bad).is_err(), "{bad}");
        }
    }
}
