//! Wire protocol primitives.
//!
//! Every value travels either in binary mode (type-tagged little-endian
//! bytes) or in text mode (whitespace separated decimal). A stream in binary
//! mode starts with the two byte marker `\0B`.
//!
//! # Example
//!
//! ```
//! use kaldi_io_wire::{read_basic_type, write_basic_type, InputStream};
//!
//! let mut buf = Vec::new();
//! write_basic_type(&mut buf, true, 42i32).unwrap();
//! assert_eq!(buf, [4, 42, 0, 0, 0]);
//!
//! let mut is = InputStream::from_bytes(buf);
//! assert_eq!(read_basic_type::<i32>(&mut is, true).unwrap(), 42);
//! ```

mod basic;
mod error;
mod integer_vector;
mod marker;
mod scalar;
mod stream;
mod token;

pub use basic::{format_real, read_basic_type, read_basic_type_add, write_basic_type, BasicType};
pub use error::WireError;
pub use integer_vector::{
    read_integer_pair_vector, read_integer_vector, write_integer_pair_vector,
    write_integer_vector,
};
pub use marker::{init_input_stream, init_output_stream, BINARY_MARKER};
pub use scalar::{IntegerType, WireScalar};
pub use stream::{InputStream, Source};
pub use token::{check_token, expect_token, peek, peek_token, read_token, write_token};
