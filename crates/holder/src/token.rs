//! Holders for whitespace-free tokens. These formats have no binary form
//! and no binary-mode marker.

use std::io::Write;

use kaldi_io_util::{is_token, split_string_to_vector};
use kaldi_io_wire::InputStream;

use crate::holder::{expect_newline, read_line, report, store};
use crate::{Holder, HolderError};

/// One token per line.
#[derive(Debug, Default)]
pub struct TokenHolder {
    value: String,
}

impl TokenHolder {
    fn read_value(is: &mut InputStream) -> Result<String, HolderError> {
        is.skip_whitespace()?;
        let bytes = is.read_non_whitespace()?;
        if bytes.is_empty() {
            return Err(HolderError::Malformed("expected a token".into()));
        }
        expect_newline(is)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Holder for TokenHolder {
    type Value = String;

    /// # Panics
    ///
    /// If `value` is not a valid token.
    fn write<W: Write + ?Sized>(os: &mut W, _binary: bool, value: &String) -> bool {
        assert!(is_token(value), "TokenHolder: invalid token {value:?}");
        report("TokenHolder::write", writeln!(os, "{value}").map_err(HolderError::from))
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        report("TokenHolder::read", store(&mut self.value, Self::read_value(is)))
    }

    fn is_read_in_binary() -> bool {
        false
    }

    fn value(&self) -> &String {
        &self.value
    }

    fn clear(&mut self) {
        self.value.clear();
    }
}

/// Space-separated tokens on one line.
#[derive(Debug, Default)]
pub struct TokenVectorHolder {
    value: Vec<String>,
}

impl Holder for TokenVectorHolder {
    type Value = Vec<String>;

    /// # Panics
    ///
    /// If an element is not a valid token.
    fn write<W: Write + ?Sized>(os: &mut W, _binary: bool, value: &Vec<String>) -> bool {
        let mut line = String::new();
        for token in value {
            assert!(is_token(token), "TokenVectorHolder: invalid token {token:?}");
            line.push_str(token);
            line.push(' ');
        }
        line.push('\n');
        report(
            "TokenVectorHolder::write",
            os.write_all(line.as_bytes()).map_err(HolderError::from),
        )
    }

    fn read(&mut self, is: &mut InputStream) -> bool {
        let result = read_line(is)
            .map(|line| split_string_to_vector(&String::from_utf8_lossy(&line), " \t\r", true));
        report("TokenVectorHolder::read", store(&mut self.value, result))
    }

    fn is_read_in_binary() -> bool {
        false
    }

    fn value(&self) -> &Vec<String> {
        &self.value
    }

    fn clear(&mut self) {
        self.value.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let mut buf = Vec::new();
        assert!(TokenHolder::write(&mut buf, true, &"abc".to_string()));
        assert_eq!(buf, b"abc\n");
        let mut holder = TokenHolder::default();
        assert!(holder.read(&mut InputStream::from_bytes(buf)));
        assert_eq!(holder.value(), "abc");
        assert!(!holder.read(&mut InputStream::from_bytes(&b"abc def\n"[..])));
    }

    #[test]
    #[should_panic(expected = "invalid token")]
    fn test_token_with_space_panics() {
        TokenHolder::write(&mut Vec::new(), false, &"a b".to_string());
    }

    #[test]
    fn test_token_vector() {
        let tokens = vec!["a".to_string(), "bc".to_string()];
        let mut buf = Vec::new();
        assert!(TokenVectorHolder::write(&mut buf, false, &tokens));
        assert_eq!(buf, b"a bc \n");
        let mut holder = TokenVectorHolder::default();
        assert!(holder.read(&mut InputStream::from_bytes(&b" a\tbc \r\nnext"[..])));
        assert_eq!(holder.value(), &tokens);
    }
}
