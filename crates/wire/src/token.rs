//! Whitespace-free tokens such as `<Nnet>` or `FM`.

use std::io::Write;

use kaldi_io_util::{char_to_string, is_token, is_whitespace};

use crate::basic::read_word;
use crate::{InputStream, WireError};

pub fn check_token(token: &str) -> Result<(), WireError> {
    if is_token(token) {
        Ok(())
    } else {
        Err(WireError::InvalidToken(token.to_string()))
    }
}

/// Writes `token` followed by one space. Nothing is written if the token
/// is empty or contains whitespace.
pub fn write_token<W: Write + ?Sized>(
    os: &mut W,
    _binary: bool,
    token: &str,
) -> Result<(), WireError> {
    check_token(token)?;
    os.write_all(token.as_bytes())?;
    os.write_all(b" ")?;
    Ok(())
}

/// Reads a token and the single whitespace byte that terminates it.
pub fn read_token(is: &mut InputStream, _binary: bool) -> Result<String, WireError> {
    let (token, _) = read_word(is)?;
    match is.peek()? {
        Some(byte) if is_whitespace(byte) => {
            is.get()?;
            Ok(token)
        }
        Some(byte) => Err(WireError::TokenTerminator {
            token,
            found: char_to_string(byte),
        }),
        None => Err(WireError::TokenTerminator {
            token,
            found: "end of stream".to_string(),
        }),
    }
}

/// Next byte after skipping whitespace (text mode only); not consumed.
pub fn peek(is: &mut InputStream, binary: bool) -> Result<Option<u8>, WireError> {
    if !binary {
        is.skip_whitespace()?;
    }
    Ok(is.peek()?)
}

/// Like [`peek`] but looks past a leading `<`, so `<Foo>` peeks as `F`.
pub fn peek_token(is: &mut InputStream, binary: bool) -> Result<Option<u8>, WireError> {
    if !binary {
        is.skip_whitespace()?;
    }
    if is.peek()? != Some(b'<') {
        return Ok(is.peek()?);
    }
    is.get()?;
    let next = is.peek()?;
    is.unget(b'<');
    Ok(next)
}

/// Reads a token and checks it against `token`. A token missing its
/// leading `<` (`Foo>` for `<Foo>`) is accepted.
pub fn expect_token(is: &mut InputStream, _binary: bool, token: &str) -> Result<(), WireError> {
    check_token(token)?;
    let (found, position) = read_word(is)?;
    if is.get()?.is_none() {
        return Err(WireError::UnexpectedEof(position));
    }
    let matches = found == token
        || (token.starts_with('<') && found.as_str() == &token[1..]);
    if matches {
        Ok(())
    } else {
        Err(WireError::ExpectedToken {
            expected: token.to_string(),
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_token() {
        let mut buf = Vec::new();
        write_token(&mut buf, true, "<Foo>").unwrap();
        assert_eq!(buf, b"<Foo> ");
    }

    #[test]
    fn test_write_invalid_token_emits_nothing() {
        let mut buf = Vec::new();
        assert!(write_token(&mut buf, false, "a b").is_err());
        assert!(write_token(&mut buf, false, "").is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_read_token_requires_whitespace() {
        let mut is = InputStream::from_bytes(b"  abc\ndef".to_vec());
        assert_eq!(read_token(&mut is, false).unwrap(), "abc");
        assert!(matches!(
            read_token(&mut is, false),
            Err(WireError::TokenTerminator { .. })
        ));
    }

    #[test]
    fn test_peek_token() {
        let mut is = InputStream::from_bytes(b"  <Foo> ".to_vec());
        assert_eq!(peek_token(&mut is, false).unwrap(), Some(b'F'));
        assert_eq!(read_token(&mut is, false).unwrap(), "<Foo>");
        let mut is = InputStream::from_bytes(b"xyz ".to_vec());
        assert_eq!(peek_token(&mut is, true).unwrap(), Some(b'x'));
        assert_eq!(peek(&mut is, true).unwrap(), Some(b'x'));
    }

    #[test]
    fn test_expect_token() {
        let mut is = InputStream::from_bytes(b"<Foo> Foo> <Bar> ".to_vec());
        expect_token(&mut is, false, "<Foo>").unwrap();
        expect_token(&mut is, false, "<Foo>").unwrap();
        assert!(matches!(
            expect_token(&mut is, false, "<Baz>"),
            Err(WireError::ExpectedToken { .. })
        ));
    }
}
