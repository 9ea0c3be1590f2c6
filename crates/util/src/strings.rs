//! String utilities used by the wire format and descriptor parsing.

use std::str::FromStr;

/// Whitespace as the wire format understands it: space, `\t`, `\n`,
/// vertical tab, form feed and `\r`.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// A token is non-empty and contains no whitespace.
pub fn is_token(token: &str) -> bool {
    !token.is_empty() && !token.bytes().any(is_whitespace)
}

/// Renders a byte for diagnostics: `'x'` when printable, otherwise
/// `[character N]`.
pub fn char_to_string(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("'{}'", byte as char)
    } else {
        format!("[character {}]", byte as i8)
    }
}

/// Splits `s` on any of the bytes in `delimiters`.
pub fn split_string_to_vector(s: &str, delimiters: &str, omit_empty: bool) -> Vec<String> {
    s.split(|c: char| delimiters.contains(c))
        .filter(|part| !omit_empty || !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses a whole string as an integer; surrounding whitespace is allowed,
/// anything else is rejected.
pub fn convert_string_to_integer<T: FromStr>(s: &str) -> Option<T> {
    let trimmed = s.trim_matches(|c: char| c.is_ascii() && is_whitespace(c as u8));
    if trimmed.is_empty() {
        return None;
    }
    trimmed.strip_prefix('+').unwrap_or(trimmed).parse().ok()
}

/// Parses a whole string as a floating point number. Accepts `inf`,
/// `infinity` and `nan` in any case, with an optional sign.
pub fn convert_string_to_real<T: FromStr>(s: &str) -> Option<T> {
    let trimmed = s.trim_matches(|c: char| c.is_ascii() && is_whitespace(c as u8));
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Quotes `s` for a shell if it contains characters a shell would split on.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty() && s.bytes().all(|b| !is_whitespace(b) && b != b'\'' && b != b'"') {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}
