//! Descriptor classification. Pure: no I/O, total over all strings.

use std::sync::OnceLock;

use kaldi_io_util::is_whitespace;
use kaldi_io_util::strings::{convert_string_to_integer, shell_quote};
use log::warn;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    File,
    StandardStream,
    Pipe,
    /// `path:offset`; only valid for reading.
    OffsetFile,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

pub fn classify(descriptor: &str, direction: Direction) -> ResourceKind {
    match direction {
        Direction::Read => classify_rxfilename(descriptor),
        Direction::Write => classify_wxfilename(descriptor),
    }
}

/// True if `s` looks like a table specifier such as `ark:foo.ark`,
/// `scp,p:foo.scp` or `ark,t:-`.
pub fn is_archive_specifier(s: &str) -> bool {
    static SPECIFIER: OnceLock<Regex> = OnceLock::new();
    SPECIFIER
        .get_or_init(|| {
            Regex::new(r"^(?:[a-z]+,)*(?:ark|scp)(?:,[a-z]+)*:").expect("valid specifier regex")
        })
        .is_match(s)
}

fn edge_bytes(s: &str) -> (u8, u8) {
    let bytes = s.as_bytes();
    (
        bytes.first().copied().unwrap_or(0),
        bytes.last().copied().unwrap_or(0),
    )
}

fn looks_like_specifier(s: &str, first: u8) -> bool {
    (first == b'a' || first == b's') && s.contains(':') && is_archive_specifier(s)
}

/// True if the run of digits ending `s` is preceded by a colon.
fn has_offset_suffix(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = bytes.len() - 1;
    while bytes[i].is_ascii_digit() && i > 0 {
        i -= 1;
    }
    bytes[i] == b':'
}

pub fn classify_wxfilename(filename: &str) -> ResourceKind {
    let (first, last) = edge_bytes(filename);
    if filename.is_empty() || filename == "-" {
        return ResourceKind::StandardStream;
    }
    if first == b'|' {
        return ResourceKind::Pipe;
    }
    if is_whitespace(first) || is_whitespace(last) || last == b'|' {
        return ResourceKind::Invalid;
    }
    if looks_like_specifier(filename, first) {
        return ResourceKind::Invalid;
    }
    if last.is_ascii_digit() && has_offset_suffix(filename) {
        return ResourceKind::Invalid;
    }
    if filename.contains('|') {
        warn!(
            "Trying to classify wxfilename with pipe symbol in the wrong place \
             (pipe without | at the beginning?): {filename}"
        );
        return ResourceKind::Invalid;
    }
    ResourceKind::File
}

pub fn classify_rxfilename(filename: &str) -> ResourceKind {
    let (first, last) = edge_bytes(filename);
    if filename.is_empty() || filename == "-" {
        return ResourceKind::StandardStream;
    }
    if first == b'|' {
        return ResourceKind::Invalid;
    }
    if last == b'|' {
        return ResourceKind::Pipe;
    }
    if is_whitespace(first) || is_whitespace(last) {
        return ResourceKind::Invalid;
    }
    if looks_like_specifier(filename, first) {
        return ResourceKind::Invalid;
    }
    if last.is_ascii_digit() && has_offset_suffix(filename) {
        return ResourceKind::OffsetFile;
    }
    if filename.contains('|') {
        warn!(
            "Trying to classify rxfilename with pipe symbol in the wrong place \
             (pipe without | at the end?): {filename}"
        );
        return ResourceKind::Invalid;
    }
    ResourceKind::File
}

/// Splits `/my/file:123` into `("/my/file", 123)` at the last colon.
pub fn split_offset_filename(rxfilename: &str) -> Option<(&str, u64)> {
    let (path, offset) = rxfilename.rsplit_once(':')?;
    Some((path, convert_string_to_integer(offset)?))
}

pub fn printable_rxfilename(rxfilename: &str) -> String {
    if rxfilename.is_empty() || rxfilename == "-" {
        "standard input".to_string()
    } else {
        shell_quote(rxfilename)
    }
}

pub fn printable_wxfilename(wxfilename: &str) -> String {
    if wxfilename.is_empty() || wxfilename == "-" {
        "standard output".to_string()
    } else {
        shell_quote(wxfilename)
    }
}
