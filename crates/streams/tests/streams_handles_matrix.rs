//! Input/Output handle scenarios over real files and pipes.

use std::io::{Read, Write};

use kaldi_io_streams::{
    classify, classify_rxfilename, classify_wxfilename, Direction, Input, Output, ResourceKind,
    StreamError,
};
use kaldi_io_wire::{read_basic_type, read_token, write_basic_type, write_token};
use proptest::prelude::*;

fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn file_round_trip_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "a.bin");
    for binary in [true, false] {
        let mut out = Output::create(&path, binary, true).unwrap();
        write_token(out.stream(), binary, "<Dim>").unwrap();
        write_basic_type(out.stream(), binary, 42i32).unwrap();
        out.close().unwrap();

        let (mut input, detected) = Input::from_rxfilename(&path).unwrap();
        assert_eq!(detected, binary);
        assert_eq!(read_token(input.stream(), detected).unwrap(), "<Dim>");
        assert_eq!(read_basic_type::<i32>(input.stream(), detected).unwrap(), 42);
        assert_eq!(input.close(), 0);
    }
}

#[test]
fn missing_file_fails_to_open() {
    let mut input = Input::new();
    assert!(matches!(
        input.open("/nonexistent/dir/file"),
        Err(StreamError::Open { .. })
    ));
    assert!(!input.is_open());
}

#[test]
fn invalid_descriptors_fail_to_open() {
    let mut input = Input::new();
    assert!(matches!(
        input.open(" foo"),
        Err(StreamError::InvalidRxfilename(_))
    ));
    let mut output = Output::new();
    assert!(matches!(
        output.open("foo.ark:12", true, true),
        Err(StreamError::InvalidWxfilename(_))
    ));
}

#[test]
fn close_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "c.txt");
    let mut output = Output::create(&path, false, false).unwrap();
    output.close().unwrap();
    assert!(matches!(output.close(), Err(StreamError::NotOpen)));

    let mut input = Input::new();
    assert_eq!(input.close(), 0);
}

#[test]
fn reopen_closes_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let first = temp_path(&dir, "first.txt");
    let second = temp_path(&dir, "second.txt");
    let mut output = Output::create(&first, false, false).unwrap();
    output.stream().write_all(b"one").unwrap();
    output.open(&second, false, false).unwrap();
    output.stream().write_all(b"two").unwrap();
    output.close().unwrap();
    assert_eq!(std::fs::read(&first).unwrap(), b"one");
    assert_eq!(std::fs::read(&second).unwrap(), b"two");
}

#[test]
#[should_panic(expected = "not open")]
fn stream_on_closed_input_panics() {
    let mut input = Input::new();
    input.stream();
}

// ---------------------------------------------------------------------------
// Pipes
// ---------------------------------------------------------------------------

#[test]
fn pipe_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "p.txt");
    let mut output = Output::create(&format!("| cat > {path}"), true, true).unwrap();
    assert_eq!(output.kind(), Some(ResourceKind::Pipe));
    write_basic_type(output.stream(), true, 7u16).unwrap();
    output.close().unwrap();

    let mut input = Input::new();
    let binary = input.open_detect(&format!("cat {path} |")).unwrap();
    assert!(binary);
    assert_eq!(read_basic_type::<u16>(input.stream(), true).unwrap(), 7);
    assert_eq!(input.close(), 0);
}

#[test]
fn pipe_exit_status_is_reported_not_fatal() {
    let mut input = Input::new();
    input.open("echo hello; exit 3 |").unwrap();
    let mut text = String::new();
    input.stream().read_to_string(&mut text).unwrap();
    assert_eq!(text, "hello\n");
    assert_eq!(input.close(), 3);
}

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

#[test]
fn offset_reads_match_fresh_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "o.bin");
    let bytes: Vec<u8> = (0..400u32).map(|i| (i * 7 % 251) as u8).collect();
    std::fs::write(&path, &bytes).unwrap();

    let mut shared = Input::new();
    for offset in [0u64, 50, 100, 150, 390, 20] {
        let descriptor = format!("{path}:{offset}");
        shared.open(&descriptor).unwrap();
        let mut reused = [0u8; 10];
        shared.stream().read_exact(&mut reused).unwrap_or(());

        let mut fresh_input = Input::new();
        fresh_input.open(&descriptor).unwrap();
        let mut fresh = [0u8; 10];
        fresh_input.stream().read_exact(&mut fresh).unwrap_or(());

        assert_eq!(reused, fresh, "offset {offset}");
        assert_eq!(reused[0], bytes[offset as usize]);
    }
}

#[test]
fn offset_switches_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = temp_path(&dir, "a.bin");
    let b = temp_path(&dir, "b.bin");
    std::fs::write(&a, b"aaaaXaaaa").unwrap();
    std::fs::write(&b, b"bbbbbbYbb").unwrap();
    let mut input = Input::new();
    input.open(&format!("{a}:4")).unwrap();
    assert_eq!(input.stream().get().unwrap(), Some(b'X'));
    input.open(&format!("{b}:6")).unwrap();
    assert_eq!(input.stream().get().unwrap(), Some(b'Y'));
    assert_eq!(input.kind(), Some(ResourceKind::OffsetFile));
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[test]
fn classifier_examples() {
    assert_eq!(classify("", Direction::Read), ResourceKind::StandardStream);
    assert_eq!(classify("-", Direction::Write), ResourceKind::StandardStream);
    assert_eq!(classify_wxfilename("|gzip -c"), ResourceKind::Pipe);
    assert_eq!(classify_rxfilename("foo.ark:1234"), ResourceKind::OffsetFile);
    assert_eq!(classify_wxfilename("foo.ark:1234"), ResourceKind::Invalid);
    assert_eq!(classify_rxfilename(" foo"), ResourceKind::Invalid);
}

proptest! {
    #[test]
    fn classifier_is_total(s in "\\PC*") {
        let _ = classify_rxfilename(&s);
        let _ = classify_wxfilename(&s);
    }

    #[test]
    fn classifier_handles_whitespace_only(s in "[ \t\n]{1,5}") {
        prop_assert_eq!(classify_rxfilename(&s), ResourceKind::Invalid);
        prop_assert_eq!(classify_wxfilename(&s), ResourceKind::Invalid);
    }
}
