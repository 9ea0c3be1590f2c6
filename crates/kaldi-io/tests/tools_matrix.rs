use kaldi_io::summary::{summarize_matrix, summarize_wave, unwrap_blob, MatrixKind};
use kaldi_io::{write_kaldi_object, Blob, Matrix, WaveData};

// ---------------------------------------------------------------------------
// matrix-info
// ---------------------------------------------------------------------------

#[test]
fn matrix_summary_through_pipe() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.bin");
    let path = path.to_str().unwrap();
    let m: Matrix<f32> = Matrix::new(7, 5);
    write_kaldi_object(&m, path, true).unwrap();

    let summary = summarize_matrix(&format!("cat {path} |")).unwrap();
    assert_eq!((summary.rows, summary.cols), (7, 5));
    assert_eq!(summary.kind, MatrixKind::Float);
}

#[test]
fn matrix_summary_at_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.ark");
    let m: Matrix<f32> = Matrix::new(2, 3);
    let mut bytes = b"utt1 ".to_vec();
    bytes.extend_from_slice(b"\0B");
    m.write(&mut bytes, true).unwrap();
    std::fs::write(&path, &bytes).unwrap();

    let summary = summarize_matrix(&format!("{}:5", path.display())).unwrap();
    assert_eq!((summary.rows, summary.cols), (2, 3));
}

#[test]
fn matrix_summary_missing_file() {
    assert!(summarize_matrix("/nonexistent/dir/m.bin").is_err());
}

// ---------------------------------------------------------------------------
// wav-info
// ---------------------------------------------------------------------------

#[test]
fn wave_summary_reports_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.wav");
    let samples = Matrix::from_rows(&[vec![0.0f32; 1600], vec![100.0f32; 1600]]).unwrap();
    let wave = WaveData::new(16000.0, samples);
    let mut file = std::fs::File::create(&path).unwrap();
    wave.write(&mut file).unwrap();
    drop(file);

    let info = summarize_wave(path.to_str().unwrap()).unwrap();
    assert_eq!(info.num_channels(), 2);
    assert_eq!(info.samp_freq(), 16000.0);
    assert_eq!(info.samp_count(), Some(1600));
    assert!((info.duration().unwrap() - 0.1).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// copy-blob
// ---------------------------------------------------------------------------

#[test]
fn blob_unwrap_with_range() {
    let dir = tempfile::tempdir().unwrap();
    let wrapped = dir.path().join("b.blob");
    let raw = dir.path().join("b.raw");
    let blob = Blob::new(b"0123456789".to_vec());
    write_kaldi_object(&blob, wrapped.to_str().unwrap(), true).unwrap();

    let n = unwrap_blob(
        &format!("{}[2:5]", wrapped.display()),
        raw.to_str().unwrap(),
    )
    .unwrap();
    assert_eq!(n, 4);
    assert_eq!(std::fs::read(&raw).unwrap(), b"2345");
}
