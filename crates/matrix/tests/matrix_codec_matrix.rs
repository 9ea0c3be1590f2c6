//! Codec scenarios across precisions, modes and the compressed format.

use kaldi_io_matrix::{
    extract_range_specifier, CompressedMatrix, CompressionMethod, Matrix, MatrixError,
    MatrixShape, Vector,
};
use kaldi_io_wire::{init_input_stream, init_output_stream, InputStream};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Matrix<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut m = Matrix::new(rows, cols);
    for r in 0..m.num_rows() {
        for v in m.row_mut(r) {
            *v = rng.gen_range(-10.0f32..10.0);
        }
    }
    m
}

// ---------------------------------------------------------------------------
// Dense matrices
// ---------------------------------------------------------------------------

#[test]
fn dense_round_trip_both_modes() {
    let m = random_matrix(7, 13, 1);
    for binary in [true, false] {
        let mut buf = Vec::new();
        init_output_stream(&mut buf, binary).unwrap();
        m.write(&mut buf, binary).unwrap();
        let mut is = InputStream::from_bytes(buf);
        assert_eq!(init_input_stream(&mut is).unwrap(), binary);
        let mut back = Matrix::<f32>::default();
        back.read(&mut is, binary).unwrap();
        assert_eq!(back, m, "binary={binary}");
        assert!(is.at_eof().unwrap());
    }
}

#[test]
fn single_written_double_read() {
    let m = random_matrix(3, 4, 2);
    let mut buf = Vec::new();
    m.write(&mut buf, true).unwrap();
    let mut back = Matrix::<f64>::default();
    back.read(&mut InputStream::from_bytes(buf), true).unwrap();
    for r in 0..3 {
        for c in 0..4 {
            assert_eq!(back.get(r, c), f64::from(m.get(r, c)));
        }
    }
}

#[test]
fn double_written_single_read_rounds_to_nearest() {
    let m = Matrix::<f64>::from_rows(&[vec![1.0 / 3.0, 2.0f64.sqrt()]]).unwrap();
    let mut buf = Vec::new();
    m.write(&mut buf, true).unwrap();
    let mut back = Matrix::<f32>::default();
    back.read(&mut InputStream::from_bytes(buf), true).unwrap();
    assert_eq!(back.row(0), &[(1.0f64 / 3.0) as f32, 2.0f64.sqrt() as f32]);
}

#[test]
fn compressed_payload_decodes_into_dense_matrix() {
    let m = random_matrix(20, 4, 3);
    let mut buf = Vec::new();
    CompressedMatrix::new(&m, CompressionMethod::Automatic)
        .write(&mut buf, true)
        .unwrap();
    let mut back = Matrix::<f64>::default();
    back.read(&mut InputStream::from_bytes(buf), true).unwrap();
    assert_eq!((back.num_rows(), back.num_cols()), (20, 4));
    for r in 0..20 {
        for c in 0..4 {
            assert!((back.get(r, c) - f64::from(m.get(r, c))).abs() < 0.5);
        }
    }
}

#[test]
fn empty_matrix_round_trip() {
    for binary in [true, false] {
        let mut buf = Vec::new();
        Matrix::<f32>::default().write(&mut buf, binary).unwrap();
        let mut back = random_matrix(2, 2, 4);
        back.read(&mut InputStream::from_bytes(buf), binary).unwrap();
        assert!(back.is_empty());
    }
}

#[test]
fn text_matrix_with_non_finite_values() {
    let mut m = Matrix::<f64>::default();
    m.read(&mut InputStream::from_bytes(&b" [\n  1 nan \n  -inf 2 ]\n"[..]), false)
        .unwrap();
    assert!(m.get(0, 1).is_nan());
    assert_eq!(m.get(1, 0), f64::NEG_INFINITY);
}

#[test]
fn ragged_text_matrix_is_rejected() {
    let mut m = Matrix::<f32>::default();
    let err = m
        .read(&mut InputStream::from_bytes(&b"[ 1 2 3\n 4 5 ]"[..]), false)
        .unwrap_err();
    assert!(matches!(
        err,
        MatrixError::InconsistentCols {
            row: 1,
            found: 2,
            expected: 3
        }
    ));
}

// ---------------------------------------------------------------------------
// Vectors
// ---------------------------------------------------------------------------

#[test]
fn vector_round_trip_both_modes() {
    let v: Vector<f64> = (0..17).map(|i| f64::from(i) * 0.1 - 0.7).collect();
    for binary in [true, false] {
        let mut buf = Vec::new();
        v.write(&mut buf, binary).unwrap();
        let mut back = Vector::<f64>::default();
        back.read(&mut InputStream::from_bytes(buf), binary).unwrap();
        assert_eq!(back, v);
    }
}

#[test]
fn vector_text_refuses_matrix_input() {
    let mut buf = Vec::new();
    random_matrix(2, 2, 5).write(&mut buf, false).unwrap();
    let mut v = Vector::<f32>::default();
    assert!(matches!(
        v.read(&mut InputStream::from_bytes(buf), false),
        Err(MatrixError::NewlineInVector)
    ));
}

// ---------------------------------------------------------------------------
// Shapes and ranges
// ---------------------------------------------------------------------------

#[test]
fn shape_of_each_encoding() {
    let m = random_matrix(9, 3, 6);
    let mut buf = Vec::new();
    m.write(&mut buf, true).unwrap();
    Matrix::<f64>::from_matrix(&m).write(&mut buf, true).unwrap();
    CompressedMatrix::new(&m, CompressionMethod::OneByteAuto)
        .write(&mut buf, true)
        .unwrap();
    let mut is = InputStream::from_bytes(buf);
    for _ in 0..3 {
        let shape = MatrixShape::read(&mut is, true).unwrap();
        assert_eq!((shape.num_rows, shape.num_cols), (9, 3));
    }
    assert!(is.at_eof().unwrap());
}

#[test]
fn range_extraction_with_tolerance() {
    let v: Vector<f32> = (0..10).map(|i| i as f32).collect();
    let r = v.extract_range("2:5").unwrap();
    assert_eq!(&r[..], &v[2..=5]);
    assert_eq!(v.extract_range("6:12").unwrap().dim(), 4);
    assert!(v.extract_range("6:13").is_err());

    let m = random_matrix(10, 4, 7);
    let sub = m.extract_range("8:11,1:2").unwrap();
    assert_eq!(sub, m.range(8, 2, 1, 2));
    assert!(m.extract_range("0:1,0:4").is_err());

    let (path, spec) = extract_range_specifier("feats.ark:1234[8:11,1:2]").unwrap();
    assert_eq!(path, "feats.ark:1234");
    assert_eq!(spec, Some("8:11,1:2"));
}

// ---------------------------------------------------------------------------
// Corrupt dimension headers
// ---------------------------------------------------------------------------

/// A binary token followed by `i32` dimensions and no payload.
fn bare_header(token: &str, dims: &[i32]) -> Vec<u8> {
    let mut buf = format!("{token} ").into_bytes();
    for dim in dims {
        buf.push(4);
        buf.extend_from_slice(&dim.to_le_bytes());
    }
    buf
}

#[test]
fn huge_dimensions_fail_without_allocating() {
    let mut m = Matrix::<f64>::default();
    let err = m
        .read(&mut InputStream::from_bytes(bare_header("DM", &[i32::MAX, i32::MAX])), true)
        .unwrap_err();
    assert!(matches!(err, MatrixError::TooLarge { .. }));
    assert!(m.is_empty());

    let mut m = Matrix::<f32>::default();
    let err = m
        .read(&mut InputStream::from_bytes(bare_header("FM", &[i32::MAX, 65536])), true)
        .unwrap_err();
    assert!(matches!(err, MatrixError::Eof(_)));
    assert!(m.is_empty());

    let mut v = Vector::<f32>::default();
    let header = bare_header("FV", &[i32::MAX]);
    assert!(v.read(&mut InputStream::from_bytes(header), true).is_err());
    assert_eq!(v.dim(), 0);

    let header = bare_header("DM", &[i32::MAX, i32::MAX]);
    assert!(matches!(
        MatrixShape::read(&mut InputStream::from_bytes(header), true),
        Err(MatrixError::TooLarge { .. })
    ));
}

#[test]
fn huge_compressed_header_fails() {
    let mut buf = b"CM ".to_vec();
    buf.extend_from_slice(&0f32.to_le_bytes());
    buf.extend_from_slice(&1f32.to_le_bytes());
    buf.extend_from_slice(&i32::MAX.to_le_bytes());
    buf.extend_from_slice(&i32::MAX.to_le_bytes());
    let mut cm = CompressedMatrix::default();
    assert!(cm.read(&mut InputStream::from_bytes(buf.clone()), true).is_err());
    assert_eq!(cm.num_rows(), 0);
    let mut m = Matrix::<f32>::default();
    assert!(m.read(&mut InputStream::from_bytes(buf), true).is_err());
}

proptest! {
    #[test]
    fn binary_matrix_round_trip_is_exact(
        rows in 0usize..6,
        cols in 0usize..9,
        seed in any::<u64>(),
    ) {
        let m = random_matrix(rows, cols, seed);
        let mut buf = Vec::new();
        m.write(&mut buf, true).unwrap();
        let mut back = Matrix::<f32>::default();
        back.read(&mut InputStream::from_bytes(buf), true).unwrap();
        prop_assert_eq!(back, m);
    }

    #[test]
    fn compressed_error_is_bounded(rows in 1usize..20, cols in 1usize..5, seed in any::<u64>()) {
        let m = random_matrix(rows, cols, seed);
        let back: Matrix<f32> =
            CompressedMatrix::new(&m, CompressionMethod::TwoByteAuto).to_matrix();
        for r in 0..rows {
            for c in 0..cols {
                prop_assert!((back.get(r, c) - m.get(r, c)).abs() <= 20.0 / 65535.0 + 1e-4);
            }
        }
    }
}
