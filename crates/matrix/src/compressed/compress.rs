use super::{CompressedMatrix, CompressionMethod, DataFormat, GlobalHeader, PerColHeader};
use crate::{Matrix, Real};

pub(crate) fn compress<R: Real>(matrix: &Matrix<R>, method: CompressionMethod) -> CompressedMatrix {
    if matrix.is_empty() {
        return CompressedMatrix::default();
    }
    let header = global_header(matrix, method);
    let (rows, cols) = (header.num_rows, header.num_cols);
    let mut data = Vec::with_capacity(header.format.data_size(rows, cols).unwrap_or(0));
    match header.format {
        DataFormat::OneByteWithColHeaders => {
            let columns: Vec<Vec<f32>> = (0..cols)
                .map(|c| matrix.rows().map(|row| to_f32(row[c])).collect())
                .collect();
            let col_headers: Vec<PerColHeader> =
                columns.iter().map(|col| col_header(&header, col)).collect();
            for h in &col_headers {
                h.put(&mut data);
            }
            for (col, h) in columns.iter().zip(&col_headers) {
                let p = h.to_floats(&header);
                data.extend(col.iter().map(|&v| float_to_char(p, v)));
            }
        }
        DataFormat::TwoByte => {
            for row in matrix.rows() {
                for &v in row {
                    data.extend_from_slice(&float_to_uint16(&header, to_f32(v)).to_le_bytes());
                }
            }
        }
        DataFormat::OneByte => {
            for row in matrix.rows() {
                data.extend(row.iter().map(|&v| float_to_uint8(&header, to_f32(v))));
            }
        }
    }
    CompressedMatrix::from_parts(header, data)
}

fn to_f32<R: Real>(value: R) -> f32 {
    value.to_f64() as f32
}

fn global_header<R: Real>(matrix: &Matrix<R>, method: CompressionMethod) -> GlobalHeader {
    let method = match method {
        CompressionMethod::Automatic if matrix.num_rows() > 8 => CompressionMethod::SpeechFeature,
        CompressionMethod::Automatic => CompressionMethod::TwoByteAuto,
        other => other,
    };
    let format = match method {
        CompressionMethod::SpeechFeature => DataFormat::OneByteWithColHeaders,
        CompressionMethod::TwoByteAuto | CompressionMethod::TwoByteSignedInteger => {
            DataFormat::TwoByte
        }
        _ => DataFormat::OneByte,
    };
    let (min_value, range) = match method {
        CompressionMethod::TwoByteSignedInteger => (-32768.0, 65535.0),
        CompressionMethod::OneByteUnsignedInteger => (0.0, 255.0),
        CompressionMethod::OneByteZeroOne => (0.0, 1.0),
        _ => {
            let min = matrix.min().map_or(0.0, to_f32);
            let mut max = matrix.max().map_or(0.0, to_f32);
            if max == min {
                max = min + (1.0 + min.abs());
            }
            (min, max - min)
        }
    };
    GlobalHeader {
        format,
        min_value,
        range,
        num_rows: matrix.num_rows(),
        num_cols: matrix.num_cols(),
    }
}

fn float_to_uint16(header: &GlobalHeader, value: f32) -> u16 {
    let f = ((value - header.min_value) / header.range).clamp(0.0, 1.0);
    (f * 65535.0 + 0.499) as u16
}

fn float_to_uint8(header: &GlobalHeader, value: f32) -> u8 {
    let f = ((value - header.min_value) / header.range).clamp(0.0, 1.0);
    (f * 255.0 + 0.499) as u8
}

/// Quantizes one value against the column percentiles, inverting
/// [`super::char_to_float`].
fn float_to_char(p: [f32; 4], value: f32) -> u8 {
    let [p0, p25, p75, p100] = p;
    let ans = if value < p25 {
        let f = (value - p0) / (p25 - p0);
        ((f * 64.0 + 0.5) as i32).clamp(0, 64)
    } else if value < p75 {
        let f = (value - p25) / (p75 - p25);
        (64 + (f * 128.0 + 0.5) as i32).clamp(64, 192)
    } else {
        let f = (value - p75) / (p100 - p75);
        (192 + (f * 63.0 + 0.5) as i32).clamp(192, 255)
    };
    ans as u8
}

fn col_header(header: &GlobalHeader, column: &[f32]) -> PerColHeader {
    let mut sorted = column.to_vec();
    sorted.sort_by(f32::total_cmp);
    let n = sorted.len();
    let q = |v: f32| float_to_uint16(header, v);
    // Fewer than five rows: the next sorted values stand in for the
    // quartiles, and missing ones just step past the previous percentile.
    let (i25, i75, i100) = if n >= 5 {
        let quarter = n / 4;
        (quarter, 3 * quarter, n - 1)
    } else {
        (1, 2, 3)
    };
    let p0 = q(sorted[0]).min(65532);
    let p25 = sorted.get(i25).map_or(p0 + 1, |&v| q(v).max(p0 + 1).min(65533));
    let p75 = sorted.get(i75).map_or(p25 + 1, |&v| q(v).max(p25 + 1).min(65534));
    let p100 = sorted.get(i100).map_or(p75 + 1, |&v| q(v).max(p75 + 1));
    PerColHeader {
        percentile_0: p0,
        percentile_25: p25,
        percentile_75: p75,
        percentile_100: p100,
    }
}
