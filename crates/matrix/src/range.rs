//! Range specifiers: `path[spec]` selects part of a vector (`start:end`)
//! or a matrix (`rowspec,colspec`). Bounds are inclusive and either may be
//! omitted.

use kaldi_io_util::convert_string_to_integer;

use crate::{CompressedMatrix, Matrix, MatrixError, Real, Vector};

/// How far past the last row (or element) a range may end; it is clamped
/// instead of rejected. Segment boundaries computed upstream from times
/// rounded to two decimals routinely overshoot by this much.
pub const LENGTH_TOLERANCE: usize = 3;

/// A resolved `start:end` selection, clamped to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRange {
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixRange {
    pub row_offset: usize,
    pub num_rows: usize,
    pub col_offset: usize,
    pub num_cols: usize,
}

/// Splits `"path[spec]"` into `("path", Some("spec"))`. Descriptors without
/// a trailing `]` come back whole.
pub fn extract_range_specifier(rxfilename: &str) -> Result<(&str, Option<&str>), MatrixError> {
    let Some(body) = rxfilename.strip_suffix(']') else {
        return Ok((rxfilename, None));
    };
    let mut parts = body.split('[');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(path), Some(spec), None) if !path.is_empty() && !spec.is_empty() => {
            Ok((path, Some(spec)))
        }
        _ => Err(MatrixError::InvalidRange(rxfilename.to_string())),
    }
}

/// `start:end` with optional bounds; `:` alone selects everything.
fn parse_bounds(spec: &str, dim: usize) -> Option<(i64, i64)> {
    let (start, end) = spec.split_once(':')?;
    let bound = |s: &str, default: i64| {
        if s.is_empty() {
            Some(default)
        } else {
            convert_string_to_integer::<i64>(s)
        }
    };
    Some((bound(start, 0)?, bound(end, dim as i64 - 1)?))
}

/// Validates `start..=end` against `dim`, clamping `end` by up to
/// `tolerance` elements.
fn resolve(
    spec: &str,
    bounds: (i64, i64),
    dim: usize,
    tolerance: usize,
    what: &str,
) -> Result<VectorRange, MatrixError> {
    let (start, end) = bounds;
    let dim = dim as i64;
    if start < 0 || start > end || end >= dim + tolerance as i64 {
        return Err(MatrixError::InvalidRange(format!("{spec} for {what} of size {dim}")));
    }
    if end >= dim {
        log::warn!("Range {start}:{end} goes beyond the {what} size {dim}");
    }
    let len = end.min(dim - 1) - start + 1;
    if len <= 0 {
        return Err(MatrixError::InvalidRange(format!("{spec} for {what} of size {dim}")));
    }
    Ok(VectorRange {
        offset: start as usize,
        len: len as usize,
    })
}

pub fn parse_vector_range(spec: &str, dim: usize) -> Result<VectorRange, MatrixError> {
    let invalid = || MatrixError::InvalidRange(spec.to_string());
    if spec.is_empty() || spec.contains(',') {
        return Err(invalid());
    }
    let bounds = parse_bounds(spec, dim).ok_or_else(invalid)?;
    resolve(spec, bounds, dim, LENGTH_TOLERANCE, "vector")
}

/// Parses `rows` or `rows,cols`. Only the row range gets the length
/// tolerance; a column range must lie inside the matrix.
pub fn parse_matrix_range(
    spec: &str,
    rows: usize,
    cols: usize,
) -> Result<MatrixRange, MatrixError> {
    let invalid = || MatrixError::InvalidRange(spec.to_string());
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }
    let row_bounds = parse_bounds(parts[0], rows).ok_or_else(invalid)?;
    let col_bounds = match parts.get(1) {
        Some(p) => parse_bounds(p, cols).ok_or_else(invalid)?,
        None => (0, cols as i64 - 1),
    };
    let r = resolve(spec, row_bounds, rows, LENGTH_TOLERANCE, "matrix rows")?;
    let c = resolve(spec, col_bounds, cols, 0, "matrix cols")?;
    Ok(MatrixRange {
        row_offset: r.offset,
        num_rows: r.len,
        col_offset: c.offset,
        num_cols: c.len,
    })
}

impl<R: Real> Vector<R> {
    /// The sub-vector selected by a `start:end` specifier.
    pub fn extract_range(&self, spec: &str) -> Result<Self, MatrixError> {
        let r = parse_vector_range(spec, self.dim())?;
        Ok(self.range(r.offset, r.len))
    }
}

impl<R: Real> Matrix<R> {
    /// The block selected by a `rows[,cols]` specifier.
    pub fn extract_range(&self, spec: &str) -> Result<Self, MatrixError> {
        let r = parse_matrix_range(spec, self.num_rows(), self.num_cols())?;
        Ok(self.range(r.row_offset, r.num_rows, r.col_offset, r.num_cols))
    }
}

impl CompressedMatrix {
    pub fn extract_range(&self, spec: &str) -> Result<Self, MatrixError> {
        let r = parse_matrix_range(spec, self.num_rows(), self.num_cols())?;
        Ok(self.range(r.row_offset, r.num_rows, r.col_offset, r.num_cols))
    }
}
