#![forbid(unsafe_code)]

use crate::{FfaError, FfaResult};

/// 2-D fold matrix stored flat in row-major order.
///
/// Row `r` holds `period` consecutive phase bins; columns are indexed modulo
/// `period`, so each row is conceptually a ring buffer. The row count is a
/// power of two for every matrix produced by the reshaper and it never
/// changes across reduction levels, only the contents do.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldMatrix {
    data: Vec<f64>,
    rows: usize,
    period: usize,
}

impl FoldMatrix {
    /// Build a matrix from row-major flat data, validating the shape.
    pub fn from_flat(data: Vec<f64>, rows: usize, period: usize) -> FfaResult<Self> {
        if rows == 0 || period == 0 {
            return Err(FfaError::EmptyShape);
        }
        let expected = rows
            .checked_mul(period)
            .ok_or(FfaError::ShapeOverflow)?;
        if data.len() != expected {
            return Err(FfaError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, period })
    }

    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, period: usize) -> FfaResult<Self> {
        if rows == 0 || period == 0 {
            return Err(FfaError::EmptyShape);
        }
        let len = rows.checked_mul(period).ok_or(FfaError::ShapeOverflow)?;
        Ok(Self {
            data: vec![0.0; len],
            rows,
            period,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Borrow row `r`. Callers index within `0..rows`.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.period..(r + 1) * self.period]
    }

    /// Overwrite row `r` with `values`; lengths are the caller's contract.
    pub(crate) fn set_row(&mut self, r: usize, values: &[f64]) {
        self.data[r * self.period..(r + 1) * self.period].copy_from_slice(values);
    }

    /// Row-major flat view of the whole matrix.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
