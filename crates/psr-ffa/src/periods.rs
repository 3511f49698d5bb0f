#![forbid(unsafe_code)]

use crate::matrix::FoldMatrix;
use crate::{FfaError, FfaResult};

/// Approximate trial period for each row of the fully folded matrix.
///
/// `periods[r] = P + (P + 1) * r / (rows * P)`: a first-order linear
/// approximation of the period implied by row `r`'s cumulative phase drift.
/// The estimate can be off by one time sample; treat it as a candidate, not
/// an exact value.
#[must_use]
pub fn compute_periods(a: &FoldMatrix) -> Vec<f64> {
    let rows = a.rows();
    let period = a.period();
    (0..rows)
        .map(|row| {
            period as f64 + (period as f64 + 1.0) * row as f64 / (rows as f64 * period as f64)
        })
        .collect()
}

/// Row holding the globally strongest phase bin, with its summed profile.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRow<'a> {
    pub row: usize,
    pub profile: &'a [f64],
}

/// Locate the row whose profile contains the single largest cell.
///
/// Returns the row index, not a period value: callers map the index through
/// the slice from [`compute_periods`] themselves. The maximum is found over
/// the flattened matrix; ties resolve to the earliest flat position.
pub fn best_period<'a>(periods: &[f64], pulses: &'a FoldMatrix) -> FfaResult<BestRow<'a>> {
    if periods.len() != pulses.rows() {
        return Err(FfaError::PeriodCountMismatch {
            periods: periods.len(),
            rows: pulses.rows(),
        });
    }

    let mut flat_max = 0usize;
    let mut value_max = f64::NEG_INFINITY;
    for (idx, &value) in pulses.as_slice().iter().enumerate() {
        if value > value_max {
            value_max = value;
            flat_max = idx;
        }
    }

    let row = flat_max / pulses.period();
    Ok(BestRow {
        row,
        profile: pulses.row(row),
    })
}
