#![forbid(unsafe_code)]

use crate::matrix::FoldMatrix;
use crate::{FfaError, FfaResult};

/// Combine a register pair with and without one extra unit of phase shift.
///
/// The inner primitive of the FFA. `new_upper[j] = upper[j] + lower[(j + shift) % p]`
/// aligns `lower` to `upper` at relative phase `shift` and sums; `new_lower`
/// uses `shift + 1`, so a single call produces the fold estimates for two
/// adjacent, closely spaced trial periods without recomputing either from
/// scratch.
///
/// The shift is normalized modulo the row length, so `shift` and
/// `shift + k*p` are interchangeable. Mismatched row lengths are rejected,
/// never broadcast.
pub fn shift_and_add(
    upper: &[f64],
    lower: &[f64],
    shift: usize,
) -> FfaResult<(Vec<f64>, Vec<f64>)> {
    if upper.len() != lower.len() {
        return Err(FfaError::RowLengthMismatch {
            upper: upper.len(),
            lower: lower.len(),
        });
    }
    let period = upper.len();
    if period == 0 {
        return Err(FfaError::EmptyShape);
    }
    // Shifting by more than the row length is no extra shift at all.
    let shift = shift % period;

    let mut new_upper = Vec::with_capacity(period);
    let mut new_lower = Vec::with_capacity(period);
    for (j, &u) in upper.iter().enumerate() {
        new_upper.push(u + lower[(j + shift) % period]);
        new_lower.push(u + lower[(j + shift + 1) % period]);
    }
    Ok((new_upper, new_lower))
}

/// Apply the pair combiner across one column of the Staelin diagram.
///
/// Level `step` partitions the rows into consecutive blocks of
/// `radix = 2^step`. Within a block, row `i` of the first half pairs with
/// row `i + radix/2`, and the pair is combined at relative shift
/// `i mod radix`. Blocks never interact; the output matrix has the same
/// shape as the input.
pub fn process_column(a: &FoldMatrix, step: u32) -> FfaResult<FoldMatrix> {
    if step == 0 {
        return Err(FfaError::ZeroLevel);
    }
    let rows = a.rows();
    let radix = 1usize.checked_shl(step).unwrap_or(0);
    if radix == 0 || rows % radix != 0 {
        return Err(FfaError::LevelIncompatible {
            level: step,
            rows,
            radix,
        });
    }
    let half = radix / 2;

    let mut next = FoldMatrix::zeros(rows, a.period())?;
    for block_start in (0..rows).step_by(radix) {
        for pair_upper in block_start..block_start + half {
            let pair_lower = pair_upper + half;
            let offset = pair_upper % radix;
            let (new_upper, new_lower) =
                shift_and_add(a.row(pair_upper), a.row(pair_lower), offset)?;
            next.set_row(pair_upper, &new_upper);
            next.set_row(pair_lower, &new_lower);
        }
    }
    Ok(next)
}
