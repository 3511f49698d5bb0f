#![forbid(unsafe_code)]

use std::time::Instant;

use psr_runtime::RuntimeMode;

use crate::combine::process_column;
use crate::matrix::FoldMatrix;
use crate::periods::compute_periods;
use crate::trace::{FoldTrace, PaddingDecision, next_operation_id, record_trace};
use crate::{FfaError, FfaOptions, FfaResult};

/// Outcome of reshaping the sample sequence for folding.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    /// `2^exponent` rows by `period` columns, row-major from the input.
    pub matrix: FoldMatrix,
    /// Power-of-two exponent of the row count; also the number of
    /// combination levels the driver will run.
    pub exponent: u32,
    /// Whether the samples were zero-padded or truncated to fit.
    pub decision: PaddingDecision,
}

/// Reshape 1-D samples into a fold matrix with `period`-length rows.
///
/// The row count is the smallest power of two strictly greater than
/// `samples.len() / period` — strictly, even when the natural row count is
/// already an exact power of two; the padding rule below relies on that
/// conservative rounding. If filling the extra rows would take more zeros
/// than half the real sample count, the zeros would dilute the
/// signal-to-noise ratio too far, so the exponent is decremented and the
/// sample tail is dropped instead.
pub fn reshape_data(samples: &[f64], period: usize) -> FfaResult<Reshaped> {
    if period == 0 {
        return Err(FfaError::ZeroTrialPeriod);
    }
    let n = samples.len();
    let candidate_rows = n / period;
    if candidate_rows < 1 {
        return Err(FfaError::TrialPeriodTooLong {
            period,
            samples: n,
        });
    }

    let mut exponent = candidate_rows.ilog2() + 1;
    let mut rows = 1usize << exponent;
    let num_pad = rows * period - n;

    if num_pad < n / 2 {
        let mut data = samples.to_vec();
        data.resize(rows * period, 0.0);
        let matrix = FoldMatrix::from_flat(data, rows, period)?;
        Ok(Reshaped {
            matrix,
            exponent,
            decision: PaddingDecision::Padded { zeros: num_pad },
        })
    } else {
        exponent -= 1;
        rows /= 2;
        let kept = rows * period;
        let matrix = FoldMatrix::from_flat(samples[..kept].to_vec(), rows, period)?;
        Ok(Reshaped {
            matrix,
            exponent,
            decision: PaddingDecision::Truncated { dropped: n - kept },
        })
    }
}

/// Result of a full FFA search: one period estimate per profile row.
#[derive(Debug, Clone, PartialEq)]
pub struct FfaSearch {
    /// `periods[r]` is the approximate trial period of `profiles` row `r`.
    pub periods: Vec<f64>,
    pub profiles: FoldMatrix,
}

/// Search `samples` for pulses with period between `period` and
/// `period + 1` samples.
///
/// Reshapes once, then runs one combination level per power of two in the
/// row count; every level's output feeds the next, so the passes execute
/// strictly in order. The computation is deterministic: identical inputs
/// produce bit-identical outputs.
pub fn ffa(samples: &[f64], period: usize, options: &FfaOptions) -> FfaResult<FfaSearch> {
    validate_finite(samples, options)?;

    let started = Instant::now();
    let Reshaped {
        mut matrix,
        exponent,
        decision,
    } = reshape_data(samples, period)?;

    for step in 1..=exponent {
        matrix = process_column(&matrix, step)?;
    }

    let periods = compute_periods(&matrix);
    record_trace(FoldTrace {
        operation_id: next_operation_id(),
        n_samples: samples.len(),
        trial_period: period,
        rows: matrix.rows(),
        levels: exponent,
        decision,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(FfaSearch {
        periods,
        profiles: matrix,
    })
}

fn validate_finite(samples: &[f64], options: &FfaOptions) -> FfaResult<()> {
    let should_check = options.check_finite || options.mode == RuntimeMode::Hardened;
    if should_check && samples.iter().any(|value| !value.is_finite()) {
        return Err(FfaError::NonFiniteInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use psr_runtime::RuntimeMode;

    use super::{ffa, reshape_data};
    use crate::trace::PaddingDecision;
    use crate::{FfaError, FfaOptions};

    #[test]
    fn reshape_pads_when_few_zeros_are_needed() {
        // 20 samples, period 3: 6 natural rows, rounded up to 8, 4 zeros.
        let samples: Vec<f64> = (0..20).map(f64::from).collect();
        let reshaped = reshape_data(&samples, 3).expect("valid input");
        assert_eq!(reshaped.exponent, 3);
        assert_eq!(reshaped.matrix.rows(), 8);
        assert_eq!(reshaped.decision, PaddingDecision::Padded { zeros: 4 });
        assert_eq!(&reshaped.matrix.as_slice()[..20], samples.as_slice());
        assert!(reshaped.matrix.as_slice()[20..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn reshape_truncates_when_padding_would_dominate() {
        // 65 samples, period 8: 8 natural rows, rounded up to 16, which
        // would need 63 zeros against 32 allowed; drops to 8 rows instead.
        let samples: Vec<f64> = (0..65).map(f64::from).collect();
        let reshaped = reshape_data(&samples, 8).expect("valid input");
        assert_eq!(reshaped.exponent, 3);
        assert_eq!(reshaped.matrix.rows(), 8);
        assert_eq!(reshaped.decision, PaddingDecision::Truncated { dropped: 1 });
        assert_eq!(&reshaped.matrix.as_slice()[..], &samples[..64]);
    }

    #[test]
    fn reshape_single_whole_period_collapses_to_one_row() {
        // period == sample count: natural row count 1, exponent 1, and the
        // 8 zeros needed are not under half of 8, so truncation wins.
        let samples = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let reshaped = reshape_data(&samples, 8).expect("valid input");
        assert_eq!(reshaped.exponent, 0);
        assert_eq!(reshaped.matrix.rows(), 1);
        assert_eq!(reshaped.matrix.row(0), &samples);
    }

    #[test]
    fn reshape_rejects_zero_period() {
        assert_eq!(
            reshape_data(&[1.0, 2.0], 0).expect_err("period 0"),
            FfaError::ZeroTrialPeriod
        );
    }

    #[test]
    fn reshape_rejects_period_longer_than_samples() {
        assert_eq!(
            reshape_data(&[1.0, 2.0, 3.0], 4).expect_err("period > n"),
            FfaError::TrialPeriodTooLong {
                period: 4,
                samples: 3,
            }
        );
    }

    #[test]
    fn ffa_runs_every_level_and_sizes_outputs_together() {
        let samples: Vec<f64> = (0..40).map(|i| f64::from(i % 5)).collect();
        let search = ffa(&samples, 5, &FfaOptions::default()).expect("valid input");
        assert_eq!(search.periods.len(), search.profiles.rows());
        assert_eq!(search.profiles.period(), 5);
    }

    #[test]
    fn ffa_hardened_rejects_non_finite_samples() {
        let mut samples = vec![1.0; 16];
        samples[3] = f64::NAN;
        let opts = FfaOptions::default().with_mode(RuntimeMode::Hardened);
        assert_eq!(
            ffa(&samples, 4, &opts).expect_err("NaN under hardened mode"),
            FfaError::NonFiniteInput
        );
    }

    #[test]
    fn ffa_strict_lets_non_finite_samples_through() {
        let mut samples = vec![1.0; 16];
        samples[3] = f64::INFINITY;
        let search = ffa(&samples, 4, &FfaOptions::default()).expect("strict mode folds anyway");
        assert!(search.profiles.as_slice().iter().any(|v| v.is_infinite()));
    }
}
