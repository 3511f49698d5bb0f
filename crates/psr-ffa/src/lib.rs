#![forbid(unsafe_code)]

//! Fast Folding Algorithm (FFA) search core.
//!
//! Searches a uniformly sampled time series for pulses with a period between
//! `period` and `period + 1` samples by folding at all intermediate trial
//! periods simultaneously. The reduction is a binary combination tree over
//! cyclically shifted partial sums (Staelin 1969): structurally an FFT
//! butterfly, except the twiddle is an integer phase rotation and the
//! combine operator is plain addition. Total work is O(N log N) against
//! O(N·K) for K independent folds.
//!
//! ## Module layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | `matrix`  | [`FoldMatrix`] flat row-major fold matrix                 |
//! | `combine` | [`shift_and_add`] pair combiner, [`process_column`] level |
//! | `fold`    | [`reshape_data`] reshaper, [`ffa`] driver                 |
//! | `periods` | [`compute_periods`] row-to-period map, [`best_period`]    |
//! | `trace`   | [`FoldTrace`] structured per-run diagnostics              |

pub mod combine;
pub mod fold;
pub mod matrix;
pub mod periods;
pub mod trace;

pub use combine::{process_column, shift_and_add};
pub use fold::{FfaSearch, Reshaped, ffa, reshape_data};
pub use matrix::FoldMatrix;
pub use periods::{BestRow, best_period, compute_periods};
pub use trace::{FoldTrace, PaddingDecision, take_fold_traces};

use psr_runtime::RuntimeMode;
use thiserror::Error;

pub type FfaResult<T> = Result<T, FfaError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FfaError {
    #[error("trial period must be greater than zero")]
    ZeroTrialPeriod,
    #[error("trial period {period} does not fit a single fold of {samples} samples")]
    TrialPeriodTooLong { period: usize, samples: usize },
    #[error("row length mismatch: upper has {upper} columns, lower has {lower}")]
    RowLengthMismatch { upper: usize, lower: usize },
    #[error("fold matrix rows and period must be greater than zero")]
    EmptyShape,
    #[error("matrix data length {actual} does not match rows x period = {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("fold matrix shape product overflows")]
    ShapeOverflow,
    #[error("level index must be at least 1")]
    ZeroLevel,
    #[error("level {level} incompatible with {rows} rows: radix {radix} does not divide the row count")]
    LevelIncompatible {
        level: u32,
        rows: usize,
        radix: usize,
    },
    #[error("periods length {periods} does not match {rows} matrix rows")]
    PeriodCountMismatch { periods: usize, rows: usize },
    #[error("non-finite sample rejected by policy")]
    NonFiniteInput,
}

/// Common options shared by the folding entrypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfaOptions {
    pub mode: RuntimeMode,
    pub check_finite: bool,
}

impl Default for FfaOptions {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Strict,
            check_finite: false,
        }
    }
}

impl FfaOptions {
    #[must_use]
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }
}
