#![forbid(unsafe_code)]

//! Structured per-run diagnostics for the folding driver.
//!
//! Replaces ad-hoc diagnostic printing with trace records a caller can
//! drain and inspect; nothing here affects the numeric results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use psr_runtime::RuntimeMode;

/// How the reshaper made the sample count fit a power-of-two row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDecision {
    /// Appended `zeros` zero samples to fill the last rows.
    Padded { zeros: usize },
    /// Dropped `dropped` trailing samples and halved the row count, because
    /// padding would have injected too much zero energy.
    Truncated { dropped: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldTrace {
    pub operation_id: String,
    pub n_samples: usize,
    pub trial_period: usize,
    pub rows: usize,
    pub levels: u32,
    pub decision: PaddingDecision,
    pub mode: RuntimeMode,
    pub timing_ns: u128,
}

impl FoldTrace {
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let (decision, sample_delta) = match self.decision {
            PaddingDecision::Padded { zeros } => ("padded", zeros),
            PaddingDecision::Truncated { dropped } => ("truncated", dropped),
        };
        format!(
            "{{\"operation_id\":\"{}\",\"n_samples\":{},\"trial_period\":{},\"rows\":{},\"levels\":{},\"decision\":\"{}\",\"sample_delta\":{},\"mode\":\"{}\",\"timing_ns\":{}}}",
            self.operation_id,
            self.n_samples,
            self.trial_period,
            self.rows,
            self.levels,
            decision,
            sample_delta,
            runtime_mode_name(self.mode),
            self.timing_ns,
        )
    }
}

static TRACE_LOG: OnceLock<Mutex<Vec<FoldTrace>>> = OnceLock::new();
static OPERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

fn trace_log() -> &'static Mutex<Vec<FoldTrace>> {
    TRACE_LOG.get_or_init(|| Mutex::new(Vec::new()))
}

pub(crate) fn next_operation_id() -> String {
    let next = OPERATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("ffa-op-{next:016x}")
}

pub(crate) fn record_trace(trace: FoldTrace) {
    if let Ok(mut log) = trace_log().lock() {
        log.push(trace);
    }
}

/// Drain all accumulated fold traces.
#[must_use]
pub fn take_fold_traces() -> Vec<FoldTrace> {
    if let Ok(mut log) = trace_log().lock() {
        let mut out = Vec::with_capacity(log.len());
        std::mem::swap(&mut *log, &mut out);
        return out;
    }
    Vec::new()
}

fn runtime_mode_name(mode: RuntimeMode) -> &'static str {
    match mode {
        RuntimeMode::Strict => "Strict",
        RuntimeMode::Hardened => "Hardened",
    }
}
