#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use psr_ffa::{FfaOptions, best_period, ffa};
use psr_runtime::RuntimeMode;

#[derive(Debug, Arbitrary)]
struct PipelineInput {
    samples: Vec<f64>,
    period: u8,
    hardened: bool,
}

fuzz_target!(|input: PipelineInput| {
    let samples: Vec<f64> = input.samples.iter().copied().take(2048).collect();
    let mode = if input.hardened {
        RuntimeMode::Hardened
    } else {
        RuntimeMode::Strict
    };
    let opts = FfaOptions::default().with_mode(mode);

    let Ok(search) = ffa(&samples, usize::from(input.period), &opts) else {
        return;
    };

    if search.periods.len() != search.profiles.rows() {
        panic!("one period estimate per profile row");
    }
    if !search.profiles.rows().is_power_of_two() {
        panic!("row count must stay a power of two");
    }
    let best = best_period(&search.periods, &search.profiles)
        .expect("driver outputs always agree in length");
    if best.row >= search.profiles.rows() {
        panic!("best row out of range");
    }
});
