#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use psr_ffa::shift_and_add;

#[derive(Debug, Arbitrary)]
struct ShiftAndAddInput {
    upper: Vec<f64>,
    lower: Vec<f64>,
    shift: u16,
}

fuzz_target!(|input: ShiftAndAddInput| {
    let upper: Vec<f64> = input.upper.iter().copied().take(64).collect();
    let lower: Vec<f64> = input.lower.iter().copied().take(64).collect();
    let shift = usize::from(input.shift);

    let result = shift_and_add(&upper, &lower, shift);
    if upper.len() != lower.len() || upper.is_empty() {
        if result.is_ok() {
            panic!("mismatched or empty rows must be rejected");
        }
        return;
    }

    let (new_upper, new_lower) = result.expect("equal non-empty rows must combine");
    if new_upper.len() != upper.len() || new_lower.len() != upper.len() {
        panic!("output rows must keep the input length");
    }

    // Whole turns of the ring are no shift at all.
    let wrapped = shift_and_add(&upper, &lower, shift + upper.len())
        .expect("equal non-empty rows must combine");
    let same = new_upper
        .iter()
        .zip(wrapped.0.iter())
        .chain(new_lower.iter().zip(wrapped.1.iter()))
        .all(|(a, b)| a.to_bits() == b.to_bits());
    if !same {
        panic!("shift periodicity violation");
    }
});
