// Counter deltas and rates between two samples

use crate::models::{CounterSample, RateResult};

/// Bytes counted between `previous` and `current` on one channel.
///
/// A current value below the previous one is read as exactly one wrap past
/// `u64::MAX`. Two or more wraps between polls cannot be told apart from one,
/// so the poll interval has to stay well below the time a 64-bit counter
/// takes to overflow at line rate.
pub fn counter_delta(previous: u64, current: u64) -> u64 {
    let delta = i128::from(current) - i128::from(previous);
    if delta < 0 {
        // previous > current, so this cannot overflow
        (u64::MAX - previous) + current
    } else {
        delta as u64
    }
}

/// Elapsed seconds from `previous` to `current`; `None` when not strictly positive.
pub fn elapsed_secs(previous: &CounterSample, current: &CounterSample) -> Option<f64> {
    let elapsed_ms = i128::from(current.observed_at_ms) - i128::from(previous.observed_at_ms);
    (elapsed_ms > 0).then(|| elapsed_ms as f64 / 1000.0)
}

/// Pure rate computation. Storing `current` for the next call is up to the caller.
pub fn compute_rate(current: &CounterSample, previous: Option<&CounterSample>) -> RateResult {
    let Some(previous) = previous else {
        return RateResult::first_sample();
    };
    let Some(secs) = elapsed_secs(previous, current) else {
        return RateResult::first_sample();
    };

    let ingress = counter_delta(previous.ingress_bytes, current.ingress_bytes);
    let egress = counter_delta(previous.egress_bytes, current.egress_bytes);

    RateResult::computed(ingress as f64 / secs, egress as f64 / secs)
}
