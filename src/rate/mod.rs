// Stateful rate tracking for one interface

mod calculator;
mod store;

pub use calculator::{compute_rate, counter_delta, elapsed_secs};
pub use store::SampleStore;

use crate::models::{CounterSample, RateResult};

/// Owns the previous sample of one tracked interface and turns each new
/// sample into a rate. Not synchronized: callers that share a tracker must
/// serialize `observe` (see `poller::TrafficPoller`).
#[derive(Debug, Default)]
pub struct RateTracker {
    store: SampleStore,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the rate against the stored sample, then stores `current`.
    /// The store is overwritten even when the clock went backwards, so a
    /// regressed interval is never counted twice.
    pub fn observe(&mut self, current: CounterSample) -> RateResult {
        let previous = self.store.read();
        if let Some(prev) = &previous {
            if elapsed_secs(prev, &current).is_none() {
                tracing::warn!(
                    previous_ms = prev.observed_at_ms,
                    current_ms = current.observed_at_ms,
                    "non-positive interval between samples; treating as first sample"
                );
            } else if current.ingress_bytes < prev.ingress_bytes
                || current.egress_bytes < prev.egress_bytes
            {
                tracing::debug!(
                    prev_in = prev.ingress_bytes,
                    cur_in = current.ingress_bytes,
                    prev_out = prev.egress_bytes,
                    cur_out = current.egress_bytes,
                    "counter wraparound"
                );
            }
        }
        let result = compute_rate(&current, previous.as_ref());
        self.store.write(current);
        result
    }

    pub fn previous(&self) -> Option<CounterSample> {
        self.store.read()
    }

    pub fn is_initialized(&self) -> bool {
        self.store.read().is_some()
    }
}
