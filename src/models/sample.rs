// Raw counter sample as read from the device

use serde::{Deserialize, Serialize};

/// One point-in-time reading of both byte counters of a single interface.
///
/// Values are raw device counters and may wrap from `u64::MAX` back to 0
/// between observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSample {
    pub ingress_bytes: u64,
    pub egress_bytes: u64,
    /// Wall-clock milliseconds since the Unix epoch.
    pub observed_at_ms: u64,
}

impl CounterSample {
    pub fn new(ingress_bytes: u64, egress_bytes: u64, observed_at_ms: u64) -> Self {
        Self {
            ingress_bytes,
            egress_bytes,
            observed_at_ms,
        }
    }

    /// Builds a sample stamped with the current wall clock.
    pub fn now(ingress_bytes: u64, egress_bytes: u64) -> Self {
        Self::new(ingress_bytes, egress_bytes, now_millis())
    }
}

/// Current wall-clock time in ms since the epoch; 0 if the clock is before 1970.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
