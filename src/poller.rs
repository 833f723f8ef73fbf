// Request-driven polling of one interface: fetch counters, then compute the rate.

use crate::device_repo::CounterSource;
use crate::models::{CounterSample, RateResult};
use crate::rate::RateTracker;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// Reported when the device cannot describe the interface.
pub const UNKNOWN_INTERFACE_NAME: &str = "Unknown";

/// One tracked interface. The tracker lock is held across the device round-trip,
/// so at most one poll is in flight and samples reach the tracker in the order
/// they were taken.
pub struct TrafficPoller {
    source: Arc<dyn CounterSource>,
    tracker: Mutex<RateTracker>,
}

impl TrafficPoller {
    pub fn new(source: Arc<dyn CounterSource>) -> Self {
        Self {
            source,
            tracker: Mutex::new(RateTracker::new()),
        }
    }

    #[instrument(skip(self), fields(operation = "poll_traffic"))]
    pub async fn poll(&self) -> RateResult {
        let mut tracker = self.tracker.lock().await;
        let sample = match self.source.fetch_counters().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = "fetch_counters",
                    "failed to read interface counters"
                );
                return RateResult::error(e.to_string());
            }
        };
        let result = tracker.observe(sample);
        tracing::debug!(
            status = ?result.status,
            in_bps = result.ingress_bits_per_sec,
            out_bps = result.egress_bits_per_sec,
            "traffic rate"
        );
        result
    }

    pub async fn interface_name(&self) -> String {
        match self.source.fetch_interface_name().await {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => UNKNOWN_INTERFACE_NAME.to_string(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "fetch_interface_name",
                    "interface name lookup failed"
                );
                UNKNOWN_INTERFACE_NAME.to_string()
            }
        }
    }

    /// Sample the next poll will be measured against.
    pub async fn baseline(&self) -> Option<CounterSample> {
        self.tracker.lock().await.previous()
    }
}
