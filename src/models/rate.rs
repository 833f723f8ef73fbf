// Rate computation result

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateStatus {
    /// Rates derived from two samples.
    Computed,
    /// No usable baseline yet (first call, or non-positive elapsed time).
    FirstSample,
    /// The device could not be queried; no numbers were computed.
    Error,
}

/// Throughput derived from two counter samples. Rates are unrounded; rounding
/// happens when the result is turned into a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResult {
    pub status: RateStatus,
    pub ingress_bits_per_sec: f64,
    pub egress_bits_per_sec: f64,
    pub ingress_bytes_per_sec: f64,
    pub egress_bytes_per_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RateResult {
    pub fn computed(ingress_bytes_per_sec: f64, egress_bytes_per_sec: f64) -> Self {
        Self {
            status: RateStatus::Computed,
            ingress_bits_per_sec: ingress_bytes_per_sec * 8.0,
            egress_bits_per_sec: egress_bytes_per_sec * 8.0,
            ingress_bytes_per_sec,
            egress_bytes_per_sec,
            error: None,
        }
    }

    pub fn first_sample() -> Self {
        Self::zeroed(RateStatus::FirstSample, None)
    }

    /// Error result carrying the transport message unchanged.
    pub fn error(message: impl Into<String>) -> Self {
        Self::zeroed(RateStatus::Error, Some(message.into()))
    }

    fn zeroed(status: RateStatus, error: Option<String>) -> Self {
        Self {
            status,
            ingress_bits_per_sec: 0.0,
            egress_bits_per_sec: 0.0,
            ingress_bytes_per_sec: 0.0,
            egress_bytes_per_sec: 0.0,
            error,
        }
    }
}
