// HTTP wire types for the traffic API

use serde::{Deserialize, Serialize};

use super::{RateResult, RateStatus};

pub const FIRST_SAMPLE_MESSAGE: &str = "first collection; rates available on next request";
pub const DEVICE_ERROR_MESSAGE: &str = "failed to fetch counters from device";

/// Body of GET /api/traffic. Rates are rounded to whole numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficResponse {
    pub in_bits_per_second: u64,
    pub out_bits_per_second: u64,
    pub in_bytes_per_second: u64,
    pub out_bytes_per_second: u64,
    pub error: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl From<&RateResult> for TrafficResponse {
    fn from(r: &RateResult) -> Self {
        let message = match r.status {
            RateStatus::Computed => String::new(),
            RateStatus::FirstSample => FIRST_SAMPLE_MESSAGE.to_string(),
            RateStatus::Error => DEVICE_ERROR_MESSAGE.to_string(),
        };
        Self {
            in_bits_per_second: round_rate(r.ingress_bits_per_sec),
            out_bits_per_second: round_rate(r.egress_bits_per_sec),
            in_bytes_per_second: round_rate(r.ingress_bytes_per_sec),
            out_bytes_per_second: round_rate(r.egress_bytes_per_sec),
            error: r.error.clone(),
            message,
        }
    }
}

/// Nearest integer; rates are never negative, so half-away-from-zero equals half-up.
fn round_rate(v: f64) -> u64 {
    v.round() as u64
}

/// Body of GET /api/interface-name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceNameResponse {
    pub name: String,
}
