// Domain and wire models

mod rate;
mod sample;
mod traffic;

pub use rate::{RateResult, RateStatus};
pub use sample::{CounterSample, now_millis};
pub use traffic::{
    DEVICE_ERROR_MESSAGE, FIRST_SAMPLE_MESSAGE, InterfaceNameResponse, TrafficResponse,
};
