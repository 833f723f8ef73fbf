// Shared test helpers

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use trafficmon::device_repo::CounterSource;
use trafficmon::models::CounterSample;
use trafficmon::snmp::TransportError;

/// Counter source that replays a fixed script. An exhausted script behaves like
/// an unreachable device.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Result<CounterSample, String>>>,
    name: Option<String>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Result<CounterSample, String>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            name: None,
        }
    }

    pub fn samples(samples: Vec<CounterSample>) -> Self {
        Self::new(samples.into_iter().map(Ok).collect())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

#[async_trait]
impl CounterSource for ScriptedSource {
    async fn fetch_counters(&self) -> Result<CounterSample, TransportError> {
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Ok(sample)) => Ok(sample),
            Some(Err(message)) => Err(TransportError::Malformed(message)),
            None => Err(TransportError::Timeout {
                target: "scripted:161".into(),
                attempts: 1,
            }),
        }
    }

    async fn fetch_interface_name(&self) -> Result<String, TransportError> {
        self.name
            .clone()
            .ok_or_else(|| TransportError::MissingValue("1.3.6.1.2.1.2.2.1.2.4".into()))
    }
}

pub fn sample(ingress: u64, egress: u64, t_ms: u64) -> CounterSample {
    CounterSample::new(ingress, egress, t_ms)
}
