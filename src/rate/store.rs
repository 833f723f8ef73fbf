// Last-sample holder for one tracked interface

use crate::models::CounterSample;

/// Holds the most recent counter sample. No validation: samples are trusted
/// once constructed.
#[derive(Debug, Default, Clone)]
pub struct SampleStore {
    last: Option<CounterSample>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> Option<CounterSample> {
        self.last
    }

    pub fn write(&mut self, sample: CounterSample) {
        self.last = Some(sample);
    }
}
