// VibraWatch — Batch Builder
//
// Pulls a fixed-size window of samples from the source at the nominal
// sampling cadence. The inter-sample sleep is the pacing for the whole
// sampling phase; the sensor read itself is treated as instantaneous.

use std::time::Duration;

use crate::config::SAMPLE_COUNT;
use crate::traits::{Clock, SampleSource};
use crate::types::{Batch, Sample};

pub struct BatchBuilder<S, C> {
    source: S,
    clock: C,
    interval: Duration,
}

impl<S: SampleSource, C: Clock> BatchBuilder<S, C> {
    pub fn new(source: S, clock: C, interval: Duration) -> Self {
        Self {
            source,
            clock,
            interval,
        }
    }

    /// Collect exactly [`SAMPLE_COUNT`] samples, sleeping one interval after
    /// each. Always returns a full batch; the source contract rules out
    /// partial windows.
    pub fn build_batch(&mut self, sensor_id: &str) -> Batch {
        let mut samples = [Sample::default(); SAMPLE_COUNT];
        for slot in samples.iter_mut() {
            *slot = self.source.sample();
            self.clock.sleep(self.interval);
        }
        Batch {
            sensor_id: sensor_id.to_owned(),
            samples,
        }
    }
}
