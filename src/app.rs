// VibraWatch — Decision Loop Core
//
// One cycle of sample → batch → transmit → decide, with every collaborator
// held in an explicit context object. The binary drives this on hardware;
// the tests drive the identical code against scripted doubles.

use crate::alert::{AlertLevel, AlertMachine};
use crate::batch::BatchBuilder;
use crate::inference::InferenceClient;
use crate::session::SessionManager;
use crate::traits::{Annunciator, Clock, SampleSource, VerdictTransport, WifiLink};

/// What one pass through the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No link after the bounded reconnect; nothing sampled, nothing sent.
    Offline,
    /// A verdict came back and the alert machine applied it.
    Updated(AlertLevel),
    /// The batch was sent but no verdict came back; alert level untouched.
    Skipped,
}

pub struct App<S, C, L, T, A> {
    session: SessionManager<L, C>,
    batcher: BatchBuilder<S, C>,
    client: InferenceClient<T>,
    alerts: AlertMachine<A>,
    sensor_id: String,
    failure_streak: u32,
}

impl<S, C, L, T, A> App<S, C, L, T, A>
where
    S: SampleSource,
    C: Clock,
    L: WifiLink,
    T: VerdictTransport,
    A: Annunciator,
{
    pub fn new(
        session: SessionManager<L, C>,
        batcher: BatchBuilder<S, C>,
        client: InferenceClient<T>,
        alerts: AlertMachine<A>,
        sensor_id: impl Into<String>,
    ) -> Self {
        Self {
            session,
            batcher,
            client,
            alerts,
            sensor_id: sensor_id.into(),
            failure_streak: 0,
        }
    }

    pub fn alerts(&self) -> &AlertMachine<A> {
        &self.alerts
    }

    /// Transport failures since the last verdict. Purely diagnostic; no
    /// amount of failures escalates the alert level on its own.
    pub fn consecutive_failures(&self) -> u32 {
        self.failure_streak
    }

    /// Run one full cycle. Sampling only starts once the link is up, so a
    /// dead network never costs a wasted batch.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if !self.session.ensure_connected(&mut self.alerts) {
            return CycleOutcome::Offline;
        }

        let batch = self.batcher.build_batch(&self.sensor_id);
        match self.client.send(&batch) {
            Ok(verdict) => {
                self.failure_streak = 0;
                CycleOutcome::Updated(self.alerts.apply(&verdict))
            }
            Err(e) => {
                self.failure_streak += 1;
                log::warn!(
                    "inference request failed ({e}); {} consecutive failure(s), keeping previous alert level",
                    self.failure_streak
                );
                CycleOutcome::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONNECT_MAX_POLLS, SAMPLE_COUNT};
    use crate::testutil::{FakeLink, FakeTransport, RampSource, SharedAnnunciator, TestClock};
    use crate::traits::Lamp;
    use crate::types::Credentials;
    use std::time::Duration;

    const ENDPOINT: &str = "http://192.168.0.42:8000/predict";

    struct Rig {
        outputs: SharedAnnunciator,
        clock: TestClock,
        app: App<RampSource, TestClock, FakeLink, FakeTransport, SharedAnnunciator>,
        sample_calls: std::rc::Rc<std::cell::Cell<usize>>,
        sent: std::rc::Rc<std::cell::RefCell<Vec<(String, Vec<u8>)>>>,
    }

    fn rig(link: FakeLink, transport: FakeTransport) -> Rig {
        let outputs = SharedAnnunciator::default();
        let clock = TestClock::default();
        let source = RampSource::default();
        let sample_calls = source.calls.clone();
        let sent = transport.sent.clone();
        let app = App::new(
            SessionManager::new(link, clock.clone(), Credentials::builtin()),
            BatchBuilder::new(source, clock.clone(), Duration::from_millis(5)),
            InferenceClient::new(transport, ENDPOINT),
            AlertMachine::new(outputs.clone()),
            "esp32_mpu6050_01",
        );
        Rig {
            outputs,
            clock,
            app,
            sample_calls,
            sent,
        }
    }

    #[test]
    fn full_cycle_applies_the_verdict() {
        let mut rig = rig(
            FakeLink::up(),
            FakeTransport::replying(200, r#"{"is_anomaly":true,"distance":3.0,"threshold":1.0}"#),
        );
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Updated(AlertLevel::Critical));
        assert_eq!(rig.outputs.lamps(), vec![Lamp::Red]);
        assert_eq!(rig.outputs.alarms(), 1);
        // The batch that went out was exactly one full window.
        let sent = rig.sent.borrow();
        let json: serde_json::Value = serde_json::from_slice(&sent[0].1).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), SAMPLE_COUNT);
    }

    #[test]
    fn offline_cycle_samples_nothing_and_sends_nothing() {
        let mut rig = rig(FakeLink::down(), FakeTransport::replying(200, "{}"));
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Offline);
        assert_eq!(rig.sample_calls.get(), 0);
        assert!(rig.sent.borrow().is_empty());
        // Only the reconnect polls slept; no sampling cadence ran.
        assert_eq!(rig.clock.sleeps().len(), CONNECT_MAX_POLLS as usize);
    }

    #[test]
    fn offline_cycle_keeps_the_previous_level() {
        // First cycle online and Normal, then the link dies.
        let link = FakeLink::script([true, false]);
        let mut rig = rig(
            link,
            FakeTransport::replying(200, r#"{"is_anomaly":false,"distance":0.1,"threshold":1.0}"#),
        );
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Updated(AlertLevel::Normal));
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Offline);
        // Offline cue recoloured the lamp, but the level survived.
        assert_eq!(rig.app.alerts().level(), Some(AlertLevel::Normal));
        assert_eq!(rig.outputs.lamps().last(), Some(&Lamp::Red));
    }

    #[test]
    fn transport_failure_skips_without_touching_alerts() {
        let transport = FakeTransport::default();
        transport.push_reply(200, r#"{"is_anomaly":false,"distance":0.9,"threshold":1.0}"#);
        transport.push_failure("timed out");
        let mut rig = rig(FakeLink::up(), transport);

        assert_eq!(rig.app.run_cycle(), CycleOutcome::Updated(AlertLevel::Warning));
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Skipped);
        assert_eq!(rig.app.alerts().level(), Some(AlertLevel::Warning));
        // No extra lamp writes and no beep for the skipped cycle.
        assert_eq!(rig.outputs.lamps(), vec![Lamp::Yellow]);
        assert_eq!(rig.outputs.alarms(), 0);
    }

    #[test]
    fn failure_streak_counts_up_and_resets() {
        let transport = FakeTransport::default();
        transport.push_failure("down");
        transport.push_failure("still down");
        transport.push_reply(200, "{}");
        let mut rig = rig(FakeLink::up(), transport);

        rig.app.run_cycle();
        rig.app.run_cycle();
        assert_eq!(rig.app.consecutive_failures(), 2);
        rig.app.run_cycle();
        assert_eq!(rig.app.consecutive_failures(), 0);
    }

    #[test]
    fn non_success_status_counts_as_a_skip() {
        let mut rig = rig(FakeLink::up(), FakeTransport::replying(503, "busy"));
        assert_eq!(rig.app.run_cycle(), CycleOutcome::Skipped);
        assert_eq!(rig.app.alerts().level(), None);
    }
}
