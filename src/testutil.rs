// VibraWatch — shared test doubles for the capability traits.
//
// All doubles hand out Rc-backed recorders so a test can keep observing
// after moving the double into the component under test.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::traits::{
    Annunciator, Clock, CredentialStore, HttpReply, Lamp, SampleSource, TransportError, WifiLink,
};
use crate::types::{Credentials, Sample};

/// Sample source yielding 0.0, 1.0, 2.0, ... on the x axis and counting
/// how often it was read.
#[derive(Default)]
pub struct RampSource {
    pub calls: Rc<Cell<usize>>,
}

impl SampleSource for RampSource {
    fn sample(&mut self) -> Sample {
        let n = self.calls.get();
        self.calls.set(n + 1);
        Sample::new(n as f32, 0.0, 9.8)
    }
}

/// Clock that records every requested sleep instead of sleeping.
#[derive(Clone, Default)]
pub struct TestClock {
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl TestClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for TestClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

/// Lamp and alarm recorder, cloneable so the test keeps a handle.
#[derive(Clone, Default)]
pub struct SharedAnnunciator {
    lamps: Rc<RefCell<Vec<Lamp>>>,
    alarms: Rc<Cell<usize>>,
}

impl SharedAnnunciator {
    pub fn lamps(&self) -> Vec<Lamp> {
        self.lamps.borrow().clone()
    }

    pub fn alarms(&self) -> usize {
        self.alarms.get()
    }
}

impl Annunciator for SharedAnnunciator {
    fn set_lamp(&mut self, lamp: Lamp) {
        self.lamps.borrow_mut().push(lamp);
    }

    fn sound_alarm(&mut self) {
        self.alarms.set(self.alarms.get() + 1);
    }
}

/// Wi-Fi link that answers `is_connected` from a script. The script drains
/// front to back; its last entry repeats forever.
pub struct FakeLink {
    script: Rc<RefCell<VecDeque<bool>>>,
    pub connect_calls: Rc<Cell<usize>>,
    pub fail_start: bool,
}

impl FakeLink {
    pub fn script(states: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Rc::new(RefCell::new(states.into_iter().collect())),
            connect_calls: Rc::new(Cell::new(0)),
            fail_start: false,
        }
    }

    /// Always associated.
    pub fn up() -> Self {
        Self::script([true])
    }

    /// Never associates.
    pub fn down() -> Self {
        Self::script([false])
    }
}

impl WifiLink for FakeLink {
    fn is_connected(&self) -> bool {
        let mut script = self.script.borrow_mut();
        if script.len() > 1 {
            script.pop_front().unwrap_or(false)
        } else {
            script.front().copied().unwrap_or(false)
        }
    }

    fn start_connect(&mut self, _creds: &Credentials) -> anyhow::Result<()> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        if self.fail_start {
            anyhow::bail!("radio refused the connect request");
        }
        Ok(())
    }
}

/// Transport double: scripted replies consumed in order, every request
/// recorded as (url, body).
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    pub sent: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
}

impl FakeTransport {
    /// A transport that always answers with this status and body.
    pub fn replying(status: u16, body: &str) -> Self {
        let t = Self::default();
        // Enough for any test; send() consumes one per call.
        for _ in 0..16 {
            t.push_reply(status, body);
        }
        t
    }

    /// A transport whose every request fails before reaching the service.
    pub fn failing(reason: &'static str) -> Self {
        let t = Self::default();
        for _ in 0..16 {
            t.push_failure(reason);
        }
        t
    }

    pub fn push_reply(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpReply {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn push_failure(&self, reason: &'static str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::Request(anyhow::anyhow!(reason))));
    }
}

impl crate::traits::VerdictTransport for FakeTransport {
    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        self.sent.borrow_mut().push((url.to_owned(), body.to_vec()));
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("transport script exhausted")
    }
}

/// In-memory credential store with switchable failure modes.
#[derive(Default)]
pub struct MemStore {
    pub saved: Option<Credentials>,
    pub fail_load: bool,
    pub fail_save: bool,
}

impl MemStore {
    pub fn with_saved(creds: Credentials) -> Self {
        Self {
            saved: Some(creds),
            ..Self::default()
        }
    }
}

impl CredentialStore for MemStore {
    fn load(&mut self) -> anyhow::Result<Option<Credentials>> {
        if self.fail_load {
            anyhow::bail!("flash read failed");
        }
        Ok(self.saved.clone())
    }

    fn save(&mut self, creds: &Credentials) -> anyhow::Result<()> {
        if self.fail_save {
            anyhow::bail!("flash write failed");
        }
        self.saved = Some(creds.clone());
        Ok(())
    }
}
