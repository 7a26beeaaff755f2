// VibraWatch — Capability Traits
//
// The seams between the decision loop and the outside world. The esp-idf
// adapters implement these on hardware; the test suite implements them with
// scripted doubles. The loop itself never touches a register or a socket.

use std::fmt;
use std::time::Duration;

use crate::types::{Credentials, Sample};

/// Source of acceleration readings.
///
/// Infallible on purpose: a flaky bus must not punch holes in a batch, so
/// implementations degrade to a zero sample instead of failing.
pub trait SampleSource {
    fn sample(&mut self) -> Sample;
}

/// Injectable time source so tests run the loop without real sleeps.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// The real thing: blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Which of the three status LEDs is lit. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lamp {
    Green,
    Yellow,
    Red,
}

/// The operator-facing outputs: tri-colour lamp plus alarm tone.
pub trait Annunciator {
    fn set_lamp(&mut self, lamp: Lamp);
    /// One fixed-pitch, fixed-length tone. Fire and forget.
    fn sound_alarm(&mut self);
}

/// Station-mode Wi-Fi control.
pub trait WifiLink {
    fn is_connected(&self) -> bool;
    /// Kick off an association attempt; completion is observed by polling
    /// [`WifiLink::is_connected`].
    fn start_connect(&mut self, creds: &Credentials) -> anyhow::Result<()>;
}

/// A raw HTTP reply: status line plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Why a batch never produced a verdict.
#[derive(Debug)]
pub enum TransportError {
    /// The request never completed (connect refused, timeout, I/O error).
    Request(anyhow::Error),
    /// The service answered, but with a non-success status.
    Status(u16),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(e) => write!(f, "request failed: {e}"),
            TransportError::Status(code) => write!(f, "service returned status {code}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Request(e) => Some(e.as_ref()),
            TransportError::Status(_) => None,
        }
    }
}

/// POSTs a JSON payload and returns whatever the service answered.
///
/// Implementations report transport-level trouble only; status-code policy
/// lives in the inference client.
pub trait VerdictTransport {
    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError>;
}

/// Persistent storage for Wi-Fi credentials.
pub trait CredentialStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&mut self) -> anyhow::Result<Option<Credentials>>;
    fn save(&mut self, creds: &Credentials) -> anyhow::Result<()>;
}
