// VibraWatch — Core Data Types
//
// The structs that cross component boundaries: acceleration samples, the
// batch sent to the inference service, its verdict, and Wi-Fi credentials.
// Wire shapes (field names, defaults) are part of the service contract and
// are pinned down by the serde attributes here.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_WIFI_PASS, DEFAULT_WIFI_SSID, SAMPLE_COUNT};
use crate::traits::CredentialStore;

/// One three-axis acceleration reading, in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// On the wire a sample is the bare triple `[x, y, z]`, not an object.
impl Serialize for Sample {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y, self.z].serialize(serializer)
    }
}

/// A full sampling window, ready to ship to the inference service.
///
/// Serializes to `{"sensor_id": "...", "data": [[x,y,z], ...]}` with exactly
/// [`SAMPLE_COUNT`] rows. Partial batches cannot be represented.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub sensor_id: String,
    #[serde(rename = "data")]
    pub samples: [Sample; SAMPLE_COUNT],
}

/// The inference service's answer to one batch.
///
/// Every field is optional on the wire; missing ones take the documented
/// defaults below, and unknown fields are ignored. A threshold of 1.0 keeps
/// the ratio meaningful when the service omits it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Verdict {
    pub is_anomaly: bool,
    pub distance: f32,
    pub threshold: f32,
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            is_anomaly: false,
            distance: 0.0,
            threshold: 1.0,
        }
    }
}

impl Verdict {
    /// Severity ratio: distance over threshold, 0.0 when the threshold is
    /// not positive (no division by zero, no negative surprises).
    pub fn ratio(&self) -> f32 {
        if self.threshold > 0.0 {
            self.distance / self.threshold
        } else {
            0.0
        }
    }
}

/// A Wi-Fi network name and passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(ssid: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            pass: pass.into(),
        }
    }

    /// The compile-time fallback network.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_WIFI_SSID, DEFAULT_WIFI_PASS)
    }

    /// Stored credentials if the store has a usable pair, otherwise the
    /// built-in defaults. Store errors are logged and swallowed: boot must
    /// not hinge on a flaky flash read.
    pub fn load_or_builtin(store: &mut impl CredentialStore) -> Self {
        match store.load() {
            Ok(Some(creds)) => {
                log::info!("using stored Wi-Fi credentials (ssid \"{}\")", creds.ssid);
                creds
            }
            Ok(None) => {
                log::info!("no stored Wi-Fi credentials, using built-in defaults");
                Self::builtin()
            }
            Err(e) => {
                log::warn!("credential store read failed: {e:#}; using built-in defaults");
                Self::builtin()
            }
        }
    }

    /// Open networks have an empty passphrase.
    pub fn is_open(&self) -> bool {
        self.pass.is_empty()
    }
}
