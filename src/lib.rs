// VibraWatch — machine-vibration anomaly watchdog for ESP32 + MPU6050.
//
// The library is the firmware's brain and runs anywhere: sampling windows,
// the inference round-trip, the alert state machine and the credential
// portal are plain Rust behind the capability traits in [`traits`]. The
// esp-idf adapters and the binary entry point only exist when compiling
// for the chip, which keeps `cargo test` a host affair.

pub mod alert;
pub mod app;
pub mod batch;
pub mod config;
pub mod inference;
pub mod portal;
pub mod session;
pub mod traits;
pub mod types;

#[cfg(target_os = "espidf")]
pub mod drivers;
#[cfg(target_os = "espidf")]
pub mod net;
#[cfg(target_os = "espidf")]
pub mod storage;
#[cfg(target_os = "espidf")]
pub mod web;

#[cfg(test)]
pub(crate) mod testutil;

pub use alert::{AlertLevel, AlertMachine};
pub use app::{App, CycleOutcome};
pub use types::{Batch, Credentials, Sample, Verdict};
