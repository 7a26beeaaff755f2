// VibraWatch — Network Session Manager
//
// Sole owner of the Wi-Fi link. Every decision cycle asks it to make sure
// the station is associated; when it is not, one bounded reconnect attempt
// runs right here (yellow lamp while polling, green or red when it
// resolves) and the cycle proceeds or is skipped on the answer.

use std::time::Duration;

use crate::alert::AlertMachine;
use crate::config::{CONNECT_MAX_POLLS, CONNECT_POLL_MS};
use crate::traits::{Annunciator, Clock, WifiLink};
use crate::types::Credentials;

pub struct SessionManager<L, C> {
    link: L,
    clock: C,
    credentials: Credentials,
}

impl<L: WifiLink, C: Clock> SessionManager<L, C> {
    pub fn new(link: L, clock: C, credentials: Credentials) -> Self {
        Self {
            link,
            clock,
            credentials,
        }
    }

    /// True when the link is usable. An already-associated link returns
    /// immediately and leaves the lamp alone; otherwise one reconnect
    /// attempt runs, polling up to [`CONNECT_MAX_POLLS`] times at
    /// [`CONNECT_POLL_MS`] before giving up until the next cycle.
    pub fn ensure_connected<A: Annunciator>(&mut self, alerts: &mut AlertMachine<A>) -> bool {
        if self.link.is_connected() {
            return true;
        }

        log::info!("connecting to Wi-Fi \"{}\"", self.credentials.ssid);
        alerts.show_connecting();

        if let Err(e) = self.link.start_connect(&self.credentials) {
            log::warn!("Wi-Fi connect request failed: {e:#}");
            alerts.show_offline();
            return false;
        }

        let poll = Duration::from_millis(CONNECT_POLL_MS);
        let mut polls = 0;
        while !self.link.is_connected() && polls < CONNECT_MAX_POLLS {
            self.clock.sleep(poll);
            polls += 1;
        }

        if self.link.is_connected() {
            log::info!("Wi-Fi connected after {polls} poll(s)");
            alerts.show_online();
            true
        } else {
            log::warn!("Wi-Fi connection failed after {polls} polls, will retry next cycle");
            alerts.show_offline();
            false
        }
    }
}
