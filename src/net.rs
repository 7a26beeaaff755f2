// VibraWatch — Wi-Fi Link & HTTP Transport
//
// esp-idf adapters behind the WifiLink and VerdictTransport traits. The
// Wi-Fi side only starts association; the session manager owns the polling.
// The HTTP side opens a fresh connection per request, so a dropped link
// never leaves a stale socket behind for the next cycle.

use std::time::Duration;

use anyhow::anyhow;
use embedded_svc::http::client::Client;
use embedded_svc::http::Status;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

use crate::traits::{HttpReply, TransportError, VerdictTransport, WifiLink};
use crate::types::Credentials;

pub struct EspWifiLink {
    wifi: EspWifi<'static>,
}

impl EspWifiLink {
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self { wifi }
    }
}

impl WifiLink for EspWifiLink {
    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn start_connect(&mut self, creds: &Credentials) -> anyhow::Result<()> {
        let auth_method = if creds.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("ssid longer than 32 bytes"))?,
            password: creds
                .pass
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("passphrase longer than 64 bytes"))?,
            auth_method,
            ..Default::default()
        });

        self.wifi.set_configuration(&config)?;
        if !self.wifi.is_started()? {
            self.wifi.start()?;
        }
        self.wifi.connect()?;
        Ok(())
    }
}

/// One-shot POST transport over esp-idf's HTTP client.
pub struct EspTransport {
    timeout: Duration,
}

impl EspTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn do_post(&self, url: &str, body: &[u8]) -> anyhow::Result<HttpReply> {
        let connection = EspHttpConnection::new(&HttpConfiguration {
            timeout: Some(self.timeout),
            ..Default::default()
        })?;
        let mut client = Client::wrap(connection);

        let content_length = body.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
        ];
        let mut request = client.post(url, &headers)?;
        request.write_all(body)?;
        request.flush()?;

        let mut response = request.submit()?;
        let status = response.status();
        let mut reply_body = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let n = response.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            reply_body.extend_from_slice(&chunk[..n]);
        }

        Ok(HttpReply {
            status,
            body: reply_body,
        })
    }
}

impl VerdictTransport for EspTransport {
    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        self.do_post(url, body).map_err(TransportError::Request)
    }
}
