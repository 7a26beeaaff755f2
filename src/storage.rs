// VibraWatch — NVS Credential Store
//
// Wi-Fi credentials live in their own NVS namespace and survive reflashes
// of the app partition. Absent keys are a normal first-boot condition, not
// an error.

use esp_idf_svc::nvs::{EspNvs, EspNvsPartition, NvsDefault};

use crate::config::{NVS_KEY_PASS, NVS_KEY_SSID, NVS_NAMESPACE};
use crate::traits::CredentialStore;
use crate::types::Credentials;

pub struct NvsCredentialStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsCredentialStore {
    pub fn new(partition: EspNvsPartition<NvsDefault>) -> anyhow::Result<Self> {
        Ok(Self {
            nvs: EspNvs::new(partition, NVS_NAMESPACE, true)?,
        })
    }

    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        // Longest legal value is a 64-byte WPA passphrase plus terminator.
        let mut buf = [0u8; 128];
        Ok(self.nvs.get_str(key, &mut buf)?.map(str::to_owned))
    }
}

impl CredentialStore for NvsCredentialStore {
    fn load(&mut self) -> anyhow::Result<Option<Credentials>> {
        // No stored SSID means nothing usable, whatever the pass key says.
        let Some(ssid) = self.get_string(NVS_KEY_SSID)? else {
            return Ok(None);
        };
        let pass = self.get_string(NVS_KEY_PASS)?.unwrap_or_default();
        Ok(Some(Credentials::new(ssid, pass)))
    }

    fn save(&mut self, creds: &Credentials) -> anyhow::Result<()> {
        self.nvs.set_str(NVS_KEY_SSID, &creds.ssid)?;
        self.nvs.set_str(NVS_KEY_PASS, &creds.pass)?;
        Ok(())
    }
}
