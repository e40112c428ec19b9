use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use uuid::Uuid;

use crate::device::constants::{
    make_onekey_service_uuid, CONTACT_US_PATH, HARDWARE_BRIDGE_DOWNLOAD_URL, HELP_CENTER_URL, ONEKEY_SERVICE, SCAN_TICK,
};
use crate::device::permission::Platform;
use crate::onboarding::types::OnboardingUrls;

// ticks faster than this keep the bluetooth adapter busy without finding devices sooner
const MIN_SCAN_TICK: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Overrides the platform detected at compile time.
    pub platform: Option<Platform>,
    pub android_api_level: Option<u32>,
    pub scan_tick_ms: u64,
    pub ble_service_uuid: String,
    pub bridge_download_url: String,
    pub help_center_url: String,
}

impl Config {
    pub fn normalize(&mut self) {
        self.scan_tick_ms = self.scan_tick_ms.max(MIN_SCAN_TICK);

        while self.help_center_url.ends_with('/') {
            self.help_center_url.pop();
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(|| Platform::detect(self.android_api_level))
    }

    pub fn scan_tick(&self) -> Duration {
        Duration::from_millis(self.scan_tick_ms)
    }

    pub fn service_uuid(&self) -> Uuid {
        Uuid::parse_str(&self.ble_service_uuid).unwrap_or_else(|_| make_onekey_service_uuid())
    }

    pub fn urls(&self) -> OnboardingUrls {
        OnboardingUrls {
            bridge_download_url: self.bridge_download_url.clone(),
            contact_us_url: format!("{}/{}", self.help_center_url, CONTACT_US_PATH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: None,
            android_api_level: None,
            scan_tick_ms: SCAN_TICK,
            ble_service_uuid: ONEKEY_SERVICE.to_string(),
            bridge_download_url: HARDWARE_BRIDGE_DOWNLOAD_URL.to_string(),
            help_center_url: HELP_CENTER_URL.to_string(),
        }
    }
}
