use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Classic,
    Classic1s,
    Mini,
    Touch,
    Pro,
    Unknown,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            DeviceType::Classic => "classic",
            DeviceType::Classic1s => "classic1s",
            DeviceType::Mini => "mini",
            DeviceType::Touch => "touch",
            DeviceType::Pro => "pro",
            DeviceType::Unknown => "unknown",
        };

        write!(f, "{}", result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Usb,
    Bluetooth,
}

/// One entry of a discovery payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDevice {
    pub connect_id: Option<String>,
    pub uuid: String,
    pub name: String,
    pub device_type: DeviceType,
    pub transport: TransportKind,
    // some transports already know the firmware mode before connecting
    #[serde(default)]
    pub bootloader_mode: bool,
}

impl DiscoveredDevice {
    /// Key used to match this device across ticks and to release per-device resources.
    pub fn connection_id(&self) -> &str {
        self.connect_id.as_deref().unwrap_or("")
    }
}

/// Feature snapshot of a connected device, in the shape the hardware SDK reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFeatures {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub major_version: Option<u32>,
    #[serde(default)]
    pub minor_version: Option<u32>,
    #[serde(default)]
    pub patch_version: Option<u32>,
    #[serde(default)]
    pub bootloader_mode: bool,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub no_backup: bool,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub onekey_device_type: Option<String>,
    #[serde(default)]
    pub onekey_serial: Option<String>,
    #[serde(default)]
    pub serial_no: Option<String>,
    #[serde(default)]
    pub ble_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceMode {
    Normal,
    NotInitialized,
    BackupMode,
    Bootloader,
}

/// Which sub-view of the connect screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Init,
    Searching,
    Listing,
}

/// Scanner lifecycle state, as reported by the scanner itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Start,
    Stop,
}
