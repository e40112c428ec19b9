//! Bluetooth readiness checks that have to pass before a bluetooth scan is started.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

use crate::device::constants::RADIO_SETTLE_DELAY;
use crate::device::types::TransportKind;
use crate::error::GateError;

// first android release with the split BLUETOOTH_SCAN / BLUETOOTH_CONNECT permissions
const ANDROID_SPLIT_BLUETOOTH_PERMISSIONS: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "os", rename_all = "camelCase")]
pub enum Platform {
    Ios,
    #[serde(rename_all = "camelCase")]
    Android { api_level: u32 },
    Desktop,
    Web,
}

impl Platform {
    pub fn detect(android_api_level: Option<u32>) -> Platform {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android { api_level: android_api_level.unwrap_or(ANDROID_SPLIT_BLUETOOTH_PERMISSIONS) }
        } else {
            Platform::Desktop
        }
    }

    /// Native mobile builds talk to devices over bluetooth, everything else over USB.
    pub fn is_native(&self) -> bool {
        matches!(self, Platform::Ios | Platform::Android { .. })
    }

    pub fn scan_transport(&self) -> TransportKind {
        if self.is_native() { TransportKind::Bluetooth } else { TransportKind::Usb }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    IosBluetooth,
    AndroidFineLocation,
    AndroidBluetoothConnect,
    AndroidBluetoothScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Limited,
    /// Not granted, but the user can still be asked.
    Denied,
    /// Not granted and the OS will not show a prompt anymore.
    Blocked,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    On,
    Off,
    Unauthorized,
    Unsupported,
    Unknown,
}

#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn check(&self, permission: Permission) -> PermissionStatus;

    /// Shows the OS permission prompt for all given permissions at once.
    async fn request(&self, permissions: &[Permission]) -> HashMap<Permission, PermissionStatus>;
}

#[async_trait]
pub trait RadioProvider: Send + Sync {
    async fn radio_state(&self) -> RadioState;
}

/// Permission provider for platforms without runtime grants.
pub struct NoRuntimePermissions;

#[async_trait]
impl PermissionProvider for NoRuntimePermissions {
    async fn check(&self, _permission: Permission) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request(&self, permissions: &[Permission]) -> HashMap<Permission, PermissionStatus> {
        permissions.iter().map(|permission| (*permission, PermissionStatus::Granted)).collect()
    }
}

/// Proof that bluetooth permissions are granted and the radio is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BluetoothReady;

pub struct BluetoothGate {
    platform: Platform,
    permissions: Arc<dyn PermissionProvider>,
    radio: Arc<dyn RadioProvider>,
    // permissions this gate already prompted for; they are not prompted for again
    prompted: Mutex<HashSet<Permission>>,
}

impl BluetoothGate {
    pub fn new(platform: Platform, permissions: Arc<dyn PermissionProvider>, radio: Arc<dyn RadioProvider>) -> Self {
        BluetoothGate {
            platform,
            permissions,
            radio,
            prompted: Mutex::new(HashSet::new()),
        }
    }

    fn required_permissions(&self) -> Vec<Permission> {
        match self.platform {
            Platform::Ios => vec![Permission::IosBluetooth],
            Platform::Android { api_level } if api_level < ANDROID_SPLIT_BLUETOOTH_PERMISSIONS => {
                vec![Permission::AndroidFineLocation]
            },
            Platform::Android { .. } => vec![Permission::AndroidBluetoothConnect, Permission::AndroidBluetoothScan],
            Platform::Desktop | Platform::Web => vec![],
        }
    }

    pub async fn ensure_bluetooth_ready(&self) -> Result<BluetoothReady, GateError> {
        if !self.permissions_granted().await {
            info!("Bluetooth permission missing on {:?}", self.platform);
            return Err(GateError::PermissionDenied);
        }

        if !self.radio_on().await {
            info!("Bluetooth radio is not on");
            return Err(GateError::RadioOff);
        }

        Ok(BluetoothReady)
    }

    /// Allows the gate to prompt again, for example after the user came back from the settings app.
    pub fn forget_prompts(&self) {
        self.prompted.lock().expect("Failed to lock prompted permissions").clear();
    }

    async fn permissions_granted(&self) -> bool {
        let mut missing: Vec<(Permission, PermissionStatus)> = Vec::new();

        for permission in self.required_permissions() {
            let status = self.permissions.check(permission).await;
            if status != PermissionStatus::Granted {
                missing.push((permission, status));
            }
        }

        if missing.is_empty() {
            return true;
        }

        // iOS shows its own prompt when bluetooth is first used
        if self.platform == Platform::Ios {
            return false;
        }

        let to_request: Vec<Permission> = {
            let mut prompted = self.prompted.lock().expect("Failed to lock prompted permissions");
            let to_request: Vec<Permission> = missing.iter()
                .filter(|(permission, status)| *status == PermissionStatus::Denied && !prompted.contains(permission))
                .map(|(permission, _)| *permission)
                .collect();

            // a prompt can not fix a blocked or already refused sibling, so nothing is asked
            if to_request.len() != missing.len() {
                debug!("Not prompting for {:?}", missing);
                return false;
            }

            prompted.extend(to_request.iter().copied());
            to_request
        };

        let statuses = self.permissions.request(&to_request).await;
        to_request.iter().all(|permission| statuses.get(permission) == Some(&PermissionStatus::Granted))
    }

    async fn radio_on(&self) -> bool {
        match self.radio.radio_state().await {
            RadioState::On => true,
            state => {
                debug!("Radio state {:?}, asking again", state);
                sleep(Duration::from_millis(RADIO_SETTLE_DELAY)).await;

                let state = self.radio.radio_state().await;
                if state != RadioState::On {
                    warn!("Radio state is {:?}", state);
                }
                state == RadioState::On
            },
        }
    }
}
