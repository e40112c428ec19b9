//! Maps the opaque errors reported by the hardware transport onto a closed set of kinds.
//!
//! The orchestrator never looks at raw error codes: it classifies first, then asks
//! [`scan_error_action`] what to do with the kind.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::types::TransportKind;

/// Error codes reported by the hardware SDK that the classifier distinguishes.
pub mod codes {
    pub const IFRAME_LOAD_FAIL: u32 = 302;
    pub const IFRAME_TIMEOUT: u32 = 303;
    pub const CALL_METHOD_NOT_RESPONSE: u32 = 404;
    pub const BLE_SCAN_ERROR: u32 = 700;
    pub const BLE_PERMISSION_ERROR: u32 = 701;
    pub const BLE_LOCATION_ERROR: u32 = 702;
    pub const BLE_LOCATION_SERVICES_DISABLED: u32 = 712;
    pub const BLE_TIMEOUT_ERROR: u32 = 713;
    pub const BLE_POWERED_OFF: u32 = 721;
    pub const BLE_UNSUPPORTED: u32 = 722;
    pub const BRIDGE_NETWORK_ERROR: u32 = 810;
    pub const BRIDGE_TIMEOUT_ERROR: u32 = 811;
    pub const BRIDGE_NOT_INSTALLED: u32 = 812;
    pub const BRIDGE_TIMEOUT_ERROR_FOR_DESKTOP: u32 = 813;
    pub const CONNECT_TIMEOUT_ERROR: u32 = 814;
    pub const DEVICE_METHOD_CALL_TIMEOUT: u32 = 815;
}

/// Failure payload of a scan tick or a transport call, as delivered by the hardware SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (code {code:?})")]
pub struct RawTransportError {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(rename = "error", default)]
    pub message: String,
}

impl RawTransportError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        RawTransportError { code: Some(code), message: message.into() }
    }

    pub fn without_code(message: impl Into<String>) -> Self {
        RawTransportError { code: None, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    RadioPermissionMissing,
    RadioOff,
    // some platforms refuse to scan for BLE while location services are off
    LocationServiceOff,
    BridgeTimeout,
    ConnectTimeout,
    DeviceCallTimeout,
    BridgeNotInstalled,
    DiscoveryTransportInitFailure,
    Unknown,
}

pub fn classify(error: &RawTransportError) -> TransportErrorKind {
    use codes::*;

    match error.code {
        Some(BLE_PERMISSION_ERROR) => TransportErrorKind::RadioPermissionMissing,
        // no usable adapter is reported like a radio that is switched off
        Some(BLE_POWERED_OFF) | Some(BLE_UNSUPPORTED) => TransportErrorKind::RadioOff,
        Some(BLE_LOCATION_ERROR) | Some(BLE_LOCATION_SERVICES_DISABLED) => TransportErrorKind::LocationServiceOff,
        Some(BRIDGE_TIMEOUT_ERROR) | Some(BRIDGE_TIMEOUT_ERROR_FOR_DESKTOP) => TransportErrorKind::BridgeTimeout,
        Some(CONNECT_TIMEOUT_ERROR) | Some(BLE_TIMEOUT_ERROR) => TransportErrorKind::ConnectTimeout,
        Some(DEVICE_METHOD_CALL_TIMEOUT) | Some(CALL_METHOD_NOT_RESPONSE) => TransportErrorKind::DeviceCallTimeout,
        Some(BRIDGE_NOT_INSTALLED) => TransportErrorKind::BridgeNotInstalled,
        Some(IFRAME_LOAD_FAIL) | Some(IFRAME_TIMEOUT) => TransportErrorKind::DiscoveryTransportInitFailure,
        _ => TransportErrorKind::Unknown,
    }
}

/// What the user is told about a failed scan tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanNotice {
    /// Generic toast carrying the transport's own message.
    ScanFailed,
    NetworkError,
    ConnectionFailed,
    InstallBridge,
    BluetoothPermissionNeeded,
    EnableBluetooth,
    EnableLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanErrorAction {
    pub notice: ScanNotice,
    pub stop_scan: bool,
}

impl ScanErrorAction {
    fn stop(notice: ScanNotice) -> Self {
        ScanErrorAction { notice, stop_scan: true }
    }

    fn keep_scanning(notice: ScanNotice) -> Self {
        ScanErrorAction { notice, stop_scan: false }
    }
}

/// Decides how a failed scan tick is handled, given the transport the scan runs over.
pub fn scan_error_action(kind: TransportErrorKind, transport: TransportKind) -> ScanErrorAction {
    use TransportErrorKind::*;

    match (kind, transport) {
        (RadioPermissionMissing, TransportKind::Bluetooth) => ScanErrorAction::stop(ScanNotice::BluetoothPermissionNeeded),
        (RadioOff, TransportKind::Bluetooth) => ScanErrorAction::stop(ScanNotice::EnableBluetooth),
        (LocationServiceOff, TransportKind::Bluetooth) => ScanErrorAction::stop(ScanNotice::EnableLocation),
        (RadioPermissionMissing | RadioOff | LocationServiceOff, TransportKind::Usb) => {
            ScanErrorAction::keep_scanning(ScanNotice::ScanFailed)
        },
        (DiscoveryTransportInitFailure, TransportKind::Usb) => ScanErrorAction::stop(ScanNotice::NetworkError),
        (DiscoveryTransportInitFailure, TransportKind::Bluetooth) => ScanErrorAction::keep_scanning(ScanNotice::ScanFailed),
        (BridgeTimeout | ConnectTimeout | DeviceCallTimeout, _) => ScanErrorAction::stop(ScanNotice::ConnectionFailed),
        (BridgeNotInstalled, _) => ScanErrorAction::stop(ScanNotice::InstallBridge),
        (Unknown, _) => ScanErrorAction::keep_scanning(ScanNotice::ScanFailed),
    }
}
