use std::io;
use std::str::Utf8Error;
use thiserror::Error;
use btleplug;
use serde_json;

use crate::device::classify::RawTransportError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine path to config file")]
    NoConfigPath,

    #[error("Failed to acquire file lock on config file: {source}")]
    CanNotLock { source: io::Error },

    #[error("Failed to encode/decode config as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read/write config file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse/build config file: {source}")]
    JsonError { #[from] source: serde_json::Error },
}

#[derive(Error, Debug)]
pub enum AppRunError {
    #[error("Failed to start (config): {source}")]
    ConfigError { #[from] source: ConfigError },

    #[error("Failed to start (tokio runtime): {source}")]
    Runtime { source: io::Error },

    #[error("Failed to read input file: {source}")]
    Input { source: io::Error },

    #[error("Failed to parse input: {source}")]
    Json { #[from] source: serde_json::Error },

    #[error("Bluetooth is not ready: {source}")]
    Gate { #[from] source: GateError },

    #[error("Device error: {source}")]
    Device { #[from] source: DeviceError },

    #[error("Onboarding failed: {source}")]
    Flow { #[from] source: FlowError },
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Error communicating with device (btleplug): {source}")]
    Btle { #[from] source: btleplug::Error },

    #[error("Hardware transport error: {source}")]
    Transport { #[from] source: RawTransportError },

    #[error("No bluetooth adapter is available")]
    NoAdapter,

    #[error("Bluetooth scanning must be started from within a tokio runtime")]
    NoRuntime,

    #[error("The hardware service does not support this operation")]
    Unsupported,
}

/// Failures reported by the bluetooth permission gate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("Bluetooth permission has not been granted")]
    PermissionDenied,

    #[error("Bluetooth is turned off")]
    RadioOff,
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Another {operation} is still in progress")]
    Busy { operation: &'static str },

    #[error("Device {connect_id} is not in the current device list")]
    UnknownDevice { connect_id: String },

    #[error("Device is in bootloader mode")]
    BootloaderModeDetected,

    #[error("Device is in backup mode")]
    BackupModeUnsupported,

    #[error("Connect device failed, no features returned")]
    ConnectFailedNoFeatures,

    #[error("Failed to connect device: {source}")]
    Connect { source: DeviceError },

    #[error("Failed to create hardware wallet: {source}")]
    WalletCreation { source: DeviceError },

    #[error("Failed to start scanning: {source}")]
    ScanStart { source: DeviceError },
}

#[derive(Error, Debug)]
pub enum LinkOpenError {
    #[error("Refusing to open a link that is not http(s)")]
    NotHttp,

    #[error("This platform has no settings surface for {target}")]
    NoSettingsSurface { target: String },

    #[error("Failed to open link: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to join link opener task: {source}")]
    Join { #[from] source: tokio::task::JoinError },
}
