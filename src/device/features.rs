use log::warn;

use crate::device::types::{DeviceFeatures, DeviceMode, DeviceType, DiscoveredDevice};

fn device_type_from_name(name: &str) -> Option<DeviceType> {
    match name.to_ascii_uppercase().as_str() {
        "CLASSIC" => Some(DeviceType::Classic),
        "CLASSIC1S" => Some(DeviceType::Classic1s),
        "MINI" => Some(DeviceType::Mini),
        "TOUCH" => Some(DeviceType::Touch),
        "PRO" => Some(DeviceType::Pro),
        _ => None,
    }
}

fn device_type_from_serial(serial: &str) -> DeviceType {
    let prefix: String = serial.chars().take(2).collect::<String>().to_ascii_uppercase();

    match prefix.as_str() {
        "MI" => DeviceType::Mini,
        "TC" => DeviceType::Touch,
        "PR" => DeviceType::Pro,
        "CL" => DeviceType::Classic,
        _ => DeviceType::Unknown,
    }
}

/// Device type as reported by the features, or `Unknown` if the features carry no hint.
pub fn device_type_from_features(features: &DeviceFeatures) -> DeviceType {
    if let Some(device_type) = features.onekey_device_type.as_deref().and_then(device_type_from_name) {
        return device_type;
    }

    let serial = features.onekey_serial.as_deref()
        .or(features.serial_no.as_deref())
        .unwrap_or("");

    device_type_from_serial(serial)
}

/// Device type guessed from the advertised BLE name.
pub fn device_type_from_ble_name(name: &str) -> DeviceType {
    let upper = name.to_ascii_uppercase();

    if upper.starts_with("MI") {
        DeviceType::Mini
    } else if upper.starts_with("PRO") {
        DeviceType::Pro
    } else if upper.starts_with('T') {
        DeviceType::Touch
    } else if upper.starts_with('K') {
        DeviceType::Classic
    } else {
        DeviceType::Unknown
    }
}

/// Resolves the device type of a connected device, falling back on what discovery reported.
pub fn resolve_device_type(device: &DiscoveredDevice, features: &DeviceFeatures) -> DeviceType {
    match device_type_from_features(features) {
        DeviceType::Unknown => device.device_type,
        device_type => device_type,
    }
}

pub fn device_mode_from_features(features: &DeviceFeatures) -> DeviceMode {
    if features.bootloader_mode {
        DeviceMode::Bootloader
    } else if !features.initialized {
        DeviceMode::NotInitialized
    } else if features.no_backup {
        DeviceMode::BackupMode
    } else {
        DeviceMode::Normal
    }
}

pub fn is_bootloader_from_discovery(device: &DiscoveredDevice) -> bool {
    device.bootloader_mode
}

/// Bootloader check on a connected device. The features win over the discovery payload; a
/// disagreement is only logged.
pub fn is_bootloader_by_features(device: &DiscoveredDevice, features: &DeviceFeatures) -> bool {
    if features.bootloader_mode != device.bootloader_mode {
        warn!(
            "Bootloader mode of {} differs between discovery ({}) and features ({}), using features",
            device.connection_id(),
            device.bootloader_mode,
            features.bootloader_mode,
        );
    }

    features.bootloader_mode
}
