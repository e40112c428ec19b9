use uuid::Uuid;

/**
 * How often (milliseconds) the bluetooth scanner reports the peripherals it has seen.
 */
pub const SCAN_TICK: u64 = 1000;

/**
 * How long (milliseconds) to wait for a freshly created bluetooth manager before asking it
 * for its state a second time. The first query after startup is not reliable on every platform.
 */
pub const RADIO_SETTLE_DELAY: u64 = 100;

/**
 * The UUID of the Bluetooth BLE service exposed by OneKey hardware wallets
 */
pub const ONEKEY_SERVICE: &str = "00000001-0000-1000-8000-00805f9b34fb";

pub const HARDWARE_BRIDGE_DOWNLOAD_URL: &str = "https://onekey.so/download/?client=bridge";

pub const HELP_CENTER_URL: &str = "https://help.onekey.so/hc";

// relative to HELP_CENTER_URL
pub const CONTACT_US_PATH: &str = "requests/new";

/**
 * Fallback messages when the transport reports an error without a message.
 */
pub const DEFAULT_SCAN_ERROR_MESSAGE: &str = "DeviceScanError";
pub const DEFAULT_BRIDGE_DESCRIPTION: &str = "OneKey Bridge facilitates seamless communication between OneKey and your browser for a better experience.";

pub fn make_onekey_service_uuid() -> Uuid {
    Uuid::parse_str(ONEKEY_SERVICE).unwrap_or(Uuid::nil())
}
