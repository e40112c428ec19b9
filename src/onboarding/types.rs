use crate::device::constants::{CONTACT_US_PATH, HARDWARE_BRIDGE_DOWNLOAD_URL, HELP_CENTER_URL};
use crate::device::permission::Platform;
use crate::device::types::{ConnectionStatus, DeviceType, DiscoveredDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialType {
    Create,
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationChoice {
    SetupNewWallet,
    Restore,
}

/// Answer to the warning shown before restoring onto an unactivated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreWarningChoice {
    ContactUs,
    Continue,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    FinalizeWalletSetup,
    ActivateDevice {
        device_type: DeviceType,
        tutorial: TutorialType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTarget {
    App,
    Bluetooth,
    Location,
}

impl SettingsTarget {
    /// Deep link into the settings surface, if the platform has one. On Android this is the
    /// intent action to start.
    pub fn uri(&self, platform: Platform) -> Option<&'static str> {
        match (platform, self) {
            (Platform::Ios, SettingsTarget::App) => Some("app-settings:"),
            (Platform::Ios, SettingsTarget::Bluetooth) => Some("App-Prefs:Bluetooth"),
            (Platform::Ios, SettingsTarget::Location) => Some("App-Prefs:Privacy&path=LOCATION"),
            (Platform::Android { .. }, SettingsTarget::App) => Some("android.settings.APPLICATION_DETAILS_SETTINGS"),
            (Platform::Android { .. }, SettingsTarget::Bluetooth) => Some("android.settings.BLUETOOTH_SETTINGS"),
            (Platform::Android { .. }, SettingsTarget::Location) => Some("android.settings.LOCATION_SOURCE_SETTINGS"),
            (Platform::Desktop | Platform::Web, _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    OpenSettings(SettingsTarget),
    OpenUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    BluetoothPermissionNeeded,
    EnableBluetooth,
    EnableLocation,
    InstallBridge,
}

/// A dialog asking the user to fix something outside the app. Confirming it runs `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub description: Option<String>,
    pub action: PromptAction,
}

impl Prompt {
    pub fn bluetooth_permission() -> Self {
        Prompt {
            kind: PromptKind::BluetoothPermissionNeeded,
            description: None,
            action: PromptAction::OpenSettings(SettingsTarget::App),
        }
    }

    pub fn enable_bluetooth() -> Self {
        Prompt {
            kind: PromptKind::EnableBluetooth,
            description: None,
            action: PromptAction::OpenSettings(SettingsTarget::Bluetooth),
        }
    }

    pub fn enable_location() -> Self {
        Prompt {
            kind: PromptKind::EnableLocation,
            description: None,
            action: PromptAction::OpenSettings(SettingsTarget::Location),
        }
    }

    pub fn install_bridge(description: String, download_url: String) -> Self {
        Prompt {
            kind: PromptKind::InstallBridge,
            description: Some(description),
            action: PromptAction::OpenUrl(download_url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    ScanFailed,
    NetworkError,
    ConnectionFailed,
    BootloaderMode,
    BackupMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
}

impl Toast {
    pub fn error(kind: ToastKind, title: impl Into<String>, message: Option<String>) -> Self {
        Toast { kind, title: title.into(), message }
    }
}

/// Progress of the orchestrator. Without a connection attempt it is `Scanning` or `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    DeviceSelected,
    FeaturesFetched,
    NeedsVerification,
    NeedsActivation,
    ReadyToCreate,
    WalletCreated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingEvent {
    StatusChanged(ConnectionStatus),
    DevicesChanged(Vec<DiscoveredDevice>),
    SearchingChanged(bool),
    CheckingChanged(bool),
    PhaseChanged(Phase),
    Toast(Toast),
    Prompt(Prompt),
    ShowBootloaderMode { connect_id: Option<String> },
    Navigate(Page),
}

/// How a device selection ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    WalletCreated,
    ActivationStarted(TutorialType),
    ActivationDismissed,
    VerificationDismissed,
    // the attempt was abandoned while waiting on the device
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStart {
    Started,
    AlreadyScanning,
    CheckInProgress,
    NotReady(crate::error::GateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateWalletFlags {
    // onboarding shows its own progress page instead
    pub hide_checking_device_loading: bool,
    // wallet creation talks to the device more than once
    pub skip_device_cancel: bool,
    pub is_firmware_verified: Option<bool>,
}

impl CreateWalletFlags {
    pub fn onboarding(is_firmware_verified: Option<bool>) -> Self {
        CreateWalletFlags {
            hide_checking_device_loading: true,
            skip_device_cancel: true,
            is_firmware_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingUrls {
    pub bridge_download_url: String,
    pub contact_us_url: String,
}

impl Default for OnboardingUrls {
    fn default() -> Self {
        OnboardingUrls {
            bridge_download_url: HARDWARE_BRIDGE_DOWNLOAD_URL.to_string(),
            contact_us_url: format!("{}/{}", HELP_CENTER_URL, CONTACT_US_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSnapshot {
    pub status: ConnectionStatus,
    pub phase: Phase,
    pub devices: Vec<DiscoveredDevice>,
    pub searching: bool,
    pub checking: bool,
}
