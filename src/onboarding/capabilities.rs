use std::sync::Arc;
use async_trait::async_trait;

use crate::device::permission::BluetoothGate;
use crate::device::scanner::DeviceScanner;
use crate::device::types::{DeviceFeatures, DeviceType, DiscoveredDevice};
use crate::error::{DeviceError, LinkOpenError};
use crate::onboarding::types::{ActivationChoice, CreateWalletFlags, RestoreWarningChoice, SettingsTarget};

/// Everything the orchestrator needs from the hardware SDK.
#[async_trait]
pub trait HardwareService: Send + Sync {
    /// `Ok(None)` means the transport connected but the device sent no features.
    async fn connect(&self, device: &DiscoveredDevice) -> Result<Option<DeviceFeatures>, DeviceError>;

    async fn should_authenticate_firmware(&self, device: &DiscoveredDevice) -> bool;

    async fn create_hw_wallet(
        &self,
        device: &DiscoveredDevice,
        features: &DeviceFeatures,
        flags: CreateWalletFlags,
    ) -> Result<(), DeviceError>;

    /// Releases the hardware UI state the SDK keeps per connection.
    async fn close_ui_state_dialog(&self, connect_id: &str) -> Result<(), DeviceError>;

    async fn create_qr_wallet(&self, _is_onboarding: bool) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported)
    }
}

/// Sub-flows that need an answer from the user.
#[async_trait]
pub trait OnboardingFlows: Send + Sync {
    /// Returns the state of the "verified" checkbox, or `None` if the dialog was dismissed.
    async fn verify_firmware(&self, device: &DiscoveredDevice) -> Option<bool>;

    async fn choose_activation(&self, device_type: DeviceType) -> Option<ActivationChoice>;

    async fn confirm_restore(&self, device_type: DeviceType) -> RestoreWarningChoice;
}

#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), LinkOpenError>;

    async fn open_settings(&self, target: SettingsTarget) -> Result<(), LinkOpenError>;
}

pub struct Capabilities {
    pub scanner: Arc<dyn DeviceScanner>,
    /// Required before bluetooth scans; wired platforms pass `None`.
    pub gate: Option<Arc<BluetoothGate>>,
    pub hardware: Arc<dyn HardwareService>,
    pub flows: Arc<dyn OnboardingFlows>,
    pub links: Arc<dyn LinkOpener>,
}
