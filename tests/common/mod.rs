#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use tokio::sync::Notify;

use hw_connect::device::classify::RawTransportError;
use hw_connect::device::permission::{
    BluetoothGate, Permission, PermissionProvider, PermissionStatus, Platform, RadioProvider, RadioState,
};
use hw_connect::device::scanner::{DeviceScanner, ScanHandle, ScanSink};
use hw_connect::device::types::{DeviceFeatures, DeviceType, DiscoveredDevice, TransportKind};
use hw_connect::error::{DeviceError, LinkOpenError};
use hw_connect::onboarding::capabilities::{Capabilities, HardwareService, LinkOpener, OnboardingFlows};
use hw_connect::onboarding::types::{
    ActivationChoice, CreateWalletFlags, OnboardingEvent, OnboardingUrls, RestoreWarningChoice, SettingsTarget,
};
use hw_connect::onboarding::Orchestrator;

pub struct FakeScanHandle {
    stops: Arc<AtomicUsize>,
    stopped: bool,
}

impl ScanHandle for FakeScanHandle {
    fn stop_scan(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct FakeScanner {
    transport: TransportKind,
    sinks: Mutex<Vec<Arc<dyn ScanSink>>>,
    pub stops: Arc<AtomicUsize>,
}

impl FakeScanner {
    pub fn new(transport: TransportKind) -> Self {
        FakeScanner { transport, sinks: Mutex::new(Vec::new()), stops: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn starts(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Sink handed to the scanner by the n-th `start_device_scan` call.
    pub fn sink(&self, index: usize) -> Arc<dyn ScanSink> {
        self.sinks.lock().unwrap()[index].clone()
    }

    pub fn latest_sink(&self) -> Arc<dyn ScanSink> {
        self.sinks.lock().unwrap().last().expect("scan was never started").clone()
    }
}

impl DeviceScanner for FakeScanner {
    fn transport(&self) -> TransportKind {
        self.transport
    }

    fn start_device_scan(&self, sink: Arc<dyn ScanSink>) -> Result<Box<dyn ScanHandle>, DeviceError> {
        self.sinks.lock().unwrap().push(sink);
        Ok(Box::new(FakeScanHandle { stops: self.stops.clone(), stopped: false }))
    }
}

#[derive(Default)]
pub struct FakeHardware {
    pub features: Mutex<Option<DeviceFeatures>>,
    pub connect_error: Mutex<Option<RawTransportError>>,
    pub authenticate_firmware: AtomicBool,
    pub fail_creation: AtomicBool,
    pub hold_connect: AtomicBool,
    pub connect_entered: Notify,
    pub release_connect: Notify,
    pub hold_creation: AtomicBool,
    pub creation_entered: Notify,
    pub release_creation: Notify,
    pub connects: AtomicUsize,
    pub created: Mutex<Vec<CreateWalletFlags>>,
    pub closed: Mutex<Vec<String>>,
    pub qr_wallets: AtomicUsize,
}

impl FakeHardware {
    pub fn with_features(features: DeviceFeatures) -> Arc<Self> {
        let hardware = FakeHardware::default();
        *hardware.features.lock().unwrap() = Some(features);
        Arc::new(hardware)
    }

    pub fn creations(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl HardwareService for FakeHardware {
    async fn connect(&self, _device: &DiscoveredDevice) -> Result<Option<DeviceFeatures>, DeviceError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if self.hold_connect.load(Ordering::SeqCst) {
            self.connect_entered.notify_one();
            self.release_connect.notified().await;
        }

        if let Some(error) = self.connect_error.lock().unwrap().clone() {
            return Err(DeviceError::Transport { source: error });
        }
        Ok(self.features.lock().unwrap().clone())
    }

    async fn should_authenticate_firmware(&self, _device: &DiscoveredDevice) -> bool {
        self.authenticate_firmware.load(Ordering::SeqCst)
    }

    async fn create_hw_wallet(
        &self,
        _device: &DiscoveredDevice,
        _features: &DeviceFeatures,
        flags: CreateWalletFlags,
    ) -> Result<(), DeviceError> {
        self.created.lock().unwrap().push(flags);

        if self.hold_creation.load(Ordering::SeqCst) {
            self.creation_entered.notify_one();
            self.release_creation.notified().await;
        }

        if self.fail_creation.load(Ordering::SeqCst) {
            return Err(DeviceError::Transport { source: RawTransportError::new(802, "PIN cancelled") });
        }
        Ok(())
    }

    async fn close_ui_state_dialog(&self, connect_id: &str) -> Result<(), DeviceError> {
        self.closed.lock().unwrap().push(connect_id.to_string());
        Ok(())
    }

    async fn create_qr_wallet(&self, is_onboarding: bool) -> Result<(), DeviceError> {
        assert!(is_onboarding);
        self.qr_wallets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFlows {
    pub verify_answer: Mutex<Option<bool>>,
    pub activation_answer: Mutex<Option<ActivationChoice>>,
    pub restore_answers: Mutex<VecDeque<RestoreWarningChoice>>,
    pub verify_calls: AtomicUsize,
    pub activation_calls: AtomicUsize,
}

#[async_trait]
impl OnboardingFlows for FakeFlows {
    async fn verify_firmware(&self, _device: &DiscoveredDevice) -> Option<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.verify_answer.lock().unwrap()
    }

    async fn choose_activation(&self, _device_type: DeviceType) -> Option<ActivationChoice> {
        self.activation_calls.fetch_add(1, Ordering::SeqCst);
        *self.activation_answer.lock().unwrap()
    }

    async fn confirm_restore(&self, _device_type: DeviceType) -> RestoreWarningChoice {
        self.restore_answers.lock().unwrap().pop_front().unwrap_or(RestoreWarningChoice::Dismiss)
    }
}

#[derive(Default)]
pub struct FakeLinks {
    pub urls: Mutex<Vec<String>>,
    pub settings: Mutex<Vec<SettingsTarget>>,
}

#[async_trait]
impl LinkOpener for FakeLinks {
    async fn open_url(&self, url: &str) -> Result<(), LinkOpenError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn open_settings(&self, target: SettingsTarget) -> Result<(), LinkOpenError> {
        self.settings.lock().unwrap().push(target);
        Ok(())
    }
}

pub struct FakePermissions {
    pub status: PermissionStatus,
    pub requests: AtomicUsize,
}

impl FakePermissions {
    pub fn new(status: PermissionStatus) -> Arc<Self> {
        Arc::new(FakePermissions { status, requests: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl PermissionProvider for FakePermissions {
    async fn check(&self, _permission: Permission) -> PermissionStatus {
        self.status
    }

    async fn request(&self, permissions: &[Permission]) -> HashMap<Permission, PermissionStatus> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        permissions.iter().map(|permission| (*permission, self.status)).collect()
    }
}

pub struct FakeRadio(pub RadioState);

/// Radio that only answers once released, keeping the gate check suspended.
#[derive(Default)]
pub struct HeldRadio {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl RadioProvider for HeldRadio {
    async fn radio_state(&self) -> RadioState {
        self.entered.notify_one();
        self.release.notified().await;
        RadioState::On
    }
}

#[async_trait]
impl RadioProvider for FakeRadio {
    async fn radio_state(&self) -> RadioState {
        self.0
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub events: UnboundedReceiver<OnboardingEvent>,
    pub scanner: Arc<FakeScanner>,
    pub hardware: Arc<FakeHardware>,
    pub flows: Arc<FakeFlows>,
    pub links: Arc<FakeLinks>,
}

const ANDROID_13: Platform = Platform::Android { api_level: 33 };

impl Harness {
    /// Desktop scanning over the USB bridge, without a bluetooth gate.
    pub fn desktop(hardware: Arc<FakeHardware>) -> Harness {
        Harness::build(TransportKind::Usb, None, hardware)
    }

    /// Desktop scanning over bluetooth, like the btleplug backend.
    pub fn desktop_bluetooth(hardware: Arc<FakeHardware>) -> Harness {
        Harness::build(TransportKind::Bluetooth, None, hardware)
    }

    pub fn android(permission: PermissionStatus, radio: RadioState, hardware: Arc<FakeHardware>) -> Harness {
        Harness::android_with_radio(permission, Arc::new(FakeRadio(radio)), hardware)
    }

    pub fn android_with_radio(
        permission: PermissionStatus,
        radio: Arc<dyn RadioProvider>,
        hardware: Arc<FakeHardware>,
    ) -> Harness {
        let gate = BluetoothGate::new(ANDROID_13, FakePermissions::new(permission), radio);
        Harness::build(TransportKind::Bluetooth, Some(Arc::new(gate)), hardware)
    }

    fn build(transport: TransportKind, gate: Option<Arc<BluetoothGate>>, hardware: Arc<FakeHardware>) -> Harness {
        let scanner = Arc::new(FakeScanner::new(transport));
        let flows = Arc::new(FakeFlows::default());
        let links = Arc::new(FakeLinks::default());

        let orchestrator = Orchestrator::new(
            Capabilities {
                scanner: scanner.clone(),
                gate,
                hardware: hardware.clone(),
                flows: flows.clone(),
                links: links.clone(),
            },
            OnboardingUrls::default(),
        );
        let events = orchestrator.subscribe();

        Harness { orchestrator, events, scanner, hardware, flows, links }
    }

    pub fn drain(&mut self) -> Vec<OnboardingEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.events.try_next() {
            events.push(event);
        }
        events
    }
}

pub fn device(connect_id: &str) -> DiscoveredDevice {
    DiscoveredDevice {
        connect_id: Some(connect_id.to_string()),
        uuid: format!("uuid-{}", connect_id),
        name: format!("K{}", connect_id),
        device_type: DeviceType::Classic,
        transport: TransportKind::Usb,
        bootloader_mode: false,
    }
}

pub fn normal_features() -> DeviceFeatures {
    DeviceFeatures {
        initialized: true,
        onekey_device_type: Some("PRO".to_string()),
        ..Default::default()
    }
}
