//! Drives a hardware wallet from "not found yet" to "wallet created".
//!
//! All state lives behind one mutex that is never held across an await. Every operation that
//! awaits an external capability marks itself busy first, so overlapping triggers of the same
//! operation are turned away instead of queued. Scan deliveries are bound to the session that
//! started them; deliveries of a session that is no longer current are dropped.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use log::{debug, info, warn};
use tokio::runtime::Handle;

use crate::device::classify::{classify, scan_error_action, RawTransportError, ScanNotice};
use crate::device::constants::{DEFAULT_BRIDGE_DESCRIPTION, DEFAULT_SCAN_ERROR_MESSAGE};
use crate::device::features::{
    device_mode_from_features, is_bootloader_by_features, is_bootloader_from_discovery, resolve_device_type,
};
use crate::device::scanner::{ScanEvent, ScanHandle, ScanSink};
use crate::device::types::{ConnectionStatus, DeviceFeatures, DeviceMode, DeviceType, DiscoveredDevice, ScanState};
use crate::error::{FlowError, GateError, LinkOpenError};
use crate::onboarding::capabilities::{Capabilities, HardwareService};
use crate::onboarding::types::{
    ActivationChoice, CreateWalletFlags, FlowOutcome, OnboardingEvent, OnboardingSnapshot, OnboardingUrls, Page,
    Phase, Prompt, PromptAction, RestoreWarningChoice, ScanStart, SettingsTarget, Toast, ToastKind, TutorialType,
};

struct ActiveScan {
    session: u64,
    // None until the scanner returned its handle
    handle: Option<Box<dyn ScanHandle>>,
}

struct Attempt {
    id: u64,
    phase: Phase,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    BluetoothCheck,
    WalletCreation,
    QrWalletCreation,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::BluetoothCheck => "bluetooth check",
            Operation::WalletCreation => "wallet creation",
            Operation::QrWalletCreation => "QR wallet creation",
        }
    }
}

struct OrchestratorState {
    status: ConnectionStatus,
    last_session: u64,
    scan: Option<ActiveScan>,
    devices: Vec<DiscoveredDevice>,
    searching: bool,
    checking: bool,
    creating_wallet: bool,
    creating_qr_wallet: bool,
    last_attempt: u64,
    attempt: Option<Attempt>,
    wallet_created: bool,
}

impl OrchestratorState {
    fn new() -> Self {
        OrchestratorState {
            status: ConnectionStatus::Init,
            last_session: 0,
            scan: None,
            devices: Vec::new(),
            searching: false,
            checking: false,
            creating_wallet: false,
            creating_qr_wallet: false,
            last_attempt: 0,
            attempt: None,
            wallet_created: false,
        }
    }

    fn is_current_session(&self, session: u64) -> bool {
        matches!(&self.scan, Some(scan) if scan.session == session)
    }

    fn is_current_attempt(&self, id: u64) -> bool {
        matches!(&self.attempt, Some(attempt) if attempt.id == id)
    }

    fn phase(&self) -> Phase {
        match &self.attempt {
            Some(attempt) => attempt.phase,
            None if self.wallet_created => Phase::WalletCreated,
            None if self.scan.is_some() => Phase::Scanning,
            None => Phase::Idle,
        }
    }

    fn busy_flag(&mut self, operation: Operation) -> &mut bool {
        match operation {
            Operation::BluetoothCheck => &mut self.checking,
            Operation::WalletCreation => &mut self.creating_wallet,
            Operation::QrWalletCreation => &mut self.creating_qr_wallet,
        }
    }

    /// Ends the current scan session and hands back its handle so the caller can stop it
    /// outside the lock.
    fn end_scan(&mut self) -> Option<Box<dyn ScanHandle>> {
        let scan = self.scan.take()?;
        self.searching = false;
        scan.handle
    }
}

struct Shared {
    capabilities: Capabilities,
    urls: OnboardingUrls,
    state: Mutex<OrchestratorState>,
    subscribers: Mutex<Vec<UnboundedSender<OnboardingEvent>>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            if let Some(mut handle) = state.end_scan() {
                handle.stop_scan();
            }
        }
    }
}

/// Clears an operation's busy flag when the operation ends, including when its future is dropped.
struct BusyGuard<'a> {
    orchestrator: &'a Orchestrator,
    operation: Operation,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.orchestrator.lock_state().busy_flag(self.operation) = false;
    }
}

/// Ends a connection attempt when `select_device` returns or is dropped.
struct AttemptGuard<'a> {
    orchestrator: &'a Orchestrator,
    id: u64,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let phase = {
            let mut state = self.orchestrator.lock_state();
            if !state.is_current_attempt(self.id) {
                return;
            }
            state.attempt = None;
            state.phase()
        };
        self.orchestrator.emit(vec![OnboardingEvent::PhaseChanged(phase)]);
    }
}

/// Closes the SDK's UI state for a connection. Dropping the guard without calling `release`
/// still closes it, on a background task.
struct UiStateDialogGuard {
    hardware: Arc<dyn HardwareService>,
    connect_id: Option<String>,
}

impl UiStateDialogGuard {
    fn new(hardware: Arc<dyn HardwareService>, connect_id: &str) -> Self {
        UiStateDialogGuard { hardware, connect_id: Some(connect_id.to_string()) }
    }

    async fn release(mut self) {
        if let Some(connect_id) = self.connect_id.take() {
            close_ui_state_dialog(self.hardware.clone(), connect_id).await;
        }
    }
}

impl Drop for UiStateDialogGuard {
    fn drop(&mut self) {
        if let Some(connect_id) = self.connect_id.take() {
            match Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(close_ui_state_dialog(self.hardware.clone(), connect_id));
                },
                Err(_) => warn!("Could not close hardware UI state of {} without a runtime", connect_id),
            }
        }
    }
}

async fn close_ui_state_dialog(hardware: Arc<dyn HardwareService>, connect_id: String) {
    if let Err(err) = hardware.close_ui_state_dialog(&connect_id).await {
        warn!("Failed to close hardware UI state dialog of {}: {}", connect_id, err);
    }
}

/// Delivers scanner callbacks of one session into the orchestrator.
struct SessionSink {
    session: u64,
    shared: Weak<Shared>,
}

impl SessionSink {
    fn orchestrator(&self) -> Option<Orchestrator> {
        self.shared.upgrade().map(|shared| Orchestrator { shared })
    }
}

impl ScanSink for SessionSink {
    fn on_event(&self, event: ScanEvent) {
        match self.orchestrator() {
            Some(orchestrator) => orchestrator.handle_scan_event(self.session, event),
            None => debug!("Dropping scan event of session {}, orchestrator is gone", self.session),
        }
    }

    fn on_state_change(&self, state: ScanState) {
        if let Some(orchestrator) = self.orchestrator() {
            orchestrator.handle_scanner_state(self.session, state);
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    pub fn new(capabilities: Capabilities, urls: OnboardingUrls) -> Self {
        Orchestrator {
            shared: Arc::new(Shared {
                capabilities,
                urls,
                state: Mutex::new(OrchestratorState::new()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.shared.state.lock().expect("Failed to lock orchestrator state")
    }

    fn emit(&self, events: Vec<OnboardingEvent>) {
        if events.is_empty() {
            return;
        }

        let mut subscribers = self.shared.subscribers.lock().expect("Failed to lock orchestrator subscribers");
        for event in events {
            subscribers.retain(|subscriber| subscriber.unbounded_send(event.clone()).is_ok());
        }
    }

    fn emit_one(&self, event: OnboardingEvent) {
        self.emit(vec![event]);
    }

    pub fn subscribe(&self) -> UnboundedReceiver<OnboardingEvent> {
        let (sender, receiver) = unbounded();
        self.shared.subscribers.lock().expect("Failed to lock orchestrator subscribers").push(sender);
        receiver
    }

    pub fn snapshot(&self) -> OnboardingSnapshot {
        let state = self.lock_state();
        OnboardingSnapshot {
            status: state.status,
            phase: state.phase(),
            devices: state.devices.clone(),
            searching: state.searching,
            checking: state.checking,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase()
    }

    pub fn devices(&self) -> Vec<DiscoveredDevice> {
        self.lock_state().devices.clone()
    }

    fn try_begin(&self, operation: Operation) -> Result<BusyGuard<'_>, FlowError> {
        let mut state = self.lock_state();
        let flag = state.busy_flag(operation);
        if *flag {
            debug!("Ignoring {} trigger, one is already running", operation.name());
            return Err(FlowError::Busy { operation: operation.name() });
        }
        *flag = true;
        Ok(BusyGuard { orchestrator: self, operation })
    }

    /// Runs the bluetooth gate (if the platform has one) and starts a scan session.
    pub async fn start_scan(&self) -> Result<ScanStart, FlowError> {
        if self.lock_state().scan.is_some() {
            return Ok(ScanStart::AlreadyScanning);
        }

        if let Some(gate) = self.shared.capabilities.gate.clone() {
            let guard = match self.try_begin(Operation::BluetoothCheck) {
                Ok(guard) => guard,
                Err(_) => return Ok(ScanStart::CheckInProgress),
            };
            self.set_status(ConnectionStatus::Searching, vec![OnboardingEvent::CheckingChanged(true)]);

            let ready = gate.ensure_bluetooth_ready().await;
            drop(guard);
            self.emit_one(OnboardingEvent::CheckingChanged(false));

            if let Err(err) = ready {
                self.set_status(ConnectionStatus::Init, vec![OnboardingEvent::Prompt(gate_prompt(err))]);
                return Ok(ScanStart::NotReady(err));
            }
        }

        self.begin_scan()
    }

    fn set_status(&self, status: ConnectionStatus, mut events: Vec<OnboardingEvent>) {
        let changed = {
            let mut state = self.lock_state();
            let changed = state.status != status;
            state.status = status;
            changed
        };

        if changed {
            events.insert(0, OnboardingEvent::StatusChanged(status));
        }
        self.emit(events);
    }

    fn begin_scan(&self) -> Result<ScanStart, FlowError> {
        let session = {
            let mut state = self.lock_state();
            if state.scan.is_some() {
                return Ok(ScanStart::AlreadyScanning);
            }

            state.last_session += 1;
            let session = state.last_session;
            state.scan = Some(ActiveScan { session, handle: None });
            state.devices.clear();
            state.status = ConnectionStatus::Listing;
            session
        };
        info!("Starting device scan session {}", session);
        self.emit(vec![
            OnboardingEvent::StatusChanged(ConnectionStatus::Listing),
            OnboardingEvent::DevicesChanged(Vec::new()),
            OnboardingEvent::PhaseChanged(self.phase()),
        ]);

        let sink = Arc::new(SessionSink { session, shared: Arc::downgrade(&self.shared) });

        match self.shared.capabilities.scanner.start_device_scan(sink) {
            Ok(handle) => {
                let stale = {
                    let mut state = self.lock_state();
                    match state.scan.as_mut() {
                        Some(scan) if scan.session == session => {
                            scan.handle = Some(handle);
                            None
                        },
                        _ => Some(handle),
                    }
                };

                // the session already ended while the scanner was starting
                if let Some(mut handle) = stale {
                    handle.stop_scan();
                }

                Ok(ScanStart::Started)
            },
            Err(source) => {
                warn!("Failed to start device scan: {}", source);
                {
                    let mut state = self.lock_state();
                    if state.is_current_session(session) {
                        state.end_scan();
                    }
                }
                self.emit(vec![
                    OnboardingEvent::SearchingChanged(false),
                    OnboardingEvent::PhaseChanged(self.phase()),
                ]);
                Err(FlowError::ScanStart { source })
            },
        }
    }

    /// Stops the current scan session. Deliveries that are still in flight are dropped.
    pub fn stop_scan(&self) {
        let handle = {
            let mut state = self.lock_state();
            if state.scan.is_none() {
                return;
            }
            state.end_scan()
        };

        info!("Device scan stopped");
        if let Some(mut handle) = handle {
            handle.stop_scan();
        }

        self.emit(vec![
            OnboardingEvent::SearchingChanged(false),
            OnboardingEvent::PhaseChanged(self.phase()),
        ]);
    }

    fn handle_scan_event(&self, session: u64, event: ScanEvent) {
        let mut events = Vec::new();

        let stopped = {
            let mut state = self.lock_state();
            if !state.is_current_session(session) {
                debug!("Discarding delivery of stale scan session {}", session);
                return;
            }

            match event {
                ScanEvent::Devices(devices) => {
                    debug!("Scan session {} delivered {} device(s)", session, devices.len());
                    state.devices = devices.clone();
                    events.push(OnboardingEvent::DevicesChanged(devices));
                    None
                },
                ScanEvent::Failed(raw) => {
                    let kind = classify(&raw);
                    let action = scan_error_action(kind, self.shared.capabilities.scanner.transport());
                    warn!("Scan session {} failed with {:?} ({}), stop: {}", session, kind, raw, action.stop_scan);

                    events.push(self.scan_notice_event(action.notice, &raw));

                    if action.stop_scan {
                        let handle = state.end_scan();
                        events.push(OnboardingEvent::SearchingChanged(false));
                        events.push(OnboardingEvent::PhaseChanged(state.phase()));
                        Some(handle)
                    } else {
                        None
                    }
                },
            }
        };

        if let Some(Some(mut handle)) = stopped {
            handle.stop_scan();
        }

        self.emit(events);
    }

    fn handle_scanner_state(&self, session: u64, scanner_state: ScanState) {
        let events = {
            let mut state = self.lock_state();
            if !state.is_current_session(session) {
                debug!("Discarding {:?} of stale scan session {}", scanner_state, session);
                return;
            }

            match scanner_state {
                ScanState::Start => {
                    state.searching = true;
                    vec![OnboardingEvent::SearchingChanged(true)]
                },
                ScanState::Stop => {
                    // the scanner gave up on its own, allow a new session
                    info!("Scanner stopped scan session {}", session);
                    state.end_scan();
                    vec![
                        OnboardingEvent::SearchingChanged(false),
                        OnboardingEvent::PhaseChanged(state.phase()),
                    ]
                },
            }
        };

        self.emit(events);
    }

    fn scan_notice_event(&self, notice: ScanNotice, raw: &RawTransportError) -> OnboardingEvent {
        let message = if raw.message.is_empty() {
            DEFAULT_SCAN_ERROR_MESSAGE.to_string()
        } else {
            raw.message.clone()
        };

        match notice {
            ScanNotice::ScanFailed => OnboardingEvent::Toast(Toast::error(ToastKind::ScanFailed, message, None)),
            ScanNotice::NetworkError => {
                OnboardingEvent::Toast(Toast::error(ToastKind::NetworkError, "Network error", Some(message)))
            },
            ScanNotice::ConnectionFailed => {
                OnboardingEvent::Toast(Toast::error(ToastKind::ConnectionFailed, "Connection failed", Some(message)))
            },
            ScanNotice::InstallBridge => {
                let description = if raw.message.is_empty() {
                    DEFAULT_BRIDGE_DESCRIPTION.to_string()
                } else {
                    raw.message.clone()
                };
                OnboardingEvent::Prompt(Prompt::install_bridge(description, self.shared.urls.bridge_download_url.clone()))
            },
            ScanNotice::BluetoothPermissionNeeded => OnboardingEvent::Prompt(Prompt::bluetooth_permission()),
            ScanNotice::EnableBluetooth => OnboardingEvent::Prompt(Prompt::enable_bluetooth()),
            ScanNotice::EnableLocation => OnboardingEvent::Prompt(Prompt::enable_location()),
        }
    }

    /// Runs the action of a prompt the user confirmed.
    pub async fn accept_prompt(&self, prompt: &Prompt) -> Result<(), LinkOpenError> {
        let links = self.shared.capabilities.links.clone();

        match &prompt.action {
            PromptAction::OpenUrl(url) => links.open_url(url).await,
            PromptAction::OpenSettings(target) => {
                if *target == SettingsTarget::App {
                    // the user may grant the permission there, let the gate ask again afterwards
                    if let Some(gate) = &self.shared.capabilities.gate {
                        gate.forget_prompts();
                    }
                }
                links.open_settings(*target).await
            },
        }
    }

    /// Abandons the running connection attempt. Results it still produces are discarded.
    pub fn cancel_attempt(&self) {
        let phase = {
            let mut state = self.lock_state();
            if state.attempt.take().is_none() {
                return;
            }
            state.phase()
        };

        info!("Connection attempt abandoned");
        self.emit_one(OnboardingEvent::PhaseChanged(phase));
    }

    fn advance(&self, id: u64, phase: Phase) -> bool {
        {
            let mut state = self.lock_state();
            match state.attempt.as_mut() {
                Some(attempt) if attempt.id == id => attempt.phase = phase,
                _ => return false,
            }
        }

        self.emit_one(OnboardingEvent::PhaseChanged(phase));
        true
    }

    fn is_current_attempt(&self, id: u64) -> bool {
        self.lock_state().is_current_attempt(id)
    }

    /// Connects the selected device and routes it to wallet creation, activation or an error.
    pub async fn select_device(&self, device: &DiscoveredDevice) -> Result<FlowOutcome, FlowError> {
        let id = {
            let mut state = self.lock_state();
            if state.attempt.is_some() {
                return Err(FlowError::Busy { operation: "device connection" });
            }

            if !state.devices.iter().any(|listed| listed.connect_id == device.connect_id) {
                return Err(FlowError::UnknownDevice { connect_id: device.connection_id().to_string() });
            }

            state.last_attempt += 1;
            let id = state.last_attempt;
            state.attempt = Some(Attempt { id, phase: Phase::DeviceSelected });
            state.wallet_created = false;
            id
        };

        info!("Connecting device {} ({})", device.name, device.connection_id());
        self.emit_one(OnboardingEvent::PhaseChanged(Phase::DeviceSelected));

        let _attempt = AttemptGuard { orchestrator: self, id };
        self.run_attempt(id, device).await
    }

    async fn run_attempt(&self, id: u64, device: &DiscoveredDevice) -> Result<FlowOutcome, FlowError> {
        let hardware = self.shared.capabilities.hardware.clone();
        let flows = self.shared.capabilities.flows.clone();

        if is_bootloader_from_discovery(device) {
            return Err(self.bootloader_mode(device));
        }

        let features = hardware.connect(device).await;
        if !self.is_current_attempt(id) {
            debug!("Discarding connect result of abandoned attempt {}", id);
            return Ok(FlowOutcome::Discarded);
        }

        let features = features
            .map_err(|source| FlowError::Connect { source })?
            .ok_or(FlowError::ConnectFailedNoFeatures)?;

        if !self.advance(id, Phase::FeaturesFetched) {
            return Ok(FlowOutcome::Discarded);
        }

        if is_bootloader_by_features(device, &features) {
            return Err(self.bootloader_mode(device));
        }

        let device_type = resolve_device_type(device, &features);
        let mode = device_mode_from_features(&features);
        debug!("Device {} is a {} in mode {:?}", device.connection_id(), device_type, mode);

        if mode == DeviceMode::BackupMode {
            self.emit_one(OnboardingEvent::Toast(Toast::error(ToastKind::BackupMode, "Device is in backup mode", None)));
            return Err(FlowError::BackupModeUnsupported);
        }

        if hardware.should_authenticate_firmware(device).await {
            if !self.advance(id, Phase::NeedsVerification) {
                return Ok(FlowOutcome::Discarded);
            }

            let checked = match flows.verify_firmware(device).await {
                Some(checked) => checked,
                None => return Ok(FlowOutcome::VerificationDismissed),
            };

            if mode == DeviceMode::NotInitialized {
                debug!("Ignoring firmware verification result of an unactivated device");
                return self.activate(id, device_type).await;
            }

            return self.create_wallet_for_attempt(id, device, &features, Some(checked)).await;
        }

        if mode == DeviceMode::NotInitialized {
            return self.activate(id, device_type).await;
        }

        self.create_wallet_for_attempt(id, device, &features, None).await
    }

    fn bootloader_mode(&self, device: &DiscoveredDevice) -> FlowError {
        warn!("Device {} is in bootloader mode", device.connection_id());
        self.emit(vec![
            OnboardingEvent::Toast(Toast::error(ToastKind::BootloaderMode, "Device is in bootloader mode", None)),
            OnboardingEvent::ShowBootloaderMode { connect_id: device.connect_id.clone() },
        ]);
        FlowError::BootloaderModeDetected
    }

    async fn activate(&self, id: u64, device_type: DeviceType) -> Result<FlowOutcome, FlowError> {
        if !self.advance(id, Phase::NeedsActivation) {
            return Ok(FlowOutcome::Discarded);
        }

        let flows = self.shared.capabilities.flows.clone();

        let tutorial = match flows.choose_activation(device_type).await {
            None => return Ok(FlowOutcome::ActivationDismissed),
            Some(ActivationChoice::SetupNewWallet) => TutorialType::Create,
            Some(ActivationChoice::Restore) => loop {
                match flows.confirm_restore(device_type).await {
                    RestoreWarningChoice::Continue => break TutorialType::Restore,
                    RestoreWarningChoice::Dismiss => return Ok(FlowOutcome::ActivationDismissed),
                    RestoreWarningChoice::ContactUs => {
                        let url = &self.shared.urls.contact_us_url;
                        if let Err(err) = self.shared.capabilities.links.open_url(url).await {
                            warn!("Failed to open {}: {}", url, err);
                        }
                    },
                }
            },
        };

        if !self.is_current_attempt(id) {
            return Ok(FlowOutcome::Discarded);
        }

        info!("Routing {} device to the {:?} tutorial", device_type, tutorial);
        self.emit_one(OnboardingEvent::Navigate(Page::ActivateDevice { device_type, tutorial }));
        Ok(FlowOutcome::ActivationStarted(tutorial))
    }

    async fn create_wallet_for_attempt(
        &self,
        id: u64,
        device: &DiscoveredDevice,
        features: &DeviceFeatures,
        is_firmware_verified: Option<bool>,
    ) -> Result<FlowOutcome, FlowError> {
        if !self.advance(id, Phase::ReadyToCreate) {
            return Ok(FlowOutcome::Discarded);
        }

        self.create_wallet(device, features, is_firmware_verified).await?;
        Ok(FlowOutcome::WalletCreated)
    }

    /// Creates the hardware wallet. The SDK's UI state for the device is closed afterwards whether
    /// or not creation succeeded. On failure the caller has to undo the navigation to the
    /// finalize page.
    pub async fn create_wallet(
        &self,
        device: &DiscoveredDevice,
        features: &DeviceFeatures,
        is_firmware_verified: Option<bool>,
    ) -> Result<(), FlowError> {
        let _busy = self.try_begin(Operation::WalletCreation)?;
        let hardware = self.shared.capabilities.hardware.clone();

        info!("Creating hardware wallet for {}", device.connection_id());
        self.emit_one(OnboardingEvent::Navigate(Page::FinalizeWalletSetup));

        let ui_state = UiStateDialogGuard::new(hardware.clone(), device.connection_id());
        let result = hardware
            .create_hw_wallet(device, features, CreateWalletFlags::onboarding(is_firmware_verified))
            .await;
        ui_state.release().await;

        // inside select_device the attempt guard reports the phase once the attempt ends
        let standalone_phase = {
            let mut state = self.lock_state();
            if result.is_ok() {
                state.wallet_created = true;
            }
            match state.attempt {
                None => Some(state.phase()),
                Some(_) => None,
            }
        };
        if let Some(phase) = standalone_phase {
            self.emit_one(OnboardingEvent::PhaseChanged(phase));
        }

        result.map_err(|source| {
            warn!("Failed to create hardware wallet: {}", source);
            FlowError::WalletCreation { source }
        })
    }

    /// Creates a wallet from a QR-code based device. On failure the caller undoes its navigation.
    pub async fn create_qr_wallet(&self) -> Result<(), FlowError> {
        let _busy = self.try_begin(Operation::QrWalletCreation)?;

        self.shared.capabilities.hardware
            .create_qr_wallet(true)
            .await
            .map_err(|source| FlowError::WalletCreation { source })
    }

    /// Stops scanning and abandons any attempt. Call before dropping the last handle.
    pub fn shutdown(&self) {
        self.stop_scan();
        self.cancel_attempt();
    }
}

fn gate_prompt(error: GateError) -> Prompt {
    match error {
        GateError::PermissionDenied => Prompt::bluetooth_permission(),
        GateError::RadioOff => Prompt::enable_bluetooth(),
    }
}
