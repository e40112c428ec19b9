use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::runtime::Runtime;
use tokio::time::{sleep, Duration};

use crate::config::io::ConfigIO;
use crate::config::types::Config;
use crate::device::ble::{BtleRadio, BtleScanner};
use crate::device::classify::{classify, scan_error_action, RawTransportError};
use crate::device::features::{device_mode_from_features, device_type_from_features};
use crate::device::permission::{BluetoothGate, NoRuntimePermissions};
use crate::device::types::{DeviceFeatures, DeviceType, DiscoveredDevice, TransportKind};
use crate::error::{AppRunError, DeviceError};
use crate::onboarding::capabilities::{Capabilities, HardwareService, OnboardingFlows};
use crate::onboarding::links::SystemLinkOpener;
use crate::onboarding::types::{
    ActivationChoice, CreateWalletFlags, OnboardingEvent, Phase, RestoreWarningChoice, ScanStart,
};
use crate::onboarding::Orchestrator;

#[derive(Parser, Debug)]
#[command(name = "hw-connect", version, about = "Find and inspect OneKey hardware wallets")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for hardware wallets over bluetooth and print every scan tick
    Scan {
        #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
        duration: Duration,

        /// Open the settings page or download link a prompt points at
        #[arg(long)]
        open_prompts: bool,
    },
    /// Check that bluetooth permissions are granted and the radio is on
    CheckBluetooth,
    /// Classify a transport error payload such as '{"code": 812, "error": "Need bridge"}'
    Classify {
        payload: String,

        /// Transport the error came from (usb or bluetooth), defaults to the configured platform's
        #[arg(long, value_parser = parse_transport)]
        transport: Option<TransportKind>,
    },
    /// Print device type and mode of a device features JSON file
    Inspect {
        path: PathBuf,
    },
    /// Print the location and effective contents of the config file
    Config {
        /// Write the effective config back, filling in every default
        #[arg(long)]
        write_defaults: bool,
    },
}

fn parse_transport(value: &str) -> Result<TransportKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "usb" => Ok(TransportKind::Usb),
        "bluetooth" | "ble" => Ok(TransportKind::Bluetooth),
        other => Err(format!("unknown transport '{}', expected usb or bluetooth", other)),
    }
}

/// Hardware and user flows of the CLI, which lists devices but never connects one.
struct ListOnly;

#[async_trait]
impl HardwareService for ListOnly {
    async fn connect(&self, _device: &DiscoveredDevice) -> Result<Option<DeviceFeatures>, DeviceError> {
        Err(DeviceError::Unsupported)
    }

    async fn should_authenticate_firmware(&self, _device: &DiscoveredDevice) -> bool {
        false
    }

    async fn create_hw_wallet(
        &self,
        _device: &DiscoveredDevice,
        _features: &DeviceFeatures,
        _flags: CreateWalletFlags,
    ) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported)
    }

    async fn close_ui_state_dialog(&self, _connect_id: &str) -> Result<(), DeviceError> {
        Ok(())
    }
}

#[async_trait]
impl OnboardingFlows for ListOnly {
    async fn verify_firmware(&self, _device: &DiscoveredDevice) -> Option<bool> {
        None
    }

    async fn choose_activation(&self, _device_type: DeviceType) -> Option<ActivationChoice> {
        None
    }

    async fn confirm_restore(&self, _device_type: DeviceType) -> RestoreWarningChoice {
        RestoreWarningChoice::Dismiss
    }
}

fn runtime() -> Result<Runtime, AppRunError> {
    Runtime::new().map_err(|source| AppRunError::Runtime { source })
}

fn open_config(path: Option<PathBuf>) -> Result<ConfigIO, AppRunError> {
    Ok(ConfigIO::open_sync(path)?)
}

fn gate(config: &Config) -> BluetoothGate {
    BluetoothGate::new(config.platform(), Arc::new(NoRuntimePermissions), Arc::new(BtleRadio))
}

fn orchestrator(config: &Config) -> Orchestrator {
    let capabilities = Capabilities {
        scanner: Arc::new(BtleScanner::new(config.service_uuid(), config.scan_tick())),
        gate: Some(Arc::new(gate(config))),
        hardware: Arc::new(ListOnly),
        flows: Arc::new(ListOnly),
        links: Arc::new(SystemLinkOpener::new(config.platform())),
    };
    Orchestrator::new(capabilities, config.urls())
}

async fn check_bluetooth(config: Config) -> Result<(), AppRunError> {
    gate(&config).ensure_bluetooth_ready().await?;
    println!("bluetooth is ready");
    Ok(())
}

/// Prints one orchestrator event. Returns false once the scan session is over.
async fn print_event(orchestrator: &Orchestrator, event: OnboardingEvent, open_prompts: bool) -> bool {
    match event {
        OnboardingEvent::DevicesChanged(devices) => {
            println!("{} device(s)", devices.len());
            for device in devices {
                println!("  {:<20} {:<10} {}", device.name, device.device_type, device.connection_id());
            }
        },
        OnboardingEvent::Toast(toast) => {
            println!("error: {} {}", toast.title, toast.message.unwrap_or_default());
        },
        OnboardingEvent::Prompt(prompt) => {
            println!("action needed: {:?} {}", prompt.kind, prompt.description.as_deref().unwrap_or(""));
            if open_prompts {
                if let Err(err) = orchestrator.accept_prompt(&prompt).await {
                    warn!("Failed to open {:?}: {}", prompt.action, err);
                }
            }
        },
        OnboardingEvent::PhaseChanged(Phase::Idle) => return false,
        other => debug!("{:?}", other),
    }
    true
}

async fn scan(config: Config, duration: Duration, open_prompts: bool) -> Result<(), AppRunError> {
    let orchestrator = orchestrator(&config);
    let mut events = orchestrator.subscribe();

    if let ScanStart::NotReady(err) = orchestrator.start_scan().await? {
        while let Ok(Some(event)) = events.try_next() {
            print_event(&orchestrator, event, open_prompts).await;
        }
        return Err(err.into());
    }

    let deadline = sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.next() => match event {
                Some(event) => {
                    if !print_event(&orchestrator, event, open_prompts).await {
                        info!("Scan ended before the deadline");
                        break;
                    }
                },
                None => break,
            },
        }
    }

    orchestrator.shutdown();
    // give the scan task a moment to stop the adapters
    sleep(config.scan_tick().min(Duration::from_millis(500))).await;
    Ok(())
}

fn classify_payload(payload: &str, transport: TransportKind) -> Result<(), AppRunError> {
    let raw: RawTransportError = serde_json::from_str(payload)?;
    let kind = classify(&raw);
    let action = scan_error_action(kind, transport);

    println!("kind:      {:?}", kind);
    println!("transport: {:?}", transport);
    println!("notice:    {:?}", action.notice);
    println!("stop scan: {}", action.stop_scan);
    Ok(())
}

fn inspect_features(path: &PathBuf) -> Result<(), AppRunError> {
    let content = fs::read_to_string(path).map_err(|source| AppRunError::Input { source })?;
    let features: DeviceFeatures = serde_json::from_str(&content)?;

    println!("type: {}", device_type_from_features(&features));
    println!("mode: {:?}", device_mode_from_features(&features));
    Ok(())
}

async fn show_config(config_io: &ConfigIO, write_defaults: bool) -> Result<(), AppRunError> {
    let config = config_io.read().await?;

    println!("file:     {} ({:?})", config_io.path().to_string_lossy(), config_io.location());
    println!("platform: {:?}", config.platform());
    println!("{}", serde_json::to_string_pretty(&config)?);

    if write_defaults {
        config_io.save(&config).await?;
    }
    Ok(())
}

pub fn run(cli: Cli) -> Result<(), AppRunError> {
    match cli.command {
        Command::Classify { payload, transport } => {
            let config_io = open_config(cli.config)?;
            let config = runtime()?.block_on(config_io.read())?;
            let transport = transport.unwrap_or_else(|| config.platform().scan_transport());
            classify_payload(&payload, transport)
        },
        Command::Inspect { path } => inspect_features(&path),
        Command::Config { write_defaults } => {
            let config_io = open_config(cli.config)?;
            let mut locker = config_io.locker()?;
            let _lock = locker.lock()?;

            runtime()?.block_on(show_config(&config_io, write_defaults))
        },
        Command::CheckBluetooth => {
            let config_io = open_config(cli.config)?;
            let runtime = runtime()?;
            runtime.block_on(async {
                let config = config_io.read().await?;
                check_bluetooth(config).await
            })
        },
        Command::Scan { duration, open_prompts } => {
            let config_io = open_config(cli.config)?;
            let mut locker = config_io.locker()?;
            // only one process scans at a time
            let _lock = locker.lock()?;

            let runtime = runtime()?;
            runtime.block_on(async {
                let config = config_io.read().await?;
                scan(config, duration, open_prompts).await
            })
        },
    }
}
