//! Desktop bluetooth backend for the scanner and radio capabilities, built on btleplug.

use std::sync::Arc;
use async_trait::async_trait;
use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager};
use indexmap::IndexMap;
use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::device::classify::{codes, RawTransportError};
use crate::device::features::device_type_from_ble_name;
use crate::device::permission::{RadioProvider, RadioState};
use crate::device::scanner::{DeviceScanner, ScanEvent, ScanHandle, ScanSink};
use crate::device::types::{DiscoveredDevice, ScanState, TransportKind};
use crate::error::DeviceError;

async fn start_scanning(manager: &Manager, service: Uuid) -> Result<Vec<Adapter>, DeviceError> {
    let adapters = manager.adapters().await?;
    if adapters.is_empty() {
        return Err(DeviceError::NoAdapter);
    }

    let filter = ScanFilter {
        services: vec![service],
    };

    for adapter in &adapters {
        info!("Scanning using adapter {}...", adapter.adapter_info().await.unwrap_or("UNKNOWN".to_string()));
        adapter.start_scan(filter.clone()).await?;
    }

    Ok(adapters)
}

async fn find_devices(adapters: &[Adapter], service: Uuid) -> Vec<DiscoveredDevice> {
    // the same peripheral may be seen by more than one adapter
    let mut devices: IndexMap<String, DiscoveredDevice> = IndexMap::new();

    for adapter in adapters {
        let peripherals = match adapter.peripherals().await {
            Ok(v) => v,
            Err(err) => {
                warn!("Failed to query BLE adapter for peripherals: {}", err);
                continue;
            },
        };

        for peripheral in peripherals {
            let properties = match peripheral.properties().await {
                Err(err) => {
                    warn!("Could not query peripheral for properties: {:?}", err);
                    continue;
                },
                Ok(None) => {
                    debug!("Peripheral has no properties");
                    continue;
                },
                Ok(Some(properties)) => properties,
            };

            // Some environments ignore the filter, so make sure to check the service uuid again
            if !properties.services.contains(&service) {
                continue;
            }

            let connect_id = format!("{:?}", peripheral.id());
            let name = properties.local_name.unwrap_or(String::from("Unknown"));

            devices.insert(connect_id.clone(), DiscoveredDevice {
                connect_id: Some(connect_id),
                uuid: properties.address.to_string(),
                device_type: device_type_from_ble_name(&name),
                name,
                transport: TransportKind::Bluetooth,
                bootloader_mode: false,
            });
        }
    }

    devices.into_values().collect()
}

fn scan_failure(err: &DeviceError) -> RawTransportError {
    let code = match err {
        DeviceError::Btle { source: btleplug::Error::PermissionDenied } => codes::BLE_PERMISSION_ERROR,
        DeviceError::NoAdapter => codes::BLE_UNSUPPORTED,
        _ => codes::BLE_SCAN_ERROR,
    };

    RawTransportError::new(code, err.to_string())
}

async fn scan_task(cancel: CancellationToken, sink: Arc<dyn ScanSink>, service: Uuid, tick: Duration) {
    sink.on_state_change(ScanState::Start);

    let manager = match Manager::new().await {
        Ok(manager) => Some(manager),
        Err(err) => {
            warn!("Failed to create bluetooth manager: {:?}", err);
            sink.on_event(ScanEvent::Failed(scan_failure(&DeviceError::from(err))));
            None
        },
    };

    let mut adapters: Option<Vec<Adapter>> = None;

    if let Some(manager) = &manager {
        'mainloop: loop {
            if adapters.is_none() {
                match start_scanning(manager, service).await {
                    Ok(started) => adapters = Some(started),
                    Err(err) => {
                        warn!("Scanning failed {:?}", err);
                        sink.on_event(ScanEvent::Failed(scan_failure(&err)));
                    },
                }
            }

            if let Some(adapters) = &adapters {
                let devices = find_devices(adapters, service).await;
                debug!("Scan tick found {} device(s)", devices.len());
                sink.on_event(ScanEvent::Devices(devices));
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    break 'mainloop;
                },
                _ = sleep(tick) => {},
            }
        }
    }

    for adapter in adapters.unwrap_or_default() {
        if let Err(err) = adapter.stop_scan().await {
            warn!("Failed to stop scanning: {:?}", err);
        }
    }

    sink.on_state_change(ScanState::Stop);
}

pub struct BtleScanHandle {
    cancel: CancellationToken,
}

impl ScanHandle for BtleScanHandle {
    fn stop_scan(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for BtleScanHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Scans every bluetooth adapter for peripherals advertising `service`, reporting the full list
/// once per `tick`.
pub struct BtleScanner {
    service: Uuid,
    tick: Duration,
}

impl BtleScanner {
    pub fn new(service: Uuid, tick: Duration) -> Self {
        BtleScanner { service, tick }
    }
}

impl DeviceScanner for BtleScanner {
    fn transport(&self) -> TransportKind {
        TransportKind::Bluetooth
    }

    fn start_device_scan(&self, sink: Arc<dyn ScanSink>) -> Result<Box<dyn ScanHandle>, DeviceError> {
        let runtime = Handle::try_current().map_err(|_| DeviceError::NoRuntime)?;
        let cancel = CancellationToken::new();

        runtime.spawn(scan_task(cancel.clone(), sink, self.service, self.tick));

        Ok(Box::new(BtleScanHandle { cancel }))
    }
}

pub struct BtleRadio;

#[async_trait]
impl RadioProvider for BtleRadio {
    async fn radio_state(&self) -> RadioState {
        let manager = match Manager::new().await {
            Ok(manager) => manager,
            Err(btleplug::Error::PermissionDenied) => return RadioState::Unauthorized,
            Err(err) => {
                warn!("Failed to create bluetooth manager: {:?}", err);
                return RadioState::Unknown;
            },
        };

        match manager.adapters().await {
            Ok(adapters) if adapters.is_empty() => RadioState::Off,
            Ok(_) => RadioState::On,
            Err(btleplug::Error::PermissionDenied) => RadioState::Unauthorized,
            Err(err) => {
                warn!("Failed to list bluetooth adapters: {:?}", err);
                RadioState::Unknown
            },
        }
    }
}
