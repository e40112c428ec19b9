use std::sync::Arc;

use crate::device::classify::RawTransportError;
use crate::device::types::{DiscoveredDevice, ScanState, TransportKind};
use crate::error::DeviceError;

/// One delivery of a scanner: the full device list of a tick, or the tick's failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Devices(Vec<DiscoveredDevice>),
    Failed(RawTransportError),
}

/// Receives the deliveries of exactly one scan session. Implementations are free to drop
/// deliveries that arrive after the session ended.
pub trait ScanSink: Send + Sync {
    fn on_event(&self, event: ScanEvent);

    fn on_state_change(&self, state: ScanState);
}

pub trait ScanHandle: Send {
    /// Stops delivering to the sink the scan was started with. Calling it twice is harmless.
    fn stop_scan(&mut self);
}

pub trait DeviceScanner: Send + Sync {
    /// Transport the scanner discovers devices over. Scan failures are handled per transport.
    fn transport(&self) -> TransportKind;

    fn start_device_scan(&self, sink: Arc<dyn ScanSink>) -> Result<Box<dyn ScanHandle>, DeviceError>;
}
