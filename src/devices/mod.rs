// devices/mod.rs
mod udp_bulb;
pub use udp_bulb::UdpBulbClient;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::commands::{BulbCommand, BulbResponse};
use crate::discovery::{self, DiscoveryOptions, ScanRange};
use crate::error::BulbError;
use crate::models::{DeviceAddress, DeviceRecord};
use crate::registry::DeviceRegistry;
use crate::transport::Transport;

/// Entry point for the tool/voice layer. Holds the transport and registry;
/// all defaults (address, timeouts) are threaded in explicitly at
/// construction rather than read from ambient state.
pub struct BulbController {
    transport: Arc<dyn Transport>,
    registry: Arc<DeviceRegistry>,
    command_timeout: Duration,
}

impl BulbController {
    pub fn new(transport: Arc<dyn Transport>, command_timeout: Duration) -> Self {
        Self {
            transport,
            registry: Arc::new(DeviceRegistry::new()),
            command_timeout,
        }
    }

    /// One command round trip. Successful replies refresh the registry.
    pub async fn send_command(
        &self,
        address: &DeviceAddress,
        command: &BulbCommand,
        timeout: Duration,
    ) -> Result<BulbResponse, BulbError> {
        let response = self.transport.exchange(address, command, timeout).await?;
        match &response {
            BulbResponse::Ack => self.registry.upsert(address.clone(), None),
            BulbResponse::Status(status) => {
                self.registry.upsert(address.clone(), Some(status.clone()));
            }
            BulbResponse::Error { .. } | BulbResponse::Timeout => {}
        }
        Ok(response)
    }

    pub async fn discover(&self, range: &ScanRange, opts: &DiscoveryOptions) -> Vec<DeviceAddress> {
        discovery::discover_bulbs(self.transport.as_ref(), &self.registry, range, opts).await
    }

    /// Snapshot of every device ever observed responding.
    pub fn known_devices(&self) -> Vec<DeviceRecord> {
        self.registry.all()
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Per-device handle sharing this controller's transport and registry.
    pub fn client(&self, address: DeviceAddress) -> UdpBulbClient {
        info!(%address, "opening bulb client");
        UdpBulbClient::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.registry),
            address,
            self.command_timeout,
        )
    }
}
