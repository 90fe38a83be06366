// udp_bulb.rs
//
// Convenience operations against one bulb; successful exchanges refresh the
// registry.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::commands::{self, BulbCommand, BulbResponse};
use crate::error::BulbError;
use crate::models::{DeviceAddress, DeviceStatus};
use crate::registry::DeviceRegistry;
use crate::transport::Transport;

pub struct UdpBulbClient {
    transport: Arc<dyn Transport>,
    registry: Arc<DeviceRegistry>,
    address: DeviceAddress,
    timeout: Duration,
}

impl UdpBulbClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<DeviceRegistry>,
        address: DeviceAddress,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            registry,
            address,
            timeout,
        }
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub async fn send(&self, command: &BulbCommand) -> Result<BulbResponse, BulbError> {
        let response = self
            .transport
            .exchange(&self.address, command, self.timeout)
            .await?;
        match &response {
            BulbResponse::Ack => self.registry.upsert(self.address.clone(), None),
            BulbResponse::Status(status) => {
                self.registry
                    .upsert(self.address.clone(), Some(status.clone()));
            }
            BulbResponse::Error { .. } | BulbResponse::Timeout => {}
        }
        Ok(response)
    }

    pub async fn turn_on(&self) -> Result<BulbResponse, BulbError> {
        info!(address = %self.address, "turning bulb on");
        self.send(&BulbCommand::PowerOn).await
    }

    pub async fn turn_off(&self) -> Result<BulbResponse, BulbError> {
        info!(address = %self.address, "turning bulb off");
        self.send(&BulbCommand::PowerOff).await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<BulbResponse, BulbError> {
        let command = BulbCommand::set_brightness(brightness)?;
        info!(address = %self.address, brightness, "setting brightness");
        self.send(&command).await
    }

    pub async fn set_color(&self, r: u8, g: u8, b: u8) -> Result<BulbResponse, BulbError> {
        info!(address = %self.address, r, g, b, "setting color");
        self.send(&BulbCommand::set_color(r, g, b)).await
    }

    /// Accepts `#RRGGBB` with the `#` optional; validation happens before
    /// anything touches the network.
    pub async fn set_color_hex(&self, hex: &str) -> Result<BulbResponse, BulbError> {
        let [r, g, b] = commands::parse_hex_color(hex)?;
        self.set_color(r, g, b).await
    }

    /// Fresh status from the device, or `None` if it timed out or answered
    /// with an error.
    pub async fn status(&self) -> Result<Option<DeviceStatus>, BulbError> {
        match self.send(&BulbCommand::GetStatus).await? {
            BulbResponse::Status(status) => Ok(Some(status)),
            _ => Ok(None),
        }
    }

    pub async fn ping(&self) -> Result<bool, BulbError> {
        let response = self.send(&BulbCommand::Ping).await?;
        Ok(response.is_success())
    }
}
