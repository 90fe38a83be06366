// transport/mod.rs
//
// One UDP round trip per call; the socket is bound per exchange and dropped
// on every return path.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{UdpSocket, lookup_host};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::commands::{self, BulbCommand, BulbResponse};
use crate::error::BulbError;
use crate::models::DeviceAddress;

/// Replies larger than one datagram are out of protocol scope.
const MAX_DATAGRAM: usize = 2048;

/// One retransmission after a timeout; a reply of any kind ends the exchange.
const MAX_ATTEMPTS: u32 = 2;

/// Seam between the command layer and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(
        &self,
        address: &DeviceAddress,
        command: &BulbCommand,
        timeout: Duration,
    ) -> Result<BulbResponse, BulbError>;
}

#[derive(Debug, Default)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }

    async fn resolve(address: &DeviceAddress) -> Result<SocketAddr, BulbError> {
        lookup_host((address.host.as_str(), address.port))
            .await?
            .next()
            .ok_or_else(|| {
                BulbError::Network(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no route to {address}"),
                ))
            })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(
        &self,
        address: &DeviceAddress,
        command: &BulbCommand,
        timeout: Duration,
    ) -> Result<BulbResponse, BulbError> {
        let peer = Self::resolve(address).await?;
        let bind_addr = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).await?;

        let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let datagram = commands::encode(command, &request_id)?;

        metrics::counter!("bulb_udp_requests_total").increment(1);

        let mut buf = [0u8; MAX_DATAGRAM];
        for attempt in 1..=MAX_ATTEMPTS {
            socket.send_to(&datagram, peer).await?;
            let deadline = Instant::now() + timeout;

            loop {
                let received = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
                    Ok(result) => result?,
                    Err(_) => break, // attempt timed out
                };
                let (len, from) = received;
                if from != peer {
                    debug!(%address, %from, "ignoring datagram from unexpected peer");
                    continue;
                }
                let (reply_id, response) = commands::decode(&buf[..len]);
                if matches!(&response, BulbResponse::Error { reason } if reason == "malformed") {
                    // junk from the right peer carries no id to match
                    return Ok(response);
                }
                if reply_id.as_deref() != Some(request_id.as_str()) {
                    debug!(%address, ?reply_id, "ignoring reply with stale request id");
                    continue;
                }
                // A decoded reply, including Error, is never retried.
                return Ok(response);
            }

            if attempt < MAX_ATTEMPTS {
                debug!(%address, ?command, attempt, "no reply, retransmitting");
            }
        }

        metrics::counter!("bulb_udp_timeouts_total").increment(1);
        warn!(%address, ?command, "no reply after {MAX_ATTEMPTS} attempts");
        Ok(BulbResponse::Timeout)
    }
}
