// discovery/mod.rs
//
// Best-effort ping sweep of an address/port range, bounded by an overall
// wall-clock budget; partial results are valid.

use futures_util::stream::{self, StreamExt};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info};

use crate::commands::{BulbCommand, BulbResponse};
use crate::models::DeviceAddress;
use crate::registry::DeviceRegistry;
use crate::transport::Transport;

/// Cross-product of candidate hosts and ports to probe.
#[derive(Debug, Clone)]
pub struct ScanRange {
    pub hosts: Vec<String>,
    pub ports: RangeInclusive<u16>,
}

impl ScanRange {
    pub fn new(hosts: Vec<String>, ports: RangeInclusive<u16>) -> Self {
        Self { hosts, ports }
    }

    /// Expand a `"a.b.c."` base into hosts `.1`-`.254`.
    pub fn subnet(base: &str, ports: RangeInclusive<u16>) -> Self {
        Self {
            hosts: (1u8..=254).map(|host| format!("{base}{host}")).collect(),
            ports,
        }
    }

    fn candidates(&self) -> Vec<DeviceAddress> {
        let mut candidates = Vec::new();
        for host in &self.hosts {
            for port in self.ports.clone() {
                if port == 0 {
                    continue;
                }
                candidates.push(DeviceAddress {
                    host: host.clone(),
                    port,
                });
            }
        }
        candidates
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub probe_timeout: Duration,
    pub overall_budget: Duration,
    /// Concurrent probes in flight.
    pub fan_out: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(500),
            overall_budget: Duration::from_secs(5),
            fan_out: 64,
        }
    }
}

/// Probe every (host, port) candidate and return the addresses that answered
/// with `Ack` or `Status`. Each responder is upserted into the registry.
pub async fn discover_bulbs(
    transport: &dyn Transport,
    registry: &DeviceRegistry,
    range: &ScanRange,
    opts: &DiscoveryOptions,
) -> Vec<DeviceAddress> {
    let candidates = range.candidates();
    info!(
        candidates = candidates.len(),
        fan_out = opts.fan_out,
        "scanning for bulbs"
    );

    let mut found = Vec::new();
    let sweep = async {
        let mut probes = stream::iter(candidates)
            .map(|address| async move {
                metrics::counter!("bulb_discovery_probes_total").increment(1);
                match transport
                    .exchange(&address, &BulbCommand::Ping, opts.probe_timeout)
                    .await
                {
                    Ok(BulbResponse::Ack) => Some((address, None)),
                    Ok(BulbResponse::Status(status)) => Some((address, Some(status))),
                    Ok(_) => None,
                    Err(e) => {
                        debug!(%address, error = %e, "probe failed");
                        None
                    }
                }
            })
            .buffer_unordered(opts.fan_out.max(1));

        while let Some(hit) = probes.next().await {
            if let Some((address, status)) = hit {
                info!(%address, "discovered bulb");
                metrics::counter!("bulb_discovery_responders_total").increment(1);
                registry.upsert(address.clone(), status);
                found.push(address);
            }
        }
    };

    if tokio::time::timeout(opts.overall_budget, sweep).await.is_err() {
        debug!("discovery budget expired, returning partial results");
    }

    info!(found = found.len(), "discovery finished");
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subnet_expands_to_254_hosts() {
        let range = ScanRange::subnet("192.168.1.", 4000..=4010);
        assert_eq!(range.hosts.len(), 254);
        assert_eq!(range.hosts[0], "192.168.1.1");
        assert_eq!(range.hosts[253], "192.168.1.254");
        assert_eq!(range.candidates().len(), 254 * 11);
    }

    #[test]
    fn candidates_skip_port_zero() {
        let range = ScanRange::new(vec!["127.0.0.1".into()], 0..=2);
        assert_eq!(range.candidates().len(), 2);
    }
}
