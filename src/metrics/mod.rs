// metrics/mod.rs
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Expose counters (requests, timeouts, discovery probes) on a Prometheus
/// scrape endpoint. Counters are recorded unconditionally by the core; this
/// only wires up the exporter.
pub fn setup_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {e}"))
}
