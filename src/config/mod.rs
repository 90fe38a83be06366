// config/mod.rs
use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bulb: BulbSettings,
    pub discovery: DiscoverySettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Deserialize)]
pub struct BulbSettings {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl BulbSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscoverySettings {
    /// Subnet base like "192.168.1."; scanned hosts are .1-.254.
    pub subnet: String,
    pub port_start: u16,
    pub port_end: u16,
    pub probe_timeout_ms: u64,
    pub budget_ms: u64,
    pub fan_out: usize,
}

impl DiscoverySettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Settings {
    /// Defaults, overlaid by `config/config.*` when present, overlaid by
    /// `BULB_*` environment variables (e.g. `BULB_BULB__HOST`).
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bulb.host", "192.168.1.45")?
            .set_default("bulb.port", 4000)?
            .set_default("bulb.timeout_ms", 5000)?
            .set_default("discovery.subnet", "192.168.1.")?
            .set_default("discovery.port_start", 4000)?
            .set_default("discovery.port_end", 4010)?
            .set_default("discovery.probe_timeout_ms", 500)?
            .set_default("discovery.budget_ms", 5000)?
            .set_default("discovery.fan_out", 64)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9090)?
            .add_source(config::File::with_name("config/config").required(false))
            .add_source(config::Environment::with_prefix("BULB").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
