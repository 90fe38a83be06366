// lib.rs
pub mod commands;
pub mod config;
pub mod devices;
pub mod discovery;
pub mod error;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod transport;
pub mod voice;

pub use commands::{BulbCommand, BulbResponse};
pub use devices::{BulbController, UdpBulbClient};
pub use discovery::{DiscoveryOptions, ScanRange};
pub use error::BulbError;
pub use models::{DeviceAddress, DeviceRecord, DeviceStatus};
pub use registry::DeviceRegistry;
pub use transport::{Transport, UdpTransport};
