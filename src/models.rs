use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BulbError;

/// Network location of a bulb. Equality and hashing are by (host, port).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress {
    pub host: String,
    pub port: u16,
}

impl DeviceAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, BulbError> {
        let host = host.into();
        if host.is_empty() {
            return Err(BulbError::Validation("host must not be empty".into()));
        }
        if port == 0 {
            return Err(BulbError::Validation("port must be 1-65535".into()));
        }
        Ok(Self { host, port })
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub power: bool,
    pub brightness: u8,
    pub color: [u8; 3],
}

/// Last observed truth about one bulb. Owned by the registry; a record exists
/// only after at least one successful response from its address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub address: DeviceAddress,
    pub last_status: Option<DeviceStatus>,
    pub last_seen: DateTime<Utc>,
}
