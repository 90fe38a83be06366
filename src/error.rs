// error.rs
use thiserror::Error;

/// Failure taxonomy for the bulb control core. Timeouts and malformed
/// replies are `BulbResponse` variants, not errors.
#[derive(Error, Debug)]
pub enum BulbError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}
