use std::error::Error;
use std::fmt;

use crate::infrastructure::api::ApiClientError;

/// Error type for the account aggregation pipeline
///
/// Only the failures listed here abort a run. Everything downstream of the
/// registry call (manifest misses, telemetry timeouts, absent chain data) is
/// absorbed into per-version defaults and never surfaces as an error.
#[derive(Debug)]
pub enum MonitorError {
    /// The account address is missing or malformed
    InvalidAccount(String),
    /// The registry query failed
    RegistryError(ApiClientError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::InvalidAccount(msg) => write!(f, "Invalid account: {}", msg),
            MonitorError::RegistryError(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl Error for MonitorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MonitorError::InvalidAccount(_) => None,
            MonitorError::RegistryError(e) => Some(e),
        }
    }
}

impl From<ApiClientError> for MonitorError {
    fn from(error: ApiClientError) -> Self {
        MonitorError::RegistryError(error)
    }
}
