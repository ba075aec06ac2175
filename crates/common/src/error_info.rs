//! Structured error body exchanged between services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error record emitted by every service's error handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpErrorInfo {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub http_status: u16,
    pub message: String,
}

impl HttpErrorInfo {
    /// Creates an error record stamped with the current time.
    pub fn new(path: impl Into<String>, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.into(),
            http_status,
            message: message.into(),
        }
    }
}
