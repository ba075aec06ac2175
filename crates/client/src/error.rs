//! Client failure types.

use common::HttpErrorInfo;
use thiserror::Error;

/// The backend answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote returned status {status}: {}", self.message())]
pub struct RemoteFailure {
    /// Raw HTTP status code.
    pub status: u16,
    /// The backend's structured error record, when the body parsed as one.
    pub error: Option<HttpErrorInfo>,
    /// Raw response body.
    pub body: String,
}

impl RemoteFailure {
    /// Builds a failure from a status and raw body, parsing the error record if present.
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let error = serde_json::from_str::<HttpErrorInfo>(&body).ok();
        Self {
            status,
            error,
            body,
        }
    }

    /// Human-readable message: the backend's own message when it sent one.
    pub fn message(&self) -> String {
        match &self.error {
            Some(info) => info.message.clone(),
            None if !self.body.trim().is_empty() => self.body.clone(),
            None => format!("HTTP status {}", self.status),
        }
    }

    /// Path the backend reported for the failing request, if any.
    pub fn path(&self) -> Option<&str> {
        self.error.as_ref().map(|info| info.path.as_str())
    }
}

/// No usable response was obtained from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request body could not be encoded: {0}")]
    Encode(String),

    #[error("request to {url} failed: {reason}")]
    Other { url: String, reason: String },
}

/// Outcome of a failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

impl ClientError {
    /// Status code of a remote failure; `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote(failure) => Some(failure.status),
            ClientError::Transport(_) => None,
        }
    }
}

/// Result type for remote calls.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_structured_error_body() {
        let info = HttpErrorInfo::new("/product/13", 404, "No product found for productId: 13");
        let body = serde_json::to_string(&info).unwrap();

        let failure = RemoteFailure::from_body(404, body);
        assert_eq!(failure.message(), "No product found for productId: 13");
        assert_eq!(failure.path(), Some("/product/13"));
    }

    #[test]
    fn test_falls_back_to_raw_body() {
        let failure = RemoteFailure::from_body(500, "boom");
        assert!(failure.error.is_none());
        assert_eq!(failure.message(), "boom");
        assert_eq!(failure.path(), None);
    }

    #[test]
    fn test_empty_body_uses_status() {
        let failure = RemoteFailure::from_body(503, "");
        assert_eq!(failure.message(), "HTTP status 503");
    }

    #[test]
    fn test_status_only_for_remote_failures() {
        let remote: ClientError = RemoteFailure::from_body(422, "").into();
        let transport: ClientError = TransportFailure::Malformed("eof".to_string()).into();
        assert_eq!(remote.status(), Some(422));
        assert_eq!(transport.status(), None);
    }
}
