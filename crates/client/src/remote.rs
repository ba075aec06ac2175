//! The remote call abstraction.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::address::ServiceAddress;
use crate::error::{ClientError, TransportFailure};

/// HTTP verbs used against the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call against one named backend.
///
/// Implementations report non-success statuses as
/// [`RemoteFailure`](crate::RemoteFailure) and everything that prevented a
/// response (timeouts, refused connections, unreadable bodies) as
/// [`TransportFailure`]. An empty success body is returned as `Value::Null`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn call(
        &self,
        address: &ServiceAddress,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

/// Decodes a payload into a typed value; a shape mismatch is a malformed response.
pub fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ClientError> {
    serde_json::from_value(payload)
        .map_err(|e| ClientError::Transport(TransportFailure::Malformed(e.to_string())))
}

/// Encodes a request body.
pub fn encode<T: Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|e| ClientError::Transport(TransportFailure::Encode(e.to_string())))
}
