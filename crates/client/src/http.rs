//! reqwest-backed remote client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::address::ServiceAddress;
use crate::error::{ClientError, RemoteFailure, TransportFailure};
use crate::remote::{Method, RemoteClient};

/// Remote client speaking HTTP/JSON to the backends.
///
/// The per-request timeout is fixed at construction; connection pooling is
/// left to reqwest.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    http: Client,
}

impl HttpRemoteClient {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            ClientError::Transport(TransportFailure::Other {
                url: String::new(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self { http })
    }

    /// Wraps an already configured reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn transport_failure(url: &str, err: reqwest::Error) -> ClientError {
    let failure = if err.is_timeout() {
        TransportFailure::Timeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        TransportFailure::Unreachable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else if err.is_decode() || err.is_body() {
        TransportFailure::Malformed(err.to_string())
    } else {
        TransportFailure::Other {
            url: url.to_string(),
            reason: err.to_string(),
        }
    };
    ClientError::Transport(failure)
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    #[tracing::instrument(skip(self, body), fields(%address))]
    async fn call(
        &self,
        address: &ServiceAddress,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", address.base_url(), path);
        tracing::debug!(%method, %url, "calling remote service");

        let mut request = self.http.request(method.into(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_failure(&url, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_failure(&url, e))?;

        if !status.is_success() {
            return Err(RemoteFailure::from_body(status.as_u16(), text).into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::Transport(TransportFailure::Malformed(e.to_string())))
    }
}
