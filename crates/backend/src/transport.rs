//! In-process transport dispatching remote calls into axum routers.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use client::{ClientError, Method, RemoteClient, RemoteFailure, ServiceAddress, TransportFailure};
use common::HttpErrorInfo;
use serde_json::Value;
use tower::ServiceExt;

/// A fault the transport injects in place of, or ahead of, dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Respond with this status and an error record carrying `message`.
    Status { status: u16, message: String },
    /// Report a timeout without calling the backend.
    Timeout,
    /// Dispatch normally, but only after sleeping.
    Delay(Duration),
}

/// One call seen by the transport, recorded before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub address: ServiceAddress,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct TransportState {
    routes: HashMap<ServiceAddress, Router>,
    failures: HashMap<ServiceAddress, InjectedFailure>,
    calls: Vec<RecordedCall>,
}

/// Routes calls to registered routers by address.
///
/// Unregistered addresses behave like a refused connection.
#[derive(Clone, Default)]
pub struct InProcessTransport {
    state: Arc<RwLock<TransportState>>,
}

impl InProcessTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, address: ServiceAddress, router: Router) {
        self.state.write().unwrap().routes.insert(address, router);
    }

    /// Makes the address unreachable.
    pub fn unregister(&self, address: &ServiceAddress) {
        self.state.write().unwrap().routes.remove(address);
    }

    /// Configures (or clears, with `None`) a failure for every call to `address`.
    pub fn set_failure(&self, address: &ServiceAddress, failure: Option<InjectedFailure>) {
        let mut state = self.state.write().unwrap();
        match failure {
            Some(failure) => {
                state.failures.insert(address.clone(), failure);
            }
            None => {
                state.failures.remove(address);
            }
        }
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Calls issued to one address with one method.
    pub fn calls_to(&self, address: &ServiceAddress, method: Method) -> Vec<RecordedCall> {
        self.state
            .read()
            .unwrap()
            .calls
            .iter()
            .filter(|c| &c.address == address && c.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.write().unwrap().calls.clear();
    }
}

fn http_method(method: Method) -> axum::http::Method {
    match method {
        Method::Get => axum::http::Method::GET,
        Method::Post => axum::http::Method::POST,
        Method::Delete => axum::http::Method::DELETE,
    }
}

fn injected_status(status: u16, message: String, path: &str) -> ClientError {
    let path = path.split('?').next().unwrap_or_default();
    let info = HttpErrorInfo::new(path, status, message);
    let body = serde_json::to_string(&info).unwrap_or_default();
    RemoteFailure::from_body(status, body).into()
}

#[async_trait]
impl RemoteClient for InProcessTransport {
    async fn call(
        &self,
        address: &ServiceAddress,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", address.base_url(), path);
        let (router, failure) = {
            let mut state = self.state.write().unwrap();
            state.calls.push(RecordedCall {
                address: address.clone(),
                method,
                path: path.to_string(),
                body: body.clone(),
            });
            (
                state.routes.get(address).cloned(),
                state.failures.get(address).cloned(),
            )
        };

        match failure {
            Some(InjectedFailure::Status { status, message }) => {
                return Err(injected_status(status, message, path));
            }
            Some(InjectedFailure::Timeout) => return Err(TransportFailure::Timeout { url }.into()),
            Some(InjectedFailure::Delay(delay)) => tokio::time::sleep(delay).await,
            None => {}
        }
        let Some(router) = router else {
            return Err(TransportFailure::Unreachable {
                url,
                reason: "connection refused".to_string(),
            }
            .into());
        };

        let request_body = match body {
            Some(value) => Body::from(
                serde_json::to_vec(&value)
                    .map_err(|e| TransportFailure::Encode(e.to_string()))?,
            ),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(http_method(method))
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(request_body)
            .map_err(|e| TransportFailure::Other {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let response = router
            .oneshot(request)
            .await
            .map_err(|never: Infallible| -> ClientError { match never {} })?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| TransportFailure::Malformed(e.to_string()))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(RemoteFailure::from_body(status.as_u16(), text).into());
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| TransportFailure::Malformed(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductBackend;

    #[tokio::test]
    async fn test_dispatches_and_records() {
        let transport = InProcessTransport::new();
        let address = ServiceAddress::new("product", 7001);
        transport.register(address.clone(), ProductBackend::new("product:7001").router());

        let err = transport
            .call(&address, Method::Get, "/product/1", None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/product/1");
        assert_eq!(calls[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_unregistered_address_is_unreachable() {
        let transport = InProcessTransport::new();
        let result = transport
            .call(&ServiceAddress::new("nowhere", 1), Method::Get, "/", None)
            .await;
        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportFailure::Unreachable { .. }))
        ));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_status_carries_error_record() {
        let transport = InProcessTransport::new();
        let address = ServiceAddress::new("review", 7003);
        transport.register(address.clone(), crate::ReviewBackend::new("r").router());
        transport.set_failure(
            &address,
            Some(InjectedFailure::Status {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        let err = transport
            .call(&address, Method::Get, "/review?productId=1", None)
            .await
            .unwrap_err();
        match err {
            ClientError::Remote(failure) => {
                assert_eq!(failure.status, 500);
                assert_eq!(failure.message(), "boom");
                assert_eq!(failure.path(), Some("/review"));
            }
            other => panic!("expected remote failure, got {other:?}"),
        }

        transport.set_failure(&address, None);
        let ok = transport
            .call(&address, Method::Get, "/review?productId=1", None)
            .await
            .unwrap();
        assert_eq!(ok, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_delay_still_dispatches() {
        let transport = InProcessTransport::new();
        let address = ServiceAddress::new("review", 7003);
        transport.register(address.clone(), crate::ReviewBackend::new("r").router());
        transport.set_failure(
            &address,
            Some(InjectedFailure::Delay(Duration::from_millis(50))),
        );

        let started = std::time::Instant::now();
        let payload = transport
            .call(&address, Method::Get, "/review?productId=1", None)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(payload, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_delete_returns_null_payload() {
        let transport = InProcessTransport::new();
        let address = ServiceAddress::new("product", 7001);
        transport.register(address.clone(), ProductBackend::new("p").router());

        let payload = transport
            .call(&address, Method::Delete, "/product/5", None)
            .await
            .unwrap();
        assert_eq!(payload, Value::Null);
    }
}
