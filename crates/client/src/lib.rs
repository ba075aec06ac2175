//! Remote service client.
//!
//! Performs a single call against one named backend and reports the outcome
//! as either a payload, a [`RemoteFailure`] carrying the backend's status and
//! error record, or a [`TransportFailure`] when no usable response arrived.
//! There are no retries at this layer.

pub mod address;
pub mod error;
pub mod http;
pub mod remote;

pub use address::ServiceAddress;
pub use error::{ClientError, RemoteFailure, Result, TransportFailure};
pub use http::HttpRemoteClient;
pub use remote::{Method, RemoteClient, decode, encode};
