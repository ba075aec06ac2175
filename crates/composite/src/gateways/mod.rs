//! Per-domain gateways between the composite core and each backend.

pub mod product;
pub mod recommendation;
pub mod review;

use std::sync::Arc;

use client::{ClientError, Method, RemoteClient, ServiceAddress, encode};
use serde::Serialize;

pub use product::ProductGateway;
pub use recommendation::RecommendationGateway;
pub use review::ReviewGateway;

use crate::diagnostics::{Dependency, Diagnostics};
use crate::error::{CompositeError, translate};

/// Addresses of the three backends, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAddresses {
    pub product: ServiceAddress,
    pub recommendation: ServiceAddress,
    pub review: ServiceAddress,
}

/// The three gateways sharing one client and one diagnostics sink.
pub struct Gateways<C: RemoteClient> {
    pub product: ProductGateway<C>,
    pub recommendation: RecommendationGateway<C>,
    pub review: ReviewGateway<C>,
}

impl<C: RemoteClient> Gateways<C> {
    pub fn new(
        client: Arc<C>,
        addresses: &BackendAddresses,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            product: ProductGateway::new(
                client.clone(),
                addresses.product.clone(),
                diagnostics.clone(),
            ),
            recommendation: RecommendationGateway::new(
                client.clone(),
                addresses.recommendation.clone(),
                diagnostics.clone(),
            ),
            review: ReviewGateway::new(client, addresses.review.clone(), diagnostics),
        }
    }
}

impl<C: RemoteClient> Clone for Gateways<C> {
    fn clone(&self) -> Self {
        Self {
            product: self.product.clone(),
            recommendation: self.recommendation.clone(),
            review: self.review.clone(),
        }
    }
}

/// Translates a failure and reports it when it is not a domain outcome.
fn surface(
    diagnostics: &dyn Diagnostics,
    dependency: Dependency,
    operation: &'static str,
    err: ClientError,
) -> CompositeError {
    let err = translate(err);
    if err.is_unexpected() {
        diagnostics.upstream_failure(dependency, operation, &err);
    }
    err
}

/// Translates a delete failure and always reports it.
fn reported(
    diagnostics: &dyn Diagnostics,
    dependency: Dependency,
    operation: &'static str,
    err: ClientError,
) -> CompositeError {
    let err = translate(err);
    diagnostics.upstream_failure(dependency, operation, &err);
    err
}

async fn post<C: RemoteClient, T: Serialize>(
    client: &C,
    address: &ServiceAddress,
    path: &str,
    body: &T,
) -> Result<serde_json::Value, ClientError> {
    let body = encode(body)?;
    client.call(address, Method::Post, path, Some(body)).await
}

/// Deletes are idempotent: a 404 means there was nothing to delete.
fn absent_is_success(result: Result<serde_json::Value, ClientError>) -> Result<(), ClientError> {
    match result {
        Ok(_) => Ok(()),
        Err(ClientError::Remote(failure)) if failure.status == 404 => {
            tracing::debug!(reason = %failure.message(), "nothing to delete");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
