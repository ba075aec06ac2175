//! Product gateway. The product is the load-bearing entity: every failure surfaces.

use std::sync::Arc;

use client::{Method, RemoteClient, ServiceAddress, decode};
use common::{Product, ProductId};

use super::{absent_is_success, post, reported, surface};
use crate::diagnostics::{Dependency, Diagnostics};
use crate::error::Result;

pub struct ProductGateway<C: RemoteClient> {
    client: Arc<C>,
    address: ServiceAddress,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<C: RemoteClient> ProductGateway<C> {
    pub fn new(client: Arc<C>, address: ServiceAddress, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            client,
            address,
            diagnostics,
        }
    }

    /// Fetches one product.
    ///
    /// The id is not validated here; positivity is the caller's contract.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, product_id: ProductId) -> Result<Product> {
        let path = format!("/product/{product_id}");
        let payload = self
            .client
            .call(&self.address, Method::Get, &path, None)
            .await
            .and_then(decode::<Product>)
            .map_err(|e| surface(self.diagnostics.as_ref(), Dependency::Product, "fetch", e))?;

        tracing::debug!(product_id, "found product");
        Ok(payload)
    }

    #[tracing::instrument(skip(self, product), fields(product_id = product.product_id))]
    pub async fn create(&self, product: &Product) -> Result<Product> {
        let created = post(self.client.as_ref(), &self.address, "/product", product)
            .await
            .and_then(decode::<Product>)
            .map_err(|e| surface(self.diagnostics.as_ref(), Dependency::Product, "create", e))?;

        tracing::debug!(product_id = created.product_id, "created product");
        Ok(created)
    }

    /// Deletes a product; deleting an absent product succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, product_id: ProductId) -> Result<()> {
        let path = format!("/product/{product_id}");
        let result = self
            .client
            .call(&self.address, Method::Delete, &path, None)
            .await;
        absent_is_success(result)
            .map_err(|e| reported(self.diagnostics.as_ref(), Dependency::Product, "delete", e))
    }
}

impl<C: RemoteClient> Clone for ProductGateway<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            address: self.address.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{RecordingDiagnostics, Signal};
    use crate::error::CompositeError;
    use backend::{Backends, InProcessTransport, InjectedFailure};

    fn gateway(backends: &Backends) -> (ProductGateway<InProcessTransport>, RecordingDiagnostics) {
        let diagnostics = RecordingDiagnostics::new();
        let gateway = ProductGateway::new(
            Arc::new(backends.transport.clone()),
            backends.product_address.clone(),
            Arc::new(diagnostics.clone()),
        );
        (gateway, diagnostics)
    }

    fn widget(product_id: ProductId) -> Product {
        Product {
            product_id,
            name: "Widget".to_string(),
            weight: 10,
            service_address: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let backends = Backends::start();
        let (gateway, _) = gateway(&backends);

        gateway.create(&widget(1)).await.unwrap();
        let product = gateway.fetch(1).await.unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.service_address, backends.product.service_address());
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let backends = Backends::start();
        let (gateway, diagnostics) = gateway(&backends);

        let result = gateway.fetch(13).await;
        assert_eq!(
            result,
            Err(CompositeError::NotFound(
                "No product found for productId: 13".to_string()
            ))
        );
        assert!(diagnostics.signals().is_empty());
    }

    #[tokio::test]
    async fn test_backend_validation_is_invalid_input() {
        let backends = Backends::start();
        let (gateway, _) = gateway(&backends);

        let result = gateway.fetch(-1).await;
        assert_eq!(
            result,
            Err(CompositeError::InvalidInput(
                "Invalid productId: -1".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_is_invalid_input() {
        let backends = Backends::start();
        let (gateway, _) = gateway(&backends);

        gateway.create(&widget(1)).await.unwrap();
        let result = gateway.create(&widget(1)).await;
        assert_eq!(
            result,
            Err(CompositeError::InvalidInput(
                "Duplicate key, Product Id: 1".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_unexpected_status_passes_through() {
        let backends = Backends::start();
        let (gateway, diagnostics) = gateway(&backends);
        backends.transport.set_failure(
            &backends.product_address,
            Some(InjectedFailure::Status {
                status: 503,
                message: "maintenance".to_string(),
            }),
        );

        let err = gateway.fetch(1).await.unwrap_err();
        assert_eq!(err.status(), 503);
        assert_eq!(err.message(), "maintenance");
        assert_eq!(
            diagnostics.signals(),
            vec![Signal::UpstreamFailure {
                dependency: Dependency::Product,
                operation: "fetch",
                status: 503,
            }]
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        let backends = Backends::start();
        let (gateway, _) = gateway(&backends);
        backends.transport.unregister(&backends.product_address);

        let result = gateway.fetch(1).await;
        assert!(matches!(result, Err(CompositeError::Transport(_))));
    }

    #[tokio::test]
    async fn test_delete_absent_product_succeeds() {
        let backends = Backends::start();
        let (gateway, _) = gateway(&backends);

        gateway.delete(99).await.unwrap();
        gateway.delete(99).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_tolerates_not_found_status() {
        let backends = Backends::start();
        let (gateway, diagnostics) = gateway(&backends);
        backends.transport.set_failure(
            &backends.product_address,
            Some(InjectedFailure::Status {
                status: 404,
                message: "gone".to_string(),
            }),
        );

        gateway.delete(1).await.unwrap();
        assert!(diagnostics.signals().is_empty());
    }
}
