//! Review gateway. Like recommendations, reviews degrade to an empty list.

use std::sync::Arc;

use client::{Method, RemoteClient, ServiceAddress, decode};
use common::{ProductId, Review};

use super::{absent_is_success, post, reported, surface};
use crate::diagnostics::{Dependency, Diagnostics};
use crate::error::Result;

pub struct ReviewGateway<C: RemoteClient> {
    client: Arc<C>,
    address: ServiceAddress,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<C: RemoteClient> ReviewGateway<C> {
    pub fn new(client: Arc<C>, address: ServiceAddress, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            client,
            address,
            diagnostics,
        }
    }

    /// Fetches the reviews of a product, or an empty list if the backend failed.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, product_id: ProductId) -> Vec<Review> {
        let path = format!("/review?productId={product_id}");
        let result = self
            .client
            .call(&self.address, Method::Get, &path, None)
            .await
            .and_then(decode::<Vec<Review>>);

        match result {
            Ok(reviews) => {
                tracing::debug!(product_id, count = reviews.len(), "found reviews");
                reviews
            }
            Err(e) => {
                self.diagnostics
                    .degraded(Dependency::Review, product_id, &e.to_string());
                Vec::new()
            }
        }
    }

    #[tracing::instrument(
        skip(self, review),
        fields(product_id = review.product_id, review_id = review.review_id)
    )]
    pub async fn create(&self, review: &Review) -> Result<Review> {
        let created = post(self.client.as_ref(), &self.address, "/review", review)
            .await
            .and_then(decode::<Review>)
            .map_err(|e| surface(self.diagnostics.as_ref(), Dependency::Review, "create", e))?;

        tracing::debug!("created review");
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, product_id: ProductId) -> Result<()> {
        let path = format!("/review?productId={product_id}");
        let result = self
            .client
            .call(&self.address, Method::Delete, &path, None)
            .await;
        absent_is_success(result)
            .map_err(|e| reported(self.diagnostics.as_ref(), Dependency::Review, "delete", e))
    }
}

impl<C: RemoteClient> Clone for ReviewGateway<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            address: self.address.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
