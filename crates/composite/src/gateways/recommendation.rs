//! Recommendation gateway. Recommendations are enrichment data: fetch failures
//! degrade to an empty list.

use std::sync::Arc;

use client::{Method, RemoteClient, ServiceAddress, decode};
use common::{ProductId, Recommendation};

use super::{absent_is_success, post, reported, surface};
use crate::diagnostics::{Dependency, Diagnostics};
use crate::error::Result;

pub struct RecommendationGateway<C: RemoteClient> {
    client: Arc<C>,
    address: ServiceAddress,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<C: RemoteClient> RecommendationGateway<C> {
    pub fn new(client: Arc<C>, address: ServiceAddress, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            client,
            address,
            diagnostics,
        }
    }

    /// Fetches the recommendations of a product.
    ///
    /// Never fails: any remote or transport failure is reported to the
    /// diagnostics sink and an empty list is returned.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, product_id: ProductId) -> Vec<Recommendation> {
        let path = format!("/recommendation?productId={product_id}");
        let result = self
            .client
            .call(&self.address, Method::Get, &path, None)
            .await
            .and_then(decode::<Vec<Recommendation>>);

        match result {
            Ok(recommendations) => {
                tracing::debug!(
                    product_id,
                    count = recommendations.len(),
                    "found recommendations"
                );
                recommendations
            }
            Err(e) => {
                self.diagnostics
                    .degraded(Dependency::Recommendation, product_id, &e.to_string());
                Vec::new()
            }
        }
    }

    #[tracing::instrument(
        skip(self, recommendation),
        fields(
            product_id = recommendation.product_id,
            recommendation_id = recommendation.recommendation_id
        )
    )]
    pub async fn create(&self, recommendation: &Recommendation) -> Result<Recommendation> {
        let created = post(
            self.client.as_ref(),
            &self.address,
            "/recommendation",
            recommendation,
        )
        .await
        .and_then(decode::<Recommendation>)
        .map_err(|e| {
            surface(
                self.diagnostics.as_ref(),
                Dependency::Recommendation,
                "create",
                e,
            )
        })?;

        tracing::debug!("created recommendation");
        Ok(created)
    }

    /// Deletes every recommendation of a product; none existing is success.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, product_id: ProductId) -> Result<()> {
        let path = format!("/recommendation?productId={product_id}");
        let result = self
            .client
            .call(&self.address, Method::Delete, &path, None)
            .await;
        absent_is_success(result).map_err(|e| {
            reported(
                self.diagnostics.as_ref(),
                Dependency::Recommendation,
                "delete",
                e,
            )
        })
    }
}

impl<C: RemoteClient> Clone for RecommendationGateway<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            address: self.address.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
