//! Read-side fan-out/fan-in into a composite view.

use std::time::Instant;

use client::RemoteClient;
use common::{
    Product, ProductAggregate, ProductId, Recommendation, RecommendationSummary, Review,
    ReviewSummary, ServiceAddresses,
};

use crate::error::{Result, validate_product_id};
use crate::gateways::{Gateways, ProductGateway, RecommendationGateway, ReviewGateway};

/// Assembles composite views from the three backends.
///
/// The product is resolved first and any failure there aborts the request
/// before the enrichment backends are contacted. Recommendations and reviews
/// are then fetched concurrently and degrade to empty lists on failure.
pub struct Aggregator<C: RemoteClient> {
    product: ProductGateway<C>,
    recommendations: RecommendationGateway<C>,
    reviews: ReviewGateway<C>,
    service_address: String,
}

impl<C: RemoteClient> Aggregator<C> {
    /// Creates an aggregator. `service_address` identifies this composite
    /// instance in the provenance of every view it builds.
    pub fn new(gateways: Gateways<C>, service_address: impl Into<String>) -> Self {
        Self {
            product: gateways.product,
            recommendations: gateways.recommendation,
            reviews: gateways.review,
            service_address: service_address.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_composite(&self, product_id: ProductId) -> Result<ProductAggregate> {
        metrics::counter!("composite_requests_total", "operation" => "get").increment(1);
        let started = Instant::now();

        validate_product_id(product_id)?;

        let product = self.product.fetch(product_id).await?;

        let (recommendations, reviews) = tokio::join!(
            self.recommendations.fetch(product_id),
            self.reviews.fetch(product_id)
        );

        let view = assemble(product, &recommendations, &reviews, &self.service_address);

        metrics::histogram!("composite_aggregation_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::debug!(
            product_id,
            recommendations = view.recommendations.len(),
            reviews = view.reviews.len(),
            "composite assembled"
        );
        Ok(view)
    }
}

fn assemble(
    product: Product,
    recommendations: &[Recommendation],
    reviews: &[Review],
    service_address: &str,
) -> ProductAggregate {
    // Provenance of an empty collection is unknown.
    let recommendation_address = recommendations
        .first()
        .map(|r| r.service_address.clone())
        .unwrap_or_default();
    let review_address = reviews
        .first()
        .map(|r| r.service_address.clone())
        .unwrap_or_default();

    ProductAggregate {
        product_id: product.product_id,
        name: product.name,
        weight: product.weight,
        recommendations: recommendations
            .iter()
            .map(RecommendationSummary::from)
            .collect(),
        reviews: reviews.iter().map(ReviewSummary::from).collect(),
        service_addresses: Some(ServiceAddresses {
            composite_address: service_address.to_string(),
            product_address: product.service_address,
            review_address,
            recommendation_address,
        }),
    }
}
