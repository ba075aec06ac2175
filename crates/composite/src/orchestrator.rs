//! Multi-backend create and cascading delete.

use client::RemoteClient;
use common::{Product, ProductAggregate, ProductId, Recommendation, Review};

use crate::error::{Result, validate_product_id};
use crate::gateways::{Gateways, ProductGateway, RecommendationGateway, ReviewGateway};

/// Propagates writes and deletes across the three backends.
///
/// There is no compensation: a failed create leaves whatever was already
/// written in place.
pub struct Orchestrator<C: RemoteClient> {
    product: ProductGateway<C>,
    recommendations: RecommendationGateway<C>,
    reviews: ReviewGateway<C>,
}

impl<C: RemoteClient> Orchestrator<C> {
    pub fn new(gateways: Gateways<C>) -> Self {
        Self {
            product: gateways.product,
            recommendations: gateways.recommendation,
            reviews: gateways.review,
        }
    }

    /// Creates the product, then each recommendation, then each review.
    ///
    /// The product must be created before anything else is attempted. The
    /// first failing item aborts the remaining writes and is returned.
    #[tracing::instrument(skip(self, aggregate), fields(product_id = aggregate.product_id))]
    pub async fn create_composite(&self, aggregate: &ProductAggregate) -> Result<()> {
        metrics::counter!("composite_requests_total", "operation" => "create").increment(1);
        let product_id = aggregate.product_id;
        validate_product_id(product_id)?;

        let result = self.write_all(aggregate).await;
        if let Err(ref e) = result {
            tracing::warn!(product_id, error = %e, "composite create failed");
        } else {
            tracing::info!(
                product_id,
                recommendations = aggregate.recommendations.len(),
                reviews = aggregate.reviews.len(),
                "composite created"
            );
        }
        result
    }

    async fn write_all(&self, aggregate: &ProductAggregate) -> Result<()> {
        let product_id = aggregate.product_id;

        self.product
            .create(&Product::from_aggregate(aggregate))
            .await?;

        for summary in &aggregate.recommendations {
            self.recommendations
                .create(&Recommendation::from_summary(product_id, summary))
                .await?;
        }

        for summary in &aggregate.reviews {
            self.reviews
                .create(&Review::from_summary(product_id, summary))
                .await?;
        }

        Ok(())
    }

    /// Deletes the product, its reviews and its recommendations.
    ///
    /// All three deletes are always attempted, concurrently. Absent resources
    /// count as deleted. If any backend fails, the first failure in product,
    /// review, recommendation order is returned once all three have finished.
    #[tracing::instrument(skip(self))]
    pub async fn delete_composite(&self, product_id: ProductId) -> Result<()> {
        metrics::counter!("composite_requests_total", "operation" => "delete").increment(1);

        let (product, reviews, recommendations) = tokio::join!(
            self.product.delete(product_id),
            self.reviews.delete(product_id),
            self.recommendations.delete(product_id)
        );

        let failed = [&product, &reviews, &recommendations]
            .iter()
            .filter(|r| r.is_err())
            .count();
        if failed > 0 {
            tracing::warn!(product_id, failed, "composite delete partially failed");
        } else {
            tracing::info!(product_id, "composite deleted");
        }

        product.and(reviews).and(recommendations)
    }
}
