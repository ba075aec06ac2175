//! Reference backends for the composite service.
//!
//! Each backend keeps its entities in memory and exposes the same HTTP
//! contract as the production services: invalid ids and duplicate keys are
//! 422, a missing product is 404 and deletes always succeed. The
//! [`InProcessTransport`] routes [`client::RemoteClient`] calls straight
//! into the routers, recording each call and optionally injecting failures.

pub mod error;
pub mod product;
pub mod recommendation;
pub mod review;
pub mod transport;

use client::ServiceAddress;

pub use error::ErrorResponse;
pub use product::ProductBackend;
pub use recommendation::RecommendationBackend;
pub use review::ReviewBackend;
pub use transport::{InProcessTransport, InjectedFailure, RecordedCall};

/// The three backends wired into one in-process transport.
pub struct Backends {
    pub product: ProductBackend,
    pub recommendation: RecommendationBackend,
    pub review: ReviewBackend,
    pub transport: InProcessTransport,
    pub product_address: ServiceAddress,
    pub recommendation_address: ServiceAddress,
    pub review_address: ServiceAddress,
}

impl Backends {
    /// Creates empty backends on their conventional addresses and registers
    /// them with a fresh transport.
    pub fn start() -> Self {
        let product_address = ServiceAddress::new("product", 7001);
        let recommendation_address = ServiceAddress::new("recommendation", 7002);
        let review_address = ServiceAddress::new("review", 7003);

        let product = ProductBackend::new(product_address.to_string());
        let recommendation = RecommendationBackend::new(recommendation_address.to_string());
        let review = ReviewBackend::new(review_address.to_string());

        let transport = InProcessTransport::new();
        transport.register(product_address.clone(), product.router());
        transport.register(recommendation_address.clone(), recommendation.router());
        transport.register(review_address.clone(), review.router());

        Self {
            product,
            recommendation,
            review,
            transport,
            product_address,
            recommendation_address,
            review_address,
        }
    }
}
