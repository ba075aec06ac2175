//! Wire types shared by the composite service, its gateways and the
//! reference backends.

pub mod error_info;
pub mod types;

pub use error_info::HttpErrorInfo;
pub use types::{
    Product, ProductAggregate, ProductId, Recommendation, RecommendationSummary, Review,
    ReviewSummary, ServiceAddresses,
};
