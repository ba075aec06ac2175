use serde::{Deserialize, Serialize};

/// Externally assigned product identifier.
///
/// Valid identifiers are positive; the wire type is signed so that
/// non-positive values can reach validation instead of failing decoding.
pub type ProductId = i32;

/// A product as owned by the product backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub weight: i32,
    /// Backend instance that served this product. Empty on create requests.
    #[serde(default)]
    pub service_address: String,
}

impl Product {
    /// Builds the product-create payload from a composite aggregate.
    pub fn from_aggregate(aggregate: &ProductAggregate) -> Self {
        Self {
            product_id: aggregate.product_id,
            name: aggregate.name.clone(),
            weight: aggregate.weight,
            service_address: String::new(),
        }
    }
}

/// A recommendation, unique per `(product_id, recommendation_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: ProductId,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
    #[serde(default)]
    pub service_address: String,
}

impl Recommendation {
    /// Tags a summary with the product it belongs to.
    pub fn from_summary(product_id: ProductId, summary: &RecommendationSummary) -> Self {
        Self {
            product_id,
            recommendation_id: summary.recommendation_id,
            author: summary.author.clone(),
            rate: summary.rate,
            content: summary.content.clone(),
            service_address: String::new(),
        }
    }
}

/// A review, unique per `(product_id, review_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub product_id: ProductId,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub service_address: String,
}

impl Review {
    /// Tags a summary with the product it belongs to.
    pub fn from_summary(product_id: ProductId, summary: &ReviewSummary) -> Self {
        Self {
            product_id,
            review_id: summary.review_id,
            author: summary.author.clone(),
            subject: summary.subject.clone(),
            content: summary.content.clone(),
            service_address: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSummary {
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}

impl From<&Recommendation> for RecommendationSummary {
    fn from(r: &Recommendation) -> Self {
        Self {
            recommendation_id: r.recommendation_id,
            author: r.author.clone(),
            rate: r.rate,
            content: r.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

impl From<&Review> for ReviewSummary {
    fn from(r: &Review) -> Self {
        Self {
            review_id: r.review_id,
            author: r.author.clone(),
            subject: r.subject.clone(),
            content: r.content.clone(),
        }
    }
}

/// Provenance of a composite view: which instance answered for each part.
///
/// An address is empty when the corresponding collection came back empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAddresses {
    pub composite_address: String,
    pub product_address: String,
    pub review_address: String,
    pub recommendation_address: String,
}

/// The composite view of a product with its recommendations and reviews.
///
/// Also used as the request body when creating a composite, in which case
/// `service_addresses` is ignored and both lists may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAggregate {
    pub product_id: ProductId,
    pub name: String,
    pub weight: i32,
    #[serde(default)]
    pub recommendations: Vec<RecommendationSummary>,
    #[serde(default)]
    pub reviews: Vec<ReviewSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_addresses: Option<ServiceAddresses>,
}
