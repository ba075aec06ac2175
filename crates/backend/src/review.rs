//! In-memory review service.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};
use common::{ProductId, Review};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::ErrorResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductQuery {
    product_id: ProductId,
}

/// Review service keyed by `(product_id, review_id)`.
#[derive(Clone)]
pub struct ReviewBackend {
    reviews: Arc<RwLock<BTreeMap<(ProductId, i32), Review>>>,
    service_address: Arc<str>,
}

impl ReviewBackend {
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            reviews: Arc::new(RwLock::new(BTreeMap::new())),
            service_address: service_address.into().into(),
        }
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/review", get(list).post(create).delete(remove))
            .with_state(self.clone())
    }

    pub async fn count_for(&self, product_id: ProductId) -> usize {
        self.reviews
            .read()
            .await
            .keys()
            .filter(|(p, _)| *p == product_id)
            .count()
    }

    fn stamped(&self, review: &Review) -> Review {
        Review {
            service_address: self.service_address.to_string(),
            ..review.clone()
        }
    }
}

async fn list(
    State(backend): State<ReviewBackend>,
    uri: Uri,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Review>>, ErrorResponse> {
    let product_id = query.product_id;
    if product_id < 1 {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!("Invalid productId: {product_id}"),
        ));
    }

    let reviews: Vec<Review> = backend
        .reviews
        .read()
        .await
        .range((product_id, i32::MIN)..=(product_id, i32::MAX))
        .map(|(_, r)| backend.stamped(r))
        .collect();

    tracing::debug!(product_id, count = reviews.len(), "list: reviews");
    Ok(Json(reviews))
}

async fn create(
    State(backend): State<ReviewBackend>,
    uri: Uri,
    Json(body): Json<Review>,
) -> Result<Json<Review>, ErrorResponse> {
    let key = (body.product_id, body.review_id);
    let mut reviews = backend.reviews.write().await;
    if reviews.contains_key(&key) {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!("Duplicate key, Product Id: {}, Review Id: {}", key.0, key.1),
        ));
    }

    let stored = Review {
        service_address: String::new(),
        ..body
    };
    let response = backend.stamped(&stored);
    reviews.insert(key, stored);

    tracing::debug!(product_id = key.0, review_id = key.1, "create: review stored");
    Ok(Json(response))
}

async fn remove(State(backend): State<ReviewBackend>, Query(query): Query<ProductQuery>) {
    let mut reviews = backend.reviews.write().await;
    let before = reviews.len();
    reviews.retain(|(p, _), _| *p != query.product_id);
    tracing::debug!(
        product_id = query.product_id,
        removed = before - reviews.len(),
        "delete: reviews"
    );
}
