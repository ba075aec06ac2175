//! In-memory recommendation service.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};
use common::{ProductId, Recommendation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::ErrorResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductQuery {
    product_id: ProductId,
}

/// Recommendation service keyed by `(product_id, recommendation_id)`.
#[derive(Clone)]
pub struct RecommendationBackend {
    recommendations: Arc<RwLock<BTreeMap<(ProductId, i32), Recommendation>>>,
    service_address: Arc<str>,
}

impl RecommendationBackend {
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            recommendations: Arc::new(RwLock::new(BTreeMap::new())),
            service_address: service_address.into().into(),
        }
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/recommendation", get(list).post(create).delete(remove))
            .with_state(self.clone())
    }

    /// Number of stored recommendations for a product.
    pub async fn count_for(&self, product_id: ProductId) -> usize {
        self.recommendations
            .read()
            .await
            .keys()
            .filter(|(p, _)| *p == product_id)
            .count()
    }

    fn stamped(&self, recommendation: &Recommendation) -> Recommendation {
        Recommendation {
            service_address: self.service_address.to_string(),
            ..recommendation.clone()
        }
    }
}

async fn list(
    State(backend): State<RecommendationBackend>,
    uri: Uri,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Recommendation>>, ErrorResponse> {
    let product_id = query.product_id;
    if product_id < 1 {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!("Invalid productId: {product_id}"),
        ));
    }

    let recommendations: Vec<Recommendation> = backend
        .recommendations
        .read()
        .await
        .range((product_id, i32::MIN)..=(product_id, i32::MAX))
        .map(|(_, r)| backend.stamped(r))
        .collect();

    tracing::debug!(product_id, count = recommendations.len(), "list: recommendations");
    Ok(Json(recommendations))
}

async fn create(
    State(backend): State<RecommendationBackend>,
    uri: Uri,
    Json(body): Json<Recommendation>,
) -> Result<Json<Recommendation>, ErrorResponse> {
    let key = (body.product_id, body.recommendation_id);
    let mut recommendations = backend.recommendations.write().await;
    if recommendations.contains_key(&key) {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!(
                "Duplicate key, Product Id: {}, Recommendation Id: {}",
                key.0, key.1
            ),
        ));
    }

    let stored = Recommendation {
        service_address: String::new(),
        ..body
    };
    let response = backend.stamped(&stored);
    recommendations.insert(key, stored);

    tracing::debug!(
        product_id = key.0,
        recommendation_id = key.1,
        "create: recommendation stored"
    );
    Ok(Json(response))
}

/// Removes every recommendation of the product; always succeeds.
async fn remove(State(backend): State<RecommendationBackend>, Query(query): Query<ProductQuery>) {
    let mut recommendations = backend.recommendations.write().await;
    let before = recommendations.len();
    recommendations.retain(|(p, _), _| *p != query.product_id);
    tracing::debug!(
        product_id = query.product_id,
        removed = before - recommendations.len(),
        "delete: recommendations"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn recommendation(product_id: i32, recommendation_id: i32) -> serde_json::Value {
        serde_json::json!({
            "productId": product_id,
            "recommendationId": recommendation_id,
            "author": "author",
            "rate": 3,
            "content": "content"
        })
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_only_returns_requested_product() {
        let backend = RecommendationBackend::new("rec-1:7002");
        let app = backend.router();
        for (p, r) in [(1, 1), (1, 2), (2, 1)] {
            app.clone()
                .oneshot(request("POST", "/recommendation", Some(recommendation(p, r))))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/recommendation?productId=1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|r| r["serviceAddress"] == "rec-1:7002"));
    }

    #[tokio::test]
    async fn test_unknown_product_is_empty_list() {
        let app = RecommendationBackend::new("r").router();

        let response = app
            .oneshot(request("GET", "/recommendation?productId=113", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_key_names_both_ids() {
        let backend = RecommendationBackend::new("r");
        let app = backend.router();

        app.clone()
            .oneshot(request("POST", "/recommendation", Some(recommendation(1, 1))))
            .await
            .unwrap();
        let response = app
            .oneshot(request("POST", "/recommendation", Some(recommendation(1, 1))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json(response).await["message"],
            "Duplicate key, Product Id: 1, Recommendation Id: 1"
        );
        assert_eq!(backend.count_for(1).await, 1);
    }

    #[tokio::test]
    async fn test_delete_all_for_product() {
        let backend = RecommendationBackend::new("r");
        let app = backend.router();
        for (p, r) in [(1, 1), (1, 2), (2, 1)] {
            app.clone()
                .oneshot(request("POST", "/recommendation", Some(recommendation(p, r))))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("DELETE", "/recommendation?productId=1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.count_for(1).await, 0);
        assert_eq!(backend.count_for(2).await, 1);
    }
}
