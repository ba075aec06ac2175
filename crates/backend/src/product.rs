//! In-memory product service.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{Product, ProductId};
use tokio::sync::RwLock;

use crate::error::ErrorResponse;

/// Product service keyed by product id.
#[derive(Clone)]
pub struct ProductBackend {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    service_address: Arc<str>,
}

impl ProductBackend {
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            service_address: service_address.into().into(),
        }
    }

    /// Address stamped on every product this instance serves.
    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/product", post(create))
            .route("/product/{product_id}", get(fetch).delete(remove))
            .with_state(self.clone())
    }

    /// Number of stored products.
    pub async fn count(&self) -> usize {
        self.products.read().await.len()
    }

    fn stamped(&self, product: &Product) -> Product {
        Product {
            service_address: self.service_address.to_string(),
            ..product.clone()
        }
    }
}

async fn fetch(
    State(backend): State<ProductBackend>,
    uri: Uri,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>, ErrorResponse> {
    if product_id < 1 {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!("Invalid productId: {product_id}"),
        ));
    }

    let products = backend.products.read().await;
    let product = products.get(&product_id).ok_or_else(|| {
        ErrorResponse::not_found(&uri, format!("No product found for productId: {product_id}"))
    })?;

    tracing::debug!(product_id, "fetch: found product");
    Ok(Json(backend.stamped(product)))
}

async fn create(
    State(backend): State<ProductBackend>,
    uri: Uri,
    Json(body): Json<Product>,
) -> Result<Json<Product>, ErrorResponse> {
    let mut products = backend.products.write().await;
    if products.contains_key(&body.product_id) {
        return Err(ErrorResponse::invalid_input(
            &uri,
            format!("Duplicate key, Product Id: {}", body.product_id),
        ));
    }

    let stored = Product {
        service_address: String::new(),
        ..body
    };
    let response = backend.stamped(&stored);
    products.insert(stored.product_id, stored);

    tracing::debug!(product_id = response.product_id, "create: product stored");
    Ok(Json(response))
}

/// Always succeeds, whether or not the product exists.
async fn remove(State(backend): State<ProductBackend>, Path(product_id): Path<ProductId>) {
    let removed = backend.products.write().await.remove(&product_id).is_some();
    tracing::debug!(product_id, removed, "delete: product");
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

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let backend = ProductBackend::new("product-1:7001");
        let app = backend.router();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/product",
                Some(serde_json::json!({"productId": 1, "name": "Widget", "weight": 3})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/product/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["name"], "Widget");
        assert_eq!(body["serviceAddress"], "product-1:7001");
    }

    #[tokio::test]
    async fn test_missing_product() {
        let app = ProductBackend::new("p").router();

        let response = app
            .oneshot(request("GET", "/product/13", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json(response).await;
        assert_eq!(body["path"], "/product/13");
        assert_eq!(body["httpStatus"], 404);
        assert_eq!(body["message"], "No product found for productId: 13");
    }

    #[tokio::test]
    async fn test_invalid_product_id() {
        let app = ProductBackend::new("p").router();

        let response = app
            .oneshot(request("GET", "/product/0", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(response).await["message"], "Invalid productId: 0");
    }

    #[tokio::test]
    async fn test_duplicate_create() {
        let backend = ProductBackend::new("p");
        let app = backend.router();
        let body = serde_json::json!({"productId": 2, "name": "Widget", "weight": 3});

        app.clone()
            .oneshot(request("POST", "/product", Some(body.clone())))
            .await
            .unwrap();
        let response = app
            .oneshot(request("POST", "/product", Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(response).await["message"], "Duplicate key, Product Id: 2");
        assert_eq!(backend.count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = ProductBackend::new("p");
        let app = backend.router();

        app.clone()
            .oneshot(request(
                "POST",
                "/product",
                Some(serde_json::json!({"productId": 4, "name": "Widget", "weight": 3})),
            ))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("DELETE", "/product/4", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(backend.count().await, 0);
    }
}
