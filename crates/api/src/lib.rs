//! HTTP API for the product composite service.
//!
//! Exposes the composite read, write and delete endpoints on top of
//! [`composite::Aggregator`] and [`composite::Orchestrator`], with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use client::RemoteClient;
use composite::{Aggregator, BackendAddresses, Diagnostics, Gateways, Orchestrator};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::composite::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C: RemoteClient + 'static>(
    state: Arc<AppState<C>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health))
        .route("/product-composite", post(routes::composite::create::<C>))
        .route(
            "/product-composite/{product_id}",
            get(routes::composite::get::<C>).delete(routes::composite::delete::<C>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the gateways, aggregator and orchestrator over one remote client.
pub fn create_state<C: RemoteClient + 'static>(
    client: Arc<C>,
    addresses: &BackendAddresses,
    service_address: impl Into<String>,
    diagnostics: Arc<dyn Diagnostics>,
) -> Arc<AppState<C>> {
    let gateways = Gateways::new(client, addresses, diagnostics);

    Arc::new(AppState {
        aggregator: Aggregator::new(gateways.clone(), service_address),
        orchestrator: Orchestrator::new(gateways),
    })
}
