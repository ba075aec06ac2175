//! Product composite endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use client::RemoteClient;
use common::{ProductAggregate, ProductId};
use composite::{Aggregator, Orchestrator};

use crate::error::ApiError;

/// Shared application state for composite route handlers.
pub struct AppState<C: RemoteClient> {
    pub aggregator: Aggregator<C>,
    pub orchestrator: Orchestrator<C>,
}

fn product_id(
    uri: &Uri,
    path: Result<Path<ProductId>, PathRejection>,
) -> Result<ProductId, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiError::rejected(uri.path(), rejection.status(), rejection.body_text())
    })
}

/// GET /product-composite/{productId} — assembles the composite view.
#[tracing::instrument(skip(state, path))]
pub async fn get<C: RemoteClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    uri: Uri,
    path: Result<Path<ProductId>, PathRejection>,
) -> Result<Json<ProductAggregate>, ApiError> {
    let product_id = product_id(&uri, path)?;

    let view = state
        .aggregator
        .get_composite(product_id)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;

    Ok(Json(view))
}

/// POST /product-composite — writes the product and its children.
#[tracing::instrument(skip(state, body))]
pub async fn create<C: RemoteClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    uri: Uri,
    body: Result<Json<ProductAggregate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(aggregate) = body.map_err(|rejection| {
        ApiError::rejected(uri.path(), rejection.status(), rejection.body_text())
    })?;

    state
        .orchestrator
        .create_composite(&aggregate)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;

    Ok(StatusCode::OK)
}

/// DELETE /product-composite/{productId} — removes the product and its children.
#[tracing::instrument(skip(state, path))]
pub async fn delete<C: RemoteClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    uri: Uri,
    path: Result<Path<ProductId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let product_id = product_id(&uri, path)?;

    state
        .orchestrator
        .delete_composite(product_id)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;

    Ok(StatusCode::OK)
}
