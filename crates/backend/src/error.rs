//! Error responses carrying an [`HttpErrorInfo`] body.

use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use common::HttpErrorInfo;

/// An error status with its structured body.
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub info: HttpErrorInfo,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, uri: &Uri, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(%status, path = uri.path(), reason = %message, "returning error");
        Self {
            status,
            info: HttpErrorInfo::new(uri.path(), status.as_u16(), message),
        }
    }

    pub fn not_found(uri: &Uri, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, uri, message)
    }

    pub fn invalid_input(uri: &Uri, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, uri, message)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.info)).into_response()
    }
}
