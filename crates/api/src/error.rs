//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::HttpErrorInfo;
use composite::CompositeError;

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as an [`HttpErrorInfo`] body carrying the request
/// path, so callers see the same error shape the backends produce.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be decoded (bad path parameter or body).
    BadRequest {
        path: String,
        status: StatusCode,
        message: String,
    },
    /// Failure raised while aggregating or orchestrating.
    Composite { path: String, error: CompositeError },
}

impl ApiError {
    pub fn composite(path: impl Into<String>, error: CompositeError) -> Self {
        ApiError::Composite {
            path: path.into(),
            error,
        }
    }

    /// A decode failure reported by an axum extractor.
    pub fn rejected(path: impl Into<String>, status: StatusCode, message: String) -> Self {
        ApiError::BadRequest {
            path: path.into(),
            status,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Composite { error, .. } => {
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (path, message) = match self {
            ApiError::BadRequest { path, message, .. } => (path, message),
            ApiError::Composite { path, error } => {
                if error.is_unexpected() {
                    tracing::error!(%path, error = %error, "composite request failed");
                } else {
                    tracing::debug!(%path, error = %error, "composite request rejected");
                }
                (path, error.message())
            }
        };

        let body = HttpErrorInfo::new(path, status.as_u16(), message);
        (status, axum::Json(body)).into_response()
    }
}
