//! Caller-facing error taxonomy and the translator from client failures.

use client::{ClientError, TransportFailure};
use common::ProductId;
use thiserror::Error;

/// Errors surfaced by the aggregator and orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Validation failure or duplicate key.
    #[error("{0}")]
    InvalidInput(String),

    /// A backend answered with a status the composite does not interpret.
    /// Status and message are kept as the backend sent them.
    #[error("upstream returned status {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        path: Option<String>,
    },

    /// No usable response came back from a backend.
    #[error("{0}")]
    Transport(TransportFailure),
}

impl CompositeError {
    /// HTTP status a caller should see for this error.
    pub fn status(&self) -> u16 {
        match self {
            CompositeError::NotFound(_) => 404,
            CompositeError::InvalidInput(_) => 422,
            CompositeError::Upstream { status, .. } => *status,
            CompositeError::Transport(TransportFailure::Timeout { .. }) => 504,
            CompositeError::Transport(_) => 502,
        }
    }

    /// Human-readable message, without the kind prefix for upstream errors.
    pub fn message(&self) -> String {
        match self {
            CompositeError::NotFound(message) | CompositeError::InvalidInput(message) => {
                message.clone()
            }
            CompositeError::Upstream { message, .. } => message.clone(),
            CompositeError::Transport(failure) => failure.to_string(),
        }
    }

    /// True for the kinds an operator has to look at.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            CompositeError::Upstream { .. } | CompositeError::Transport(_)
        )
    }
}

/// Maps a client failure into the composite vocabulary.
///
/// 404 becomes `NotFound`, 422 becomes `InvalidInput`; any other status is
/// passed through unchanged as `Upstream`.
pub fn translate(err: ClientError) -> CompositeError {
    match err {
        ClientError::Remote(failure) => match failure.status {
            404 => CompositeError::NotFound(failure.message()),
            422 => CompositeError::InvalidInput(failure.message()),
            status => CompositeError::Upstream {
                status,
                message: failure.message(),
                path: failure.path().map(String::from),
            },
        },
        ClientError::Transport(failure) => CompositeError::Transport(failure),
    }
}

/// Composite-level input contract: product ids are positive.
pub(crate) fn validate_product_id(product_id: ProductId) -> Result<()> {
    if product_id < 1 {
        return Err(CompositeError::InvalidInput(format!(
            "Invalid productId: {product_id}"
        )));
    }
    Ok(())
}

/// Convenience type alias for composite results.
pub type Result<T> = std::result::Result<T, CompositeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use client::RemoteFailure;
    use common::HttpErrorInfo;

    fn remote(status: u16, message: &str) -> ClientError {
        let info = HttpErrorInfo::new("/product/1", status, message);
        RemoteFailure::from_body(status, serde_json::to_string(&info).unwrap()).into()
    }

    #[test]
    fn test_not_found_keeps_backend_message() {
        let err = translate(remote(404, "No product found for productId: 1"));
        assert_eq!(
            err,
            CompositeError::NotFound("No product found for productId: 1".to_string())
        );
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_unprocessable_is_invalid_input() {
        let err = translate(remote(422, "Duplicate key, Product Id: 1"));
        assert!(matches!(err, CompositeError::InvalidInput(ref m) if m == "Duplicate key, Product Id: 1"));
        assert_eq!(err.status(), 422);
        assert!(!err.is_unexpected());
    }

    #[test]
    fn test_other_statuses_pass_through() {
        let err = translate(remote(500, "disk on fire"));
        assert_eq!(
            err,
            CompositeError::Upstream {
                status: 500,
                message: "disk on fire".to_string(),
                path: Some("/product/1".to_string()),
            }
        );
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "disk on fire");
        assert!(err.is_unexpected());
    }

    #[test]
    fn test_transport_failures_map_to_gateway_statuses() {
        let timeout = translate(
            TransportFailure::Timeout {
                url: "http://review:7003/review".to_string(),
            }
            .into(),
        );
        let refused = translate(
            TransportFailure::Unreachable {
                url: "http://review:7003/review".to_string(),
                reason: "connection refused".to_string(),
            }
            .into(),
        );
        assert_eq!(timeout.status(), 504);
        assert_eq!(refused.status(), 502);
        assert!(refused.is_unexpected());
    }

    #[test]
    fn test_product_id_must_be_positive() {
        assert!(validate_product_id(1).is_ok());
        assert_eq!(
            validate_product_id(0),
            Err(CompositeError::InvalidInput("Invalid productId: 0".to_string()))
        );
        assert!(validate_product_id(-5).is_err());
    }
}
