//! Diagnostics sink injected into the gateways.

use std::sync::{Arc, RwLock};

use common::ProductId;

use crate::error::CompositeError;

/// Backend a signal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Product,
    Recommendation,
    Review,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::Product => "product",
            Dependency::Recommendation => "recommendation",
            Dependency::Review => "review",
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives non-fatal signals from the gateways.
pub trait Diagnostics: Send + Sync {
    /// An enrichment fetch failed and was replaced by an empty collection.
    fn degraded(&self, dependency: Dependency, product_id: ProductId, reason: &str);

    /// A backend failed with something other than not-found or invalid input,
    /// or a delete failed for any reason.
    fn upstream_failure(
        &self,
        dependency: Dependency,
        operation: &'static str,
        error: &CompositeError,
    );
}

/// Default sink: structured logs plus counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn degraded(&self, dependency: Dependency, product_id: ProductId, reason: &str) {
        metrics::counter!("composite_degraded_total", "dependency" => dependency.as_str())
            .increment(1);
        tracing::warn!(
            %dependency,
            product_id,
            reason,
            "enrichment fetch failed, returning empty collection"
        );
    }

    fn upstream_failure(
        &self,
        dependency: Dependency,
        operation: &'static str,
        error: &CompositeError,
    ) {
        metrics::counter!(
            "composite_upstream_failures_total",
            "dependency" => dependency.as_str(),
            "operation" => operation
        )
        .increment(1);
        tracing::warn!(
            %dependency,
            operation,
            status = error.status(),
            error = %error,
            "unexpected upstream failure"
        );
    }
}

/// A signal captured by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Degraded {
        dependency: Dependency,
        product_id: ProductId,
        reason: String,
    },
    UpstreamFailure {
        dependency: Dependency,
        operation: &'static str,
        status: u16,
    },
}

/// In-memory sink for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    signals: Arc<RwLock<Vec<Signal>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every signal recorded so far.
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.read().unwrap().clone()
    }

    /// Returns the dependencies reported as degraded, in order.
    pub fn degraded_dependencies(&self) -> Vec<Dependency> {
        self.signals
            .read()
            .unwrap()
            .iter()
            .filter_map(|s| match s {
                Signal::Degraded { dependency, .. } => Some(*dependency),
                Signal::UpstreamFailure { .. } => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn degraded(&self, dependency: Dependency, product_id: ProductId, reason: &str) {
        self.signals.write().unwrap().push(Signal::Degraded {
            dependency,
            product_id,
            reason: reason.to_string(),
        });
    }

    fn upstream_failure(
        &self,
        dependency: Dependency,
        operation: &'static str,
        error: &CompositeError,
    ) {
        self.signals.write().unwrap().push(Signal::UpstreamFailure {
            dependency,
            operation,
            status: error.status(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingDiagnostics::new();
        sink.degraded(Dependency::Review, 3, "connection refused");
        sink.upstream_failure(
            Dependency::Product,
            "fetch",
            &CompositeError::Upstream {
                status: 500,
                message: "boom".to_string(),
                path: None,
            },
        );
        sink.degraded(Dependency::Recommendation, 3, "timed out");

        assert_eq!(
            sink.degraded_dependencies(),
            vec![Dependency::Review, Dependency::Recommendation]
        );
        assert_eq!(sink.signals().len(), 3);
        assert_eq!(
            sink.signals()[1],
            Signal::UpstreamFailure {
                dependency: Dependency::Product,
                operation: "fetch",
                status: 500,
            }
        );
    }
}
