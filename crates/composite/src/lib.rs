//! Composite orchestration over the product, recommendation and review
//! services.
//!
//! Reads go through the [`Aggregator`], which resolves the product first and
//! then fetches recommendations and reviews concurrently. Those two are
//! enrichment data: their failures degrade to empty lists. Writes and deletes
//! go through the [`Orchestrator`]. Nothing is rolled back on failure.
//!
//! Every backend call passes through a per-domain gateway which owns the
//! translation from client failures into [`CompositeError`].

pub mod aggregator;
pub mod diagnostics;
pub mod error;
pub mod gateways;
pub mod orchestrator;

pub use aggregator::Aggregator;
pub use diagnostics::{Dependency, Diagnostics, RecordingDiagnostics, Signal, TracingDiagnostics};
pub use error::{CompositeError, Result, translate};
pub use gateways::{
    BackendAddresses, Gateways, ProductGateway, RecommendationGateway, ReviewGateway,
};
pub use orchestrator::Orchestrator;
