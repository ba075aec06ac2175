//! Application configuration loaded from environment variables.

use std::time::Duration;

use client::ServiceAddress;
use composite::BackendAddresses;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `7000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `PRODUCT_SERVICE_HOST` / `PRODUCT_SERVICE_PORT` (default: `localhost:7001`)
/// - `RECOMMENDATION_SERVICE_HOST` / `RECOMMENDATION_SERVICE_PORT` (default: `localhost:7002`)
/// - `REVIEW_SERVICE_HOST` / `REVIEW_SERVICE_PORT` (default: `localhost:7003`)
/// - `REMOTE_TIMEOUT_MS` — per-call timeout towards the backends (default: `5000`)
/// - `SERVICE_ADDRESS` — address reported in composite provenance
///   (default: `$HOSTNAME:port`, or `host:port` without `HOSTNAME`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub product_service: ServiceAddress,
    pub recommendation_service: ServiceAddress,
    pub review_service: ServiceAddress,
    pub remote_timeout: Duration,
    pub service_address: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let host = lookup("HOST").unwrap_or(defaults.host);

        let backend = |prefix: &str, fallback: ServiceAddress| {
            ServiceAddress::new(
                lookup(&format!("{prefix}_SERVICE_HOST")).unwrap_or(fallback.host),
                lookup(&format!("{prefix}_SERVICE_PORT"))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(fallback.port),
            )
        };

        let service_address = lookup("SERVICE_ADDRESS").unwrap_or_else(|| {
            let name = lookup("HOSTNAME").unwrap_or_else(|| host.clone());
            format!("{name}:{port}")
        });

        Self {
            product_service: backend("PRODUCT", defaults.product_service),
            recommendation_service: backend("RECOMMENDATION", defaults.recommendation_service),
            review_service: backend("REVIEW", defaults.review_service),
            remote_timeout: lookup("REMOTE_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.remote_timeout),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            service_address,
            host,
            port,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Backend addresses consumed by the composite gateways.
    pub fn backend_addresses(&self) -> BackendAddresses {
        BackendAddresses {
            product: self.product_service.clone(),
            recommendation: self.recommendation_service.clone(),
            review: self.review_service.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            log_level: "info".to_string(),
            product_service: ServiceAddress::new("localhost", 7001),
            recommendation_service: ServiceAddress::new("localhost", 7002),
            review_service: ServiceAddress::new("localhost", 7003),
            remote_timeout: Duration::from_millis(5000),
            service_address: "0.0.0.0:7000".to_string(),
        }
    }
}
