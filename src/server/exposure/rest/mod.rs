//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` carrying the health
//! routes, every registered entity's routes and any custom routes, wrapped in
//! request tracing.

use super::super::host::ServerHost;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// The returned router has:
    /// - Health check routes (`/health`, `/healthz`)
    /// - Entity routes under `/api/v1`
    /// - Custom routes
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let mut app = Self::health_routes(&host).merge(host.entity_registry.build_routes(&host));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        tracing::info!(
            backend = host.store.backend_name(),
            resources = ?host.entity_registry.resources(),
            "REST routes built"
        );

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Build health check routes
    fn health_routes(host: &ServerHost) -> Router {
        let body = json!({
            "status": "ok",
            "service": "devcamper",
            "backend": host.store.backend_name(),
            "resources": host.entity_registry.resources(),
        });
        let handler = move || Self::health_check(body.clone());

        Router::new()
            .route("/health", get(handler.clone()))
            .route("/healthz", get(handler))
    }

    /// Health check endpoint handler
    async fn health_check(body: Value) -> Json<Value> {
        Json(body)
    }
}
