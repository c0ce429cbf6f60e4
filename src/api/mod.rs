//! HTTP API module for the Merlin presence tracker
//!
//! Provides REST API endpoints for health checks, Prometheus metrics export
//! and the device tracker entity registry.
//!
//! # Endpoints
//! - `GET /health`: health check
//! - `GET /metrics`: Prometheus metrics
//! - `GET /devices`: all registered entities
//! - `GET /devices/{mac}`: one entity
//! - `POST /devices/{mac}/enable`: enable an entity
//! - `POST /devices/{mac}/disable`: disable an entity
//! - `GET /router`: router summary sensor

pub mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub use state::AppState;

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/devices", get(handlers::list_devices))
        .route("/devices/{mac}", get(handlers::get_device))
        .route("/devices/{mac}/enable", post(handlers::enable_device))
        .route("/devices/{mac}/disable", post(handlers::disable_device))
        .route("/router", get(handlers::router_summary))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, Config, RouterConfig};
    use crate::metrics::MetricsRegistry;

    fn config() -> Config {
        Config::with_router(RouterConfig {
            host: "192.168.1.1".to_string(),
            port: 22,
            username: "admin".to_string(),
            auth: AuthMethod::KeyFile("/root/.ssh/id_ed25519".into()),
        })
    }

    #[test]
    fn test_create_router() {
        let app_state = Arc::new(AppState::new(config(), MetricsRegistry::new()));

        let _router = create_router(app_state);
        // If we get here without panicking, the router was created successfully
    }

    #[tokio::test]
    async fn test_app_state_creation() {
        let state = AppState::new(config(), MetricsRegistry::new());

        assert_eq!(state.config.server_addr, "0.0.0.0:9100");
        assert_eq!(state.config.poll_interval_secs, 30);
        assert_eq!(state.router_labels().router, "192.168.1.1");
        assert_eq!(state.tracker.read().await.entities().count(), 0);
    }
}
