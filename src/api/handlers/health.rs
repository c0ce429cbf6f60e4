use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::router::ConnectionHealth;

/// Consecutive errors after which the service reports unhealthy
const UNHEALTHY_AFTER_ERRORS: u32 = 3;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub router: RouterHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouterHealth {
    pub status: String,
    pub consecutive_errors: u32,
    pub has_successful_poll: bool,
}

impl From<ConnectionHealth> for RouterHealth {
    fn from(health: ConnectionHealth) -> Self {
        let status = match (health.consecutive_errors, health.has_succeeded) {
            (0, true) => "connected",
            (0, false) => "pending",
            _ => "error",
        };
        Self {
            status: status.to_string(),
            consecutive_errors: health.consecutive_errors,
            has_successful_poll: health.has_succeeded,
        }
    }
}

fn is_failing(health: &ConnectionHealth) -> bool {
    health.consecutive_errors > 0
        && (!health.has_succeeded || health.consecutive_errors >= UNHEALTHY_AFTER_ERRORS)
}

/// GET /health
///
/// Returns 503 once the router has failed repeatedly or never answered.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = *state.health.read().await;
    let failing = is_failing(&health);

    let response = HealthResponse {
        status: if failing { "unhealthy" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        router: health.into(),
    };

    let code = if failing {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (code, Json(response))
}
