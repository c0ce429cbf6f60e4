//! Device tracker entity endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::router::parse::normalize_mac;
use crate::tracker::TrackerEntity;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Accepts `aa:bb:..` as well as `aa-bb-..` in the URL
fn path_mac(raw: &str) -> Option<String> {
    normalize_mac(&raw.replace('-', ":"))
}

fn not_found(mac: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("no device_tracker entity for {mac}"),
        }),
    )
        .into_response()
}

fn bad_mac(mac: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: format!("invalid MAC address: {mac}"),
        }),
    )
        .into_response()
}

/// GET /devices
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<Vec<TrackerEntity>> {
    let tracker = state.tracker.read().await;
    Json(tracker.entities().cloned().collect())
}

/// GET /devices/{mac}
pub async fn get_device(State(state): State<Arc<AppState>>, Path(mac): Path<String>) -> Response {
    let Some(mac) = path_mac(&mac) else {
        return bad_mac(&mac);
    };
    let tracker = state.tracker.read().await;
    match tracker.entity(&mac) {
        Some(entity) => Json(entity.clone()).into_response(),
        None => not_found(&mac),
    }
}

/// POST /devices/{mac}/enable
///
/// The entity state is refreshed right away; later polls keep it current.
pub async fn enable_device(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Response {
    let Some(mac) = path_mac(&mac) else {
        return bad_mac(&mac);
    };
    let mut tracker = state.tracker.write().await;
    if tracker.enable(&mac).is_none() {
        return not_found(&mac);
    }
    tracker.refresh(chrono::Utc::now());
    match tracker.entity(&mac) {
        Some(entity) => Json(entity.clone()).into_response(),
        None => not_found(&mac),
    }
}

/// POST /devices/{mac}/disable
pub async fn disable_device(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Response {
    let Some(mac) = path_mac(&mac) else {
        return bad_mac(&mac);
    };
    let mut tracker = state.tracker.write().await;
    match tracker.disable(&mac) {
        Some(entity) => Json(entity.clone()).into_response(),
        None => not_found(&mac),
    }
}
