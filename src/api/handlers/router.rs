use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::AppState;
use crate::tracker::RouterSummary;

/// GET /router
///
/// Router summary sensor with the latest WAN statistics.
pub async fn router_summary(State(state): State<Arc<AppState>>) -> Json<RouterSummary> {
    let tracker = state.tracker.read().await;
    Json(tracker.summary(
        &state.config.router.host,
        state.config.poll_interval_secs,
        chrono::Utc::now(),
    ))
}
