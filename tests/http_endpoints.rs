// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use merlin_tracker::{
    AppState, AuthMethod, Config, ConnectionHealth, Device, MetricsRegistry, PollResult,
    RouterConfig, RouterLabels, WanCounters, create_router,
};
use std::sync::Arc;
use tower::ServiceExt;

const LAPTOP: &str = "AA:BB:CC:DD:EE:FF";

fn make_state(enabled: &[&str]) -> Arc<AppState> {
    let mut config = Config::with_router(RouterConfig {
        host: "192.168.1.1".to_string(),
        port: 22,
        username: "admin".to_string(),
        auth: AuthMethod::Password(secrecy::SecretString::from("password".to_string())),
    });
    config.enabled_devices = enabled.iter().map(|s| (*s).to_string()).collect();
    Arc::new(AppState::new(config, MetricsRegistry::new()))
}

async fn seed_laptop(state: &AppState) {
    let result = PollResult {
        devices: vec![Device {
            mac: LAPTOP.to_string(),
            hostname: "laptop".to_string(),
            ip: Some("192.168.1.20".to_string()),
            is_connected: true,
        }],
        wan: Some(WanCounters {
            rx_bytes: 1024 * 1024 * 1024,
            tx_bytes: 0,
        }),
    };
    state.tracker.write().await.apply_poll(&result, Utc::now());
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// --- /metrics endpoint ---

#[tokio::test]
async fn metrics_returns_200_with_openmetrics_content_type() {
    let app = create_router(make_state(&[]));

    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        ct.contains("openmetrics-text"),
        "Expected OpenMetrics content-type, got: {ct}"
    );
}

#[tokio::test]
async fn metrics_contains_device_data_after_update() {
    let state = make_state(&[LAPTOP]);
    seed_laptop(&state).await;
    let labels = RouterLabels {
        router: "192.168.1.1".to_string(),
    };
    {
        let tracker = state.tracker.read().await;
        state
            .metrics
            .update_presence(&labels, &tracker, Utc::now())
            .await;
    }
    state.metrics.record_poll_success(&labels);

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();

    assert!(body.contains("router=\"192.168.1.1\""));
    assert!(body.contains("entity_id=\"device_tracker.laptop\""));
    assert!(body.contains("merlin_devices_active"));
    assert!(body.contains("merlin_poll_success_total"));
}

// --- /health endpoint ---

#[tokio::test]
async fn health_returns_pending_before_first_poll() {
    let app = create_router(make_state(&[]));

    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health = body_json(resp).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["router"]["status"], "pending");
    assert!(!health["router"]["has_successful_poll"].as_bool().unwrap());
}

#[tokio::test]
async fn health_returns_503_on_errors_without_success() {
    let state = make_state(&[]);
    *state.health.write().await = ConnectionHealth {
        consecutive_errors: 1,
        has_succeeded: false,
        connected: false,
    };

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let health = body_json(resp).await;
    assert_eq!(health["status"], "unhealthy");
    assert_eq!(health["router"]["status"], "error");
}

#[tokio::test]
async fn health_tolerates_a_few_errors_after_success() {
    let state = make_state(&[]);
    *state.health.write().await = ConnectionHealth {
        consecutive_errors: 2,
        has_succeeded: true,
        connected: false,
    };

    let app = create_router(state.clone());
    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    state.health.write().await.consecutive_errors = 3;
    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// --- /devices endpoints ---

#[tokio::test]
async fn devices_lists_registered_entities_disabled_by_default() {
    let state = make_state(&[]);
    seed_laptop(&state).await;

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/devices").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let devices = body_json(resp).await;
    let devices = devices.as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["entity_id"], "device_tracker.laptop");
    assert_eq!(devices[0]["enabled"], false);
    assert!(devices[0]["state"].is_null());
    assert_eq!(devices[0]["attributes"]["mac"], LAPTOP);
}

#[tokio::test]
async fn enable_device_publishes_state() {
    let state = make_state(&[]);
    seed_laptop(&state).await;

    let app = create_router(state.clone());
    let resp = app
        .oneshot(
            Request::post("/devices/aa-bb-cc-dd-ee-ff/enable")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let entity = body_json(resp).await;
    assert_eq!(entity["enabled"], true);
    assert_eq!(entity["state"], "home");
    assert_eq!(entity["attributes"]["ip"], "192.168.1.20");

    let app = create_router(state);
    let resp = app
        .oneshot(
            Request::post(format!("/devices/{LAPTOP}/disable"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["enabled"], false);
}

#[tokio::test]
async fn unknown_device_returns_404() {
    let app = create_router(make_state(&[]));

    let resp = app
        .oneshot(
            Request::get("/devices/11:22:33:44:55:66")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_mac_returns_400() {
    let app = create_router(make_state(&[]));

    let resp = app
        .oneshot(
            Request::post("/devices/not-a-mac/enable")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- /router endpoint ---

#[tokio::test]
async fn router_summary_reports_counts_and_wan() {
    let state = make_state(&[]);
    seed_laptop(&state).await;

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/router").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let summary = body_json(resp).await;
    assert_eq!(summary["router_status"], "connected");
    assert_eq!(summary["host"], "192.168.1.1");
    assert_eq!(summary["update_interval_seconds"], 30);
    assert_eq!(summary["active_devices"], 1);
    assert_eq!(summary["total_devices"], 1);
    assert_eq!(summary["wan"]["total_download_gb"], 1.0);
}

// --- 404 for unknown routes ---

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = create_router(make_state(&[]));

    let resp = app
        .oneshot(Request::get("/unknown").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
