//! Integration tests for the habitat API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pelagic_api::fields::{FieldConfig, OceanFields};
use pelagic_api::router::build_router;
use pelagic_api::state::AppState;
use pelagic_cascade::CascadeConfig;
use serde_json::Value;
use tower::ServiceExt;

fn make_test_state() -> AppState {
    let fields = OceanFields::synthetic(&FieldConfig {
        rows: 8,
        cols: 10,
        ..FieldConfig::default()
    });
    AppState::new(fields, CascadeConfig::default(), 42)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_health() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["system"], "Pelagic Shark Habitat Prediction");
}

#[tokio::test]
async fn test_dataset_info() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/api/dataset/info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["available_fields"][0], "chlor_a");
    assert_eq!(json["spatial_resolution"], "(8, 10)");
    assert_eq!(json["processing_status"], "ready");
}

#[tokio::test]
async fn test_prediction_basic() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post("/api/prediction/basic", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["method"], "basic_chlorophyll");
    assert_eq!(json["hsi"].as_array().unwrap().len(), 8);
    assert_eq!(json["shape"], serde_json::json!([8, 10]));
    let max = json["statistics"]["max"].as_f64().unwrap();
    assert!((0.0..=1.1).contains(&max));
}

#[tokio::test]
async fn test_prediction_advanced_has_all_components() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post("/api/prediction/advanced", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["method"], "advanced_mathematical_framework");
    assert_eq!(json["metadata"]["trophic_modeling"], "enabled");

    let components = json["components"].as_object().unwrap();
    for key in [
        "chlorophyll_index",
        "prey_availability",
        "thermal_suitability",
        "advanced_hsi",
        "uncertainty",
    ] {
        assert!(components.contains_key(key), "missing component {key}");
    }
}

#[tokio::test]
async fn test_trophic_timeseries() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/api/trophic/timeseries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    for key in [
        "phytoplankton",
        "zooplankton",
        "small_fish",
        "large_fish",
        "sharks",
    ] {
        assert_eq!(
            json["trophic_cascade"][key].as_array().unwrap().len(),
            30,
            "series {key}"
        );
    }
    assert!(json["explanation"]["time_lags"]["phyto_to_zoo"].is_string());
}

#[tokio::test]
async fn test_tag_simulation_default_duration() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post("/api/tag/simulation", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["duration_hours"], 4.0);
    let results = &json["simulation_results"];
    assert_eq!(results["behavioral_states"].as_array().unwrap().len(), 100);
    assert_eq!(results["depth_data"].as_array().unwrap().len(), 100);
}

#[tokio::test]
async fn test_tag_simulation_rejects_negative_duration() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post(
            "/api/tag/simulation",
            serde_json::json!({"duration_hours": -2.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("duration_hours"));
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_educational_content() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/api/educational/content")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["title"], "How Satellites Help Track Sharks");
    assert_eq!(json["sections"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_cascade_status_starts_at_baseline() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/api/cascade").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["step"], 0);
    assert_eq!(json["running"], false);
    assert_eq!(json["phytoplankton_change"], 0.0);
    assert_eq!(json["levels"].as_array().unwrap().len(), 5);
    assert_eq!(json["levels"][0]["biomass"], 100.0);
}

#[tokio::test]
async fn test_set_perturbation_then_status_reflects_it() {
    let state = make_test_state();

    let response = build_router(state.clone())
        .oneshot(json_post(
            "/api/cascade/perturbation",
            serde_json::json!({"change": -30.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(Request::get("/api/cascade").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["phytoplankton_change"], -30.0);
}

#[tokio::test]
async fn test_set_perturbation_rejects_nan() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post(
            "/api/cascade/perturbation",
            serde_json::json!({"change": "nan"}),
        ))
        .await
        .unwrap();

    // Serde rejects the non-numeric body before the handler runs.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_start_twice_reports_already_running() {
    let state = make_test_state();

    let response = build_router(state.clone())
        .oneshot(json_post("/api/cascade/start", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);

    let response = build_router(state.clone())
        .oneshot(json_post("/api/cascade/start", serde_json::json!({})))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["message"], "Cascade already running");

    state.reset_cascade().await;
}

#[tokio::test]
async fn test_start_rejects_bad_speed() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(json_post(
            "/api/cascade/start",
            serde_json::json!({"speed": 0.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_returns_baseline_frame() {
    let state = make_test_state();

    let _ = build_router(state.clone())
        .oneshot(json_post(
            "/api/cascade/perturbation",
            serde_json::json!({"change": 40.0}),
        ))
        .await
        .unwrap();
    let _ = build_router(state.clone())
        .oneshot(json_post("/api/cascade/start", serde_json::json!({})))
        .await
        .unwrap();

    let response = build_router(state)
        .oneshot(json_post("/api/cascade/reset", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["frame"]["step"], 0);
    assert_eq!(json["frame"]["running"], false);
    assert_eq!(json["frame"]["phytoplankton_change"], 0.0);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
