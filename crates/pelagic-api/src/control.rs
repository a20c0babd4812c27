//! Cascade control REST handlers.
//!
//! These endpoints drive the dashboard's interactive food-web animation:
//! set a phytoplankton perturbation, start the staggered propagation run,
//! reset to baseline, and poll the current frame. Live frames are pushed
//! over the `/ws/cascade` `WebSocket`; the `GET` endpoint exists for
//! clients that prefer polling.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/cascade` | Current cascade frame |
//! | `POST` | `/api/cascade/perturbation` | Set phytoplankton change |
//! | `POST` | `/api/cascade/start` | Start a run |
//! | `POST` | `/api/cascade/reset` | Reset to baseline |

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/cascade/perturbation`.
#[derive(Debug, serde::Deserialize)]
pub struct PerturbationRequest {
    /// Phytoplankton change in percent, nominally `[-50, 50]`.
    pub change: f64,
}

/// Request body for `POST /api/cascade/start`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct StartRequest {
    /// Optional speed multiplier for this and subsequent runs.
    pub speed: Option<f64>,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct ControlResponse {
    /// Whether the operation changed anything.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// GET /api/cascade
// ---------------------------------------------------------------------------

/// Return the current cascade frame.
pub async fn cascade_status(State(state): State<AppState>) -> impl IntoResponse {
    let stepper = state.cascade.read().await;
    Json(stepper.frame())
}

// ---------------------------------------------------------------------------
// POST /api/cascade/perturbation
// ---------------------------------------------------------------------------

/// Store a new phytoplankton perturbation.
///
/// The value is stored as sent; the slider on the dashboard constrains it
/// to `[-50, 50]`. Non-finite values are rejected since they would poison
/// every later frame.
pub async fn set_perturbation(
    State(state): State<AppState>,
    Json(body): Json<PerturbationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !body.change.is_finite() {
        return Err(ApiError::InvalidRequest(
            "change must be a finite number".to_owned(),
        ));
    }

    let mut stepper = state.cascade.write().await;
    stepper.set_perturbation(body.change);
    drop(stepper);

    info!(change = body.change, "perturbation set");
    Ok(Json(ControlResponse {
        ok: true,
        message: format!("Phytoplankton change set to {}%", body.change),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/cascade/start
// ---------------------------------------------------------------------------

/// Start a cascade run with the stored perturbation.
///
/// Starting while a run is already in progress is a no-op; the response
/// says so and the running cascade continues undisturbed.
pub async fn start_cascade(
    State(state): State<AppState>,
    body: Option<Json<StartRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.unwrap_or_default();

    if let Some(speed) = body.speed {
        let mut stepper = state.cascade.write().await;
        stepper
            .set_speed(speed)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    }

    let started = state.start_cascade().await;
    let message = if started {
        "Cascade started".to_owned()
    } else {
        "Cascade already running".to_owned()
    };

    Ok(Json(ControlResponse {
        ok: started,
        message,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/cascade/reset
// ---------------------------------------------------------------------------

/// Reset the cascade to baseline.
///
/// Aborts the driver task mid-run if one is active, restores every level
/// to its baseline values, and zeroes the perturbation.
pub async fn reset_cascade(State(state): State<AppState>) -> impl IntoResponse {
    state.reset_cascade().await;

    let stepper = state.cascade.read().await;
    let frame = stepper.frame();
    drop(stepper);

    // Let pollers see the baseline without another request.
    Json(serde_json::json!({
        "ok": true,
        "message": "Cascade reset to baseline",
        "frame": frame,
    }))
}
