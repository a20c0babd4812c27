//! REST API endpoint handlers for the habitat server.
//!
//! All prediction handlers read from the immutable
//! [`OceanFields`](crate::fields::OceanFields) in the shared
//! [`AppState`]; no handler blocks on data loading.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/health` | Liveness and identity |
//! | `GET` | `/api/dataset/info` | Loaded dataset metadata |
//! | `POST` | `/api/prediction/basic` | Chlorophyll-only habitat index |
//! | `POST` | `/api/prediction/advanced` | Full component map |
//! | `GET` | `/api/trophic/timeseries` | Per-level cascade series |
//! | `POST` | `/api/tag/simulation` | Simulated tag deployment |
//! | `GET` | `/api/educational/content` | Educational walkthrough |

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use pelagic_types::{
    EducationSection, EducationalContent, HealthStatus, TagSimulation, TagSimulationRequest,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::tag;

/// Service version reported by the health endpoint.
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
///
/// This is the placeholder view until the dashboard frontend is pointed
/// at the API.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let info = state.fields.dataset_info();
    let cascade = state.cascade.read().await;
    let running = if cascade.is_running() { "RUNNING" } else { "idle" };
    let step = cascade.current_step();
    drop(cascade);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Pelagic Habitat API</title>
    <style>
        body {{
            background: #03192e;
            color: #c9d7e4;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #4cc3ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #7d93a8; margin-top: 0; }}
        a {{ color: #4cc3ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        hr {{ border: none; border-top: 1px solid #13344f; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Pelagic Habitat API</h1>
    <p class="subtitle">Satellite-derived shark habitat predictions</p>

    <p>Dataset: {source} ({resolution}) &mdash; cascade: {running} (step {step})</p>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/health">/api/health</a></li>
        <li>GET <a href="/api/dataset/info">/api/dataset/info</a></li>
        <li>POST /api/prediction/basic</li>
        <li>POST /api/prediction/advanced</li>
        <li>GET <a href="/api/trophic/timeseries">/api/trophic/timeseries</a></li>
        <li>POST /api/tag/simulation</li>
        <li>GET <a href="/api/educational/content">/api/educational/content</a></li>
        <li>GET <a href="/api/cascade">/api/cascade</a></li>
        <li>POST /api/cascade/perturbation | /api/cascade/start | /api/cascade/reset</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/cascade</code> &mdash; live cascade frame stream</li>
    </ul>
</body>
</html>"#,
        source = info.data_source,
        resolution = info.spatial_resolution,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness check with service identity.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: String::from("healthy"),
        timestamp: Utc::now(),
        version: String::from(VERSION),
        system: String::from("Pelagic Shark Habitat Prediction"),
    })
}

// ---------------------------------------------------------------------------
// GET /api/dataset/info
// ---------------------------------------------------------------------------

/// Metadata about the loaded dataset.
pub async fn dataset_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.fields.dataset_info())
}

// ---------------------------------------------------------------------------
// POST /api/prediction/basic
// ---------------------------------------------------------------------------

/// Basic habitat suitability prediction from chlorophyll alone.
pub async fn prediction_basic(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .fields
        .basic_prediction()
        .map(Json)
        .ok_or_else(|| ApiError::NoData(String::from("No chlorophyll data available")))
}

// ---------------------------------------------------------------------------
// POST /api/prediction/advanced
// ---------------------------------------------------------------------------

/// Advanced habitat prediction with all components.
pub async fn prediction_advanced(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .fields
        .advanced_prediction()
        .map(Json)
        .ok_or_else(|| ApiError::NoData(String::from("No chlorophyll data available")))
}

// ---------------------------------------------------------------------------
// GET /api/trophic/timeseries
// ---------------------------------------------------------------------------

/// Trophic cascade time series for the educational chart.
pub async fn trophic_timeseries(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.fields.trophic_timeseries())
}

// ---------------------------------------------------------------------------
// POST /api/tag/simulation
// ---------------------------------------------------------------------------

/// Run a simulated shark-tag deployment.
///
/// The request body is optional; a missing body runs the default 4-hour
/// deployment.
pub async fn tag_simulation(
    State(state): State<AppState>,
    request: Option<Json<TagSimulationRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request.unwrap_or_default();
    if !request.duration_hours.is_finite() || request.duration_hours <= 0.0 {
        return Err(ApiError::InvalidRequest(format!(
            "duration_hours must be a positive number, got {}",
            request.duration_hours
        )));
    }

    let quality = state.fields.mean_habitat_quality();
    let results = tag::simulate(request.duration_hours, quality, state.tag_seed);

    Ok(Json(TagSimulation {
        simulation_results: results,
        duration_hours: request
            .duration_hours
            .clamp(tag::MIN_DURATION_HOURS, tag::MAX_DURATION_HOURS),
        timestamp: Utc::now(),
        educational_note: String::from(
            "This demonstrates how real shark tags could integrate with satellite habitat predictions!",
        ),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/educational/content
// ---------------------------------------------------------------------------

/// The educational walkthrough shown on the learning page.
pub async fn educational_content() -> Json<EducationalContent> {
    Json(EducationalContent {
        title: String::from("How Satellites Help Track Sharks"),
        sections: vec![
            EducationSection {
                title: String::from("Step 1: Satellites See Ocean Color"),
                content: String::from(
                    "The PACE satellite measures ocean color to detect tiny plants \
                     (phytoplankton) in the water.",
                ),
                visual_aid: String::from("chlorophyll_map"),
            },
            EducationSection {
                title: String::from("Step 2: Food Web Connections"),
                content: String::from(
                    "Phytoplankton feed zooplankton, zooplankton feed small fish, and \
                     small fish feed sharks!",
                ),
                visual_aid: String::from("trophic_cascade"),
            },
            EducationSection {
                title: String::from("Step 3: Time Delays Matter"),
                content: String::from(
                    "It takes around 30 days for phytoplankton blooms to affect shark \
                     populations through the food web.",
                ),
                visual_aid: String::from("time_series"),
            },
            EducationSection {
                title: String::from("Step 4: Predict Shark Hotspots"),
                content: String::from(
                    "By combining satellite data with ocean physics, we can predict \
                     where sharks are most likely to be!",
                ),
                visual_aid: String::from("habitat_map"),
            },
        ],
        conservation_message: String::from(
            "Understanding shark habitats helps protect these important ocean predators!",
        ),
    })
}
