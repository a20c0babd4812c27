//! Axum router construction for the habitat API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{control, handlers, ws};

/// Build the complete Axum router for the habitat server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/cascade` -- `WebSocket` cascade frame stream
/// - `GET /api/health` -- liveness check
/// - `GET /api/dataset/info` -- dataset metadata
/// - `POST /api/prediction/basic` -- chlorophyll-only habitat index
/// - `POST /api/prediction/advanced` -- full component map
/// - `GET /api/trophic/timeseries` -- per-level cascade series
/// - `POST /api/tag/simulation` -- simulated tag deployment
/// - `GET /api/educational/content` -- educational walkthrough
/// - `GET /api/cascade` + `POST` perturbation/start/reset -- cascade control
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/cascade", get(ws::ws_cascade))
        // REST API
        .route("/api/health", get(handlers::health))
        .route("/api/dataset/info", get(handlers::dataset_info))
        .route("/api/prediction/basic", post(handlers::prediction_basic))
        .route(
            "/api/prediction/advanced",
            post(handlers::prediction_advanced),
        )
        .route("/api/trophic/timeseries", get(handlers::trophic_timeseries))
        .route("/api/tag/simulation", post(handlers::tag_simulation))
        .route(
            "/api/educational/content",
            get(handlers::educational_content),
        )
        // Cascade control
        .route("/api/cascade", get(control::cascade_status))
        .route("/api/cascade/perturbation", post(control::set_perturbation))
        .route("/api/cascade/start", post(control::start_cascade))
        .route("/api/cascade/reset", post(control::reset_cascade))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
