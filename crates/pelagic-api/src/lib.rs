//! Habitat API server for the Pelagic service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for dataset metadata, basic and advanced habitat
//!   predictions, the trophic time series, shark-tag simulation, and
//!   educational content
//! - **Cascade control endpoints** for the dashboard's interactive food-web
//!   animation (set perturbation, start, reset, status)
//! - **`WebSocket` endpoint** (`/ws/cascade`) streaming one
//!   [`CascadeFrame`](pelagic_cascade::CascadeFrame) per tick of a running
//!   cascade via [`tokio::sync::broadcast`]
//! - **Minimal HTML status page** (`GET /`) listing the endpoints
//!
//! # Architecture
//!
//! All prediction endpoints read from an immutable [`OceanFields`] grid set
//! built at startup, so request handling never blocks on data loading. The
//! cascade stepper sits behind an `RwLock`; exactly one driver task ticks
//! it at a time, and starting a cascade while one is running is a no-op.
//!
//! [`OceanFields`]: fields::OceanFields

pub mod control;
pub mod error;
pub mod fields;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod tag;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, spawn_server, start_server};
pub use state::AppState;
