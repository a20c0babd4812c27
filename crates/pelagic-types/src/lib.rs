//! Shared type definitions for the Pelagic shark habitat service.
//!
//! This crate is the single source of truth for all types used across the
//! Pelagic workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the ocean dashboard.
//!
//! # Modules
//!
//! - [`levels`] -- Trophic ranks and per-level display state for the food web
//! - [`grid`] -- 2-D habitat grids with NaN-aware summary statistics
//! - [`api`] -- Wire shapes served by the habitat API and consumed by the
//!   dashboard fetch layer

pub mod api;
pub mod grid;
pub mod levels;

// Re-export all public types at crate root for convenience.
pub use api::{
    AdvancedPrediction, BasicPrediction, CascadeExplanation, DatasetInfo, EducationSection,
    EducationalContent, FeedingEvent, HealthStatus, PredictionMetadata, TagResults, TagSimulation,
    TagSimulationRequest, TimeLags, TrophicTimeSeries,
};
pub use grid::{GridComponent, GridStatistics};
pub use levels::{TrophicLevel, TrophicRank};
