//! Wire shapes served by the habitat API.
//!
//! These mirror the JSON the dashboard consumes. All fields are decoded
//! once at the boundary into these structs; rendering code never does
//! best-effort lookups against raw JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Response for the health check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthStatus {
    /// Service status string (`healthy` in normal operation).
    pub status: String,
    /// Server time when the check ran.
    pub timestamp: DateTime<Utc>,
    /// Service version.
    pub version: String,
    /// Human-readable service name.
    pub system: String,
}

// ---------------------------------------------------------------------------
// GET /api/dataset/info
// ---------------------------------------------------------------------------

/// Metadata about the currently loaded satellite dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DatasetInfo {
    /// Where the data came from (satellite mission or demo source).
    pub data_source: String,
    /// Acquisition date, `YYYY-MM-DD`.
    pub date: String,
    /// Grid dimensions rendered as a human-readable string.
    pub spatial_resolution: String,
    /// Field names available for prediction.
    pub available_fields: Vec<String>,
    /// Geographic coverage description.
    pub coverage_area: String,
    /// Pipeline readiness indicator.
    pub processing_status: String,
}

// ---------------------------------------------------------------------------
// POST /api/prediction/basic
// ---------------------------------------------------------------------------

/// Basic habitat suitability prediction: a single normalized HSI grid
/// derived from chlorophyll alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BasicPrediction {
    /// Habitat suitability index grid, normalized to `[0, 1]`.
    pub hsi: Vec<Vec<f64>>,
    /// Grid dimensions as `(rows, cols)`.
    pub shape: (usize, usize),
    /// Method identifier.
    pub method: String,
    /// When the prediction was computed.
    pub timestamp: DateTime<Utc>,
    /// NaN-aware statistics over the HSI grid.
    pub statistics: crate::grid::GridStatistics,
}

// ---------------------------------------------------------------------------
// POST /api/prediction/advanced
// ---------------------------------------------------------------------------

/// Metadata attached to an advanced prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PredictionMetadata {
    /// Whether trophic modeling contributed to the prediction.
    pub trophic_modeling: String,
    /// Whether an uncertainty component was produced.
    pub uncertainty_quantification: String,
    /// Grid dimensions, absent when no field is loaded.
    pub spatial_resolution: Option<(usize, usize)>,
}

/// Advanced habitat prediction: a map of named grid components plus
/// metadata about the modeling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdvancedPrediction {
    /// When the prediction was computed.
    pub timestamp: DateTime<Utc>,
    /// Method identifier.
    pub method: String,
    /// Named prediction components (chlorophyll, prey availability, ...).
    pub components: BTreeMap<String, crate::grid::GridComponent>,
    /// Modeling run metadata.
    pub metadata: PredictionMetadata,
}

// ---------------------------------------------------------------------------
// GET /api/trophic/timeseries
// ---------------------------------------------------------------------------

/// Cosmetic time-lag labels shown alongside the cascade explanation.
///
/// These are presentation flavor text, not parameters of the cascade math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimeLags {
    /// Label for the phytoplankton-to-zooplankton lag.
    pub phyto_to_zoo: String,
    /// Label for the zooplankton-to-fish lag.
    pub zoo_to_fish: String,
    /// Label for the fish-to-shark lag.
    pub fish_to_shark: String,
}

/// Explanation block describing each level of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CascadeExplanation {
    /// What the phytoplankton series represents.
    pub phytoplankton: String,
    /// What the zooplankton series represents.
    pub zooplankton: String,
    /// What the small-fish series represents.
    pub small_fish: String,
    /// What the shark series represents.
    pub sharks: String,
    /// Cosmetic lag labels.
    pub time_lags: TimeLags,
}

/// Trophic cascade time series for the educational chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrophicTimeSeries {
    /// One series per level, keyed by series key (`phytoplankton`, ...).
    pub trophic_cascade: BTreeMap<String, Vec<f64>>,
    /// Per-level explanation block.
    pub explanation: CascadeExplanation,
    /// Educational note displayed under the chart.
    pub educational_note: String,
}

// ---------------------------------------------------------------------------
// POST /api/tag/simulation
// ---------------------------------------------------------------------------

/// Request body for the shark-tag simulation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TagSimulationRequest {
    /// Simulated deployment length in hours. The dashboard slider offers
    /// 1 to 24; defaults to 4.
    #[serde(default = "default_duration_hours")]
    pub duration_hours: f64,
}

impl Default for TagSimulationRequest {
    fn default() -> Self {
        Self {
            duration_hours: default_duration_hours(),
        }
    }
}

const fn default_duration_hours() -> f64 {
    4.0
}

/// A detected feeding event in a simulated tag record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedingEvent {
    /// Hours since deployment start.
    pub timestamp: f64,
    /// Event duration in seconds.
    pub duration: f64,
    /// Relative feeding intensity in `[0, 1]`.
    pub intensity: f64,
    /// Event position as `(latitude, longitude)`.
    pub location: (f64, f64),
}

/// Raw sensor traces and detections from a simulated tag deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TagResults {
    /// Detected feeding events in chronological order.
    pub feeding_events: Vec<FeedingEvent>,
    /// Behavioral state per sample: 0 resting, 1 traveling, 2 hunting,
    /// 3 feeding.
    pub behavioral_states: Vec<u8>,
    /// Accelerometer magnitude per sample.
    pub accelerometer_data: Vec<f64>,
    /// Depth in meters per sample (positive down).
    pub depth_data: Vec<f64>,
}

/// Full response for a shark-tag simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TagSimulation {
    /// Sensor traces and detections.
    pub simulation_results: TagResults,
    /// Requested deployment length in hours.
    pub duration_hours: f64,
    /// When the simulation ran.
    pub timestamp: DateTime<Utc>,
    /// Educational note displayed with the results.
    pub educational_note: String,
}

// ---------------------------------------------------------------------------
// GET /api/educational/content
// ---------------------------------------------------------------------------

/// One section of the educational walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EducationSection {
    /// Section heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Identifier of the visual the dashboard shows for this section.
    pub visual_aid: String,
}

/// The full educational content payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EducationalContent {
    /// Page title.
    pub title: String,
    /// Ordered walkthrough sections.
    pub sections: Vec<EducationSection>,
    /// Closing conservation message.
    pub conservation_message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tag_request_defaults_to_four_hours() {
        let req: TagSimulationRequest = serde_json::from_str("{}").unwrap();
        assert!((req.duration_hours - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn advanced_prediction_round_trips() {
        let mut components = BTreeMap::new();
        components.insert(
            "chlorophyll".to_owned(),
            crate::grid::GridComponent::from_grid(vec![vec![0.5, 1.5]]),
        );
        let prediction = AdvancedPrediction {
            timestamp: Utc::now(),
            method: "advanced_mathematical_framework".to_owned(),
            components,
            metadata: PredictionMetadata {
                trophic_modeling: "enabled".to_owned(),
                uncertainty_quantification: "enabled".to_owned(),
                spatial_resolution: Some((1, 2)),
            },
        };
        let json = serde_json::to_string(&prediction).unwrap();
        let back: AdvancedPrediction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prediction);
    }

    #[test]
    fn feeding_event_location_serializes_as_pair() {
        let event = FeedingEvent {
            timestamp: 1.25,
            duration: 30.0,
            intensity: 0.8,
            location: (34.0, -118.0),
        };
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value.get("location").unwrap(), &serde_json::json!([34.0, -118.0]));
    }
}
