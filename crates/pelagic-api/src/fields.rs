//! Ocean field storage and the habitat prediction math.
//!
//! [`OceanFields`] holds the chlorophyll grid every prediction is derived
//! from. The grid comes either from a JSON file (a pre-processed satellite
//! granule) or, when none is configured or loading fails, from a seeded
//! synthetic field so the service always has data to serve -- the demo
//! mode of the original pipeline.
//!
//! The math is display-calibrated, not oceanographically rigorous: the
//! basic habitat index is a normalized `ln(1 + chlorophyll)`, and the
//! advanced components are simple transforms of it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use pelagic_types::{
    AdvancedPrediction, BasicPrediction, CascadeExplanation, DatasetInfo, GridComponent,
    GridStatistics, PredictionMetadata, TimeLags, TrophicRank, TrophicTimeSeries,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{info, warn};

/// Guard against division by zero when a grid is constant.
const NORMALIZE_EPSILON: f64 = 1e-6;

/// Fraction of synthetic cells masked out as cloud gaps.
const CLOUD_GAP_FRACTION: f64 = 0.02;

/// Days covered by the trophic time series.
const TIMESERIES_DAYS: u32 = 30;

/// Cosmetic per-rank lag, in days, used only for the time-series phase
/// shift and the explanation labels.
const LAG_DAYS_PER_RANK: f64 = 5.0;

/// Errors that can occur when loading a grid file.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The grid file could not be read.
    #[error("failed to read grid file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The grid file is not valid JSON of the expected shape.
    #[error("failed to parse grid file: {source}")]
    Parse {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Configuration for building the ocean field set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldConfig {
    /// Optional path to a pre-processed JSON grid file.
    #[serde(default)]
    pub grid_path: Option<PathBuf>,

    /// Seed for the synthetic field and the tag simulation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Synthetic grid rows.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Synthetic grid columns.
    #[serde(default = "default_cols")]
    pub cols: usize,

    /// Acquisition date reported in dataset info, `YYYY-MM-DD`.
    #[serde(default = "default_date")]
    pub date: String,

    /// Coverage description reported in dataset info.
    #[serde(default = "default_coverage")]
    pub coverage_area: String,
}

const fn default_seed() -> u64 {
    42
}

const fn default_rows() -> usize {
    40
}

const fn default_cols() -> usize {
    60
}

fn default_date() -> String {
    String::from("2025-10-04")
}

fn default_coverage() -> String {
    String::from("Southern California Bight")
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_path: None,
            seed: default_seed(),
            rows: default_rows(),
            cols: default_cols(),
            date: default_date(),
            coverage_area: default_coverage(),
        }
    }
}

/// On-disk shape of a pre-processed grid file.
#[derive(Debug, Deserialize)]
struct GridFile {
    /// Chlorophyll-a concentration grid, row major.
    chlor_a: Vec<Vec<f64>>,
    /// Optional source label overriding the default.
    data_source: Option<String>,
}

/// The loaded ocean field set and everything derived from it.
#[derive(Debug, Clone)]
pub struct OceanFields {
    chlor: Vec<Vec<f64>>,
    data_source: String,
    date: String,
    coverage_area: String,
}

impl OceanFields {
    /// Build the field set from configuration: load the configured grid
    /// file if any, otherwise synthesize a demo field. A load failure is
    /// logged once and falls back to the synthetic field.
    pub fn from_config(config: &FieldConfig) -> Self {
        if let Some(path) = &config.grid_path {
            match Self::from_json_file(path, config) {
                Ok(fields) => {
                    info!(path = %path.display(), "loaded grid file");
                    return fields;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "grid load failed, using synthetic field");
                }
            }
        }
        Self::synthetic(config)
    }

    /// Load a pre-processed JSON grid file.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path, config: &FieldConfig) -> Result<Self, FieldError> {
        let contents = std::fs::read_to_string(path)?;
        let file: GridFile = serde_json::from_str(&contents)?;
        Ok(Self {
            chlor: file.chlor_a,
            data_source: file
                .data_source
                .unwrap_or_else(|| String::from("NASA PACE Satellite")),
            date: config.date.clone(),
            coverage_area: config.coverage_area.clone(),
        })
    }

    /// Generate a seeded synthetic chlorophyll field: a low background
    /// concentration with a handful of Gaussian bloom patches, per-cell
    /// noise, and sparse NaN gaps standing in for cloud cover.
    pub fn synthetic(config: &FieldConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let rows = config.rows.max(1);
        let cols = config.cols.max(1);

        // Bloom patch centers and strengths in normalized coordinates.
        let bloom_count = rng.random_range(3..6);
        let blooms: Vec<(f64, f64, f64, f64)> = (0..bloom_count)
            .map(|_| {
                (
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.5..3.0),
                    rng.random_range(0.05..0.15),
                )
            })
            .collect();

        let chlor = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        if rng.random_range(0.0..1.0) < CLOUD_GAP_FRACTION {
                            return f64::NAN;
                        }
                        let y = index_fraction(r, rows);
                        let x = index_fraction(c, cols);
                        let mut value = 0.15 + rng.random_range(0.0..0.05);
                        for (by, bx, amplitude, sigma) in &blooms {
                            let d2 = (y - by).powi(2) + (x - bx).powi(2);
                            value += amplitude * (-d2 / (2.0 * sigma * sigma)).exp();
                        }
                        value
                    })
                    .collect()
            })
            .collect();

        Self {
            chlor,
            data_source: format!("Synthetic demo field (seed {})", config.seed),
            date: config.date.clone(),
            coverage_area: config.coverage_area.clone(),
        }
    }

    /// Whether a usable chlorophyll grid is loaded.
    pub fn has_chlorophyll(&self) -> bool {
        self.chlor.iter().any(|row| !row.is_empty())
    }

    /// Grid dimensions as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.chlor.len(), self.chlor.first().map_or(0, Vec::len))
    }

    /// Metadata about the loaded dataset.
    pub fn dataset_info(&self) -> DatasetInfo {
        let (rows, cols) = self.shape();
        DatasetInfo {
            data_source: self.data_source.clone(),
            date: self.date.clone(),
            spatial_resolution: format!("({rows}, {cols})"),
            available_fields: vec![String::from("chlor_a")],
            coverage_area: self.coverage_area.clone(),
            processing_status: String::from("ready"),
        }
    }

    /// Basic habitat prediction: normalized `ln(1 + chlorophyll)`.
    ///
    /// Returns `None` when no chlorophyll grid is loaded.
    pub fn basic_prediction(&self) -> Option<BasicPrediction> {
        if !self.has_chlorophyll() {
            return None;
        }
        let hsi = self.normalized_hsi();
        let statistics = GridStatistics::from_grid(&hsi);
        let shape = self.shape();
        Some(BasicPrediction {
            hsi,
            shape,
            method: String::from("basic_chlorophyll"),
            timestamp: Utc::now(),
            statistics,
        })
    }

    /// Advanced habitat prediction: the normalized chlorophyll index plus
    /// prey availability, a thermal band, the combined index, and an
    /// uncertainty estimate, each with statistics.
    ///
    /// Returns `None` when no chlorophyll grid is loaded.
    pub fn advanced_prediction(&self) -> Option<AdvancedPrediction> {
        if !self.has_chlorophyll() {
            return None;
        }

        let chlor_index = self.normalized_hsi();
        let prey = neighborhood_mean(&chlor_index, TrophicRank::Zooplankton.damping());
        let thermal = self.thermal_band();
        let combined = combine_components(&chlor_index, &prey, &thermal);
        let uncertainty = uncertainty_from(&chlor_index, &prey);

        let mut components = BTreeMap::new();
        components.insert(
            String::from("chlorophyll_index"),
            GridComponent::from_grid(chlor_index),
        );
        components.insert(
            String::from("prey_availability"),
            GridComponent::from_grid(prey),
        );
        components.insert(
            String::from("thermal_suitability"),
            GridComponent::from_grid(thermal),
        );
        components.insert(
            String::from("advanced_hsi"),
            GridComponent::from_grid(combined),
        );
        components.insert(
            String::from("uncertainty"),
            GridComponent::from_grid(uncertainty),
        );

        Some(AdvancedPrediction {
            timestamp: Utc::now(),
            method: String::from("advanced_mathematical_framework"),
            components,
            metadata: PredictionMetadata {
                trophic_modeling: String::from("enabled"),
                uncertainty_quantification: String::from("enabled"),
                spatial_resolution: Some(self.shape()),
            },
        })
    }

    /// Mean of the basic habitat index, used as the habitat-quality scalar
    /// for the tag simulation. Zero when no grid is loaded.
    pub fn mean_habitat_quality(&self) -> f64 {
        self.basic_prediction()
            .map_or(0.0, |prediction| prediction.statistics.mean)
    }

    /// Trophic cascade time series for the educational chart.
    ///
    /// Each level's series is the phytoplankton seasonal cycle shifted by
    /// a cosmetic per-rank lag and scaled by the cascade damping factor,
    /// all anchored to the mean of the basic habitat index.
    pub fn trophic_timeseries(&self) -> TrophicTimeSeries {
        let base = self.mean_habitat_quality().max(0.1);

        let mut trophic_cascade = BTreeMap::new();
        for rank in TrophicRank::ALL {
            let damping = rank.damping();
            let lag_days = f64::from(rank.rank()) * LAG_DAYS_PER_RANK;
            let series = (0..TIMESERIES_DAYS)
                .map(|day| {
                    let phase =
                        (f64::from(day) - lag_days) / f64::from(TIMESERIES_DAYS) * std::f64::consts::TAU;
                    base * damping * (1.0 + 0.4 * phase.sin())
                })
                .collect();
            trophic_cascade.insert(rank.series_key().to_owned(), series);
        }

        TrophicTimeSeries {
            trophic_cascade,
            explanation: cascade_explanation(),
            educational_note: String::from(
                "This shows how satellite data connects to shark habitat through the ocean food web!",
            ),
        }
    }

    /// Normalized habitat index: `ln(1 + chlor)` rescaled to `[0, 1]`.
    /// NaN cells stay NaN so downstream statistics can skip them.
    fn normalized_hsi(&self) -> Vec<Vec<f64>> {
        let logged: Vec<Vec<f64>> = self
            .chlor
            .iter()
            .map(|row| row.iter().map(|&v| v.ln_1p()).collect())
            .collect();
        let stats = GridStatistics::from_grid(&logged);
        let span = stats.max - stats.min + NORMALIZE_EPSILON;
        logged
            .into_iter()
            .map(|row| row.into_iter().map(|v| (v - stats.min) / span).collect())
            .collect()
    }

    /// Synthetic thermal suitability: a Gaussian band across the rows,
    /// standing in for the preferred temperature range.
    fn thermal_band(&self) -> Vec<Vec<f64>> {
        let (rows, cols) = self.shape();
        (0..rows)
            .map(|r| {
                let y = index_fraction(r, rows.max(1));
                let band = (-(y - 0.5).powi(2) / (2.0 * 0.2_f64.powi(2))).exp();
                vec![band; cols]
            })
            .collect()
    }
}

/// Convert a grid index to a fraction of the grid extent.
fn index_fraction(index: usize, extent: usize) -> f64 {
    // Grids are a few thousand cells per side at most; the f64 mantissa
    // holds these exactly.
    #[allow(clippy::cast_precision_loss)]
    let fraction = index as f64 / extent.max(1) as f64;
    fraction
}

/// Read one cell, `None` outside the grid.
fn cell(grid: &[Vec<f64>], row: usize, col: usize) -> Option<f64> {
    grid.get(row).and_then(|r| r.get(col)).copied()
}

/// 3x3 neighborhood mean of finite cells, scaled by `factor`.
///
/// This is the prey-availability transform: grazers aggregate around
/// blooms, so their field is a smoothed, damped copy of the producer
/// field.
fn neighborhood_mean(grid: &[Vec<f64>], factor: f64) -> Vec<Vec<f64>> {
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);

    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let row_candidates = [r.checked_sub(1), Some(r), r.checked_add(1)];
                    let col_candidates = [c.checked_sub(1), Some(c), c.checked_add(1)];

                    let mut sum = 0.0;
                    let mut count = 0u32;
                    for nr in row_candidates.into_iter().flatten() {
                        for nc in col_candidates.into_iter().flatten() {
                            if let Some(v) = cell(grid, nr, nc)
                                && v.is_finite()
                            {
                                sum += v;
                                count = count.saturating_add(1);
                            }
                        }
                    }

                    if count == 0 {
                        f64::NAN
                    } else {
                        factor * sum / f64::from(count)
                    }
                })
                .collect()
        })
        .collect()
}

/// Weighted blend of the three component grids.
fn combine_components(
    chlor: &[Vec<f64>],
    prey: &[Vec<f64>],
    thermal: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    chlor
        .iter()
        .zip(prey)
        .zip(thermal)
        .map(|((chlor_row, prey_row), thermal_row)| {
            chlor_row
                .iter()
                .zip(prey_row)
                .zip(thermal_row)
                .map(|((&c, &p), &t)| 0.5 * c + 0.3 * p + 0.2 * t)
                .collect()
        })
        .collect()
}

/// Uncertainty estimate: a floor plus the disagreement between the
/// producer and prey fields.
fn uncertainty_from(chlor: &[Vec<f64>], prey: &[Vec<f64>]) -> Vec<Vec<f64>> {
    chlor
        .iter()
        .zip(prey)
        .map(|(chlor_row, prey_row)| {
            chlor_row
                .iter()
                .zip(prey_row)
                .map(|(&c, &p)| 0.05 + 0.25 * (c - p).abs())
                .collect()
        })
        .collect()
}

/// The fixed explanation block shown with the trophic chart.
///
/// The day labels are presentation flavor text, not parameters of the
/// cascade math.
fn cascade_explanation() -> CascadeExplanation {
    CascadeExplanation {
        phytoplankton: String::from("Primary producers (satellite chlorophyll data)"),
        zooplankton: String::from("Small marine animals that eat phytoplankton"),
        small_fish: String::from("Fish that feed on zooplankton"),
        sharks: String::from("Top predators that feed on small fish"),
        time_lags: TimeLags {
            phyto_to_zoo: String::from("5 days"),
            zoo_to_fish: String::from("10 days"),
            fish_to_shark: String::from("15+ days"),
        },
    }
}
