//! 2-D habitat grids and their summary statistics.
//!
//! Satellite swaths contain gaps, so every statistic here is NaN-aware:
//! non-finite cells are skipped rather than poisoning the aggregate, the
//! same way the original pipeline used `nanmin`/`nanmax`/`nanmean`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Summary statistics over the finite cells of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridStatistics {
    /// Minimum finite value.
    pub min: f64,
    /// Maximum finite value.
    pub max: f64,
    /// Mean of finite values.
    pub mean: f64,
    /// Population standard deviation of finite values.
    pub std: f64,
}

impl GridStatistics {
    /// Compute statistics over a flat iterator of cell values.
    ///
    /// Non-finite values (NaN, infinities) are ignored. A grid with no
    /// finite cells yields all-zero statistics.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0u64;
        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            if !v.is_finite() {
                continue;
            }
            count = count.saturating_add(1);
            sum += v;
            sum_sq += v * v;
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        if count == 0 {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                std: 0.0,
            };
        }

        // Precision loss for counts beyond 2^52 cells is acceptable: grids
        // are a few thousand cells at most.
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);

        Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
        }
    }

    /// Compute statistics over a row-major grid.
    pub fn from_grid(grid: &[Vec<f64>]) -> Self {
        Self::from_values(grid.iter().flatten().copied())
    }
}

/// A single named component of a habitat prediction: the grid itself plus
/// its shape and statistics, as served over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridComponent {
    /// Row-major cell values.
    pub data: Vec<Vec<f64>>,
    /// Grid dimensions as `(rows, cols)`.
    pub shape: (usize, usize),
    /// NaN-aware summary statistics.
    pub statistics: GridStatistics,
}

impl GridComponent {
    /// Wrap a row-major grid, deriving shape and statistics.
    ///
    /// The column count is taken from the first row; ragged grids are not
    /// expected and the shape of an empty grid is `(0, 0)`.
    pub fn from_grid(data: Vec<Vec<f64>>) -> Self {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        let statistics = GridStatistics::from_grid(&data);
        Self {
            data,
            shape: (rows, cols),
            statistics,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn statistics_over_known_values() {
        let stats = GridStatistics::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.mean, 5.0);
        assert!((stats.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_cells_are_skipped() {
        let stats = GridStatistics::from_values([1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn all_nan_grid_yields_zeros() {
        let stats = GridStatistics::from_values([f64::NAN, f64::NAN]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn component_derives_shape() {
        let component = GridComponent::from_grid(vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);
        assert_eq!(component.shape, (2, 3));
        assert_eq!(component.statistics.max, 0.6);
    }

    #[test]
    fn empty_grid_shape_is_zero() {
        let component = GridComponent::from_grid(Vec::new());
        assert_eq!(component.shape, (0, 0));
    }
}
