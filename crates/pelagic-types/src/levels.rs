//! Trophic ranks and per-level state for the ocean food web.
//!
//! The food chain is a fixed five-rank ladder from phytoplankton up to
//! sharks. The rank is an explicit field rather than an array position:
//! reordering or filtering a level list must never silently change how far
//! a level sits from the perturbation source.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Fraction of total cascade progress by which each successive rank lags
/// behind the one below it.
pub const LAG_FRACTION_PER_RANK: f64 = 0.2;

/// Multiplicative damping applied per step up the food chain.
pub const DAMPING_PER_RANK: f64 = 0.8;

/// Position of a level in the ocean food chain, from primary producers up
/// to apex predators.
///
/// The numeric rank (0 for phytoplankton through 4 for sharks) drives both
/// the propagation lag and the damping of a perturbation as it climbs the
/// chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TrophicRank {
    /// Primary producers measured by satellite chlorophyll.
    Phytoplankton,
    /// Small marine animals grazing on phytoplankton.
    Zooplankton,
    /// Fish that feed on zooplankton.
    SmallFish,
    /// Fish that feed on smaller fish.
    LargeFish,
    /// Apex predators at the top of the chain.
    Shark,
}

impl TrophicRank {
    /// All ranks in food-chain order, producers first.
    pub const ALL: [Self; 5] = [
        Self::Phytoplankton,
        Self::Zooplankton,
        Self::SmallFish,
        Self::LargeFish,
        Self::Shark,
    ];

    /// Distance from the base of the food chain (phytoplankton = 0).
    pub const fn rank(self) -> i32 {
        match self {
            Self::Phytoplankton => 0,
            Self::Zooplankton => 1,
            Self::SmallFish => 2,
            Self::LargeFish => 3,
            Self::Shark => 4,
        }
    }

    /// Fraction of total cascade progress this rank lags behind the source.
    pub fn lag_fraction(self) -> f64 {
        f64::from(self.rank()) * LAG_FRACTION_PER_RANK
    }

    /// Damping factor applied to a perturbation by the time it reaches
    /// this rank.
    pub fn damping(self) -> f64 {
        DAMPING_PER_RANK.powi(self.rank())
    }

    /// Human-readable display name used by the dashboard.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Phytoplankton => "Phytoplankton",
            Self::Zooplankton => "Zooplankton",
            Self::SmallFish => "Small Fish",
            Self::LargeFish => "Large Fish",
            Self::Shark => "Sharks",
        }
    }

    /// Key under which this rank appears in trophic time-series payloads.
    pub const fn series_key(self) -> &'static str {
        match self {
            Self::Phytoplankton => "phytoplankton",
            Self::Zooplankton => "zooplankton",
            Self::SmallFish => "small_fish",
            Self::LargeFish => "large_fish",
            Self::Shark => "sharks",
        }
    }

    /// Display color token for charts.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Phytoplankton => "#10B981",
            Self::Zooplankton => "#3B82F6",
            Self::SmallFish => "#8B5CF6",
            Self::LargeFish => "#F59E0B",
            Self::Shark => "#EF4444",
        }
    }

    /// Display icon token for charts.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Phytoplankton => "\u{1f9a0}",
            Self::Zooplankton => "\u{1f990}",
            Self::SmallFish => "\u{1f41f}",
            Self::LargeFish => "\u{1f420}",
            Self::Shark => "\u{1f988}",
        }
    }

    /// Baseline biomass displayed before any perturbation is applied.
    pub const fn baseline_biomass(self) -> f64 {
        match self {
            Self::Phytoplankton => 100.0,
            Self::Zooplankton => 80.0,
            Self::SmallFish => 60.0,
            Self::LargeFish => 40.0,
            Self::Shark => 20.0,
        }
    }

    /// Baseline energy displayed before any perturbation is applied.
    ///
    /// Proportional to baseline biomass at a factor of ten.
    pub const fn baseline_energy(self) -> f64 {
        self.baseline_biomass() * 10.0
    }
}

/// A single level of the food web as rendered by the dashboard.
///
/// `biomass` and `energy` are display-only quantities: the cascade stepper
/// clamps them to fixed bounds after every update, and they are not
/// physically calibrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrophicLevel {
    /// Explicit food-chain position of this level.
    pub rank: TrophicRank,
    /// Display name.
    pub name: String,
    /// Current biomass value, clamped to the display range.
    pub biomass: f64,
    /// Current energy value, clamped to the display range.
    pub energy: f64,
    /// Display color token.
    pub color: String,
    /// Display icon token.
    pub icon: String,
}

impl TrophicLevel {
    /// Create a level at its baseline display values.
    pub fn baseline(rank: TrophicRank) -> Self {
        Self {
            rank,
            name: rank.display_name().to_owned(),
            biomass: rank.baseline_biomass(),
            energy: rank.baseline_energy(),
            color: rank.color().to_owned(),
            icon: rank.icon().to_owned(),
        }
    }
}
