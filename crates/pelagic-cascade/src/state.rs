//! Cascade state and the pure per-step update rule.
//!
//! The state owns the five trophic levels plus the scalar perturbation
//! that drives every level mutation. The update rule rebases each level to
//! a common reference (biomass 100, energy 1000) and clamps the result, so
//! any input produces a displayable value.

use chrono::{DateTime, Utc};
use pelagic_types::{TrophicLevel, TrophicRank};
use serde::{Deserialize, Serialize};

/// Lower display bound for biomass.
pub const BIOMASS_MIN: f64 = 10.0;
/// Upper display bound for biomass.
pub const BIOMASS_MAX: f64 = 150.0;
/// Lower display bound for energy.
pub const ENERGY_MIN: f64 = 100.0;
/// Upper display bound for energy.
pub const ENERGY_MAX: f64 = 1500.0;

/// Reference biomass the update rule perturbs around.
pub const REFERENCE_BIOMASS: f64 = 100.0;
/// Reference energy the update rule perturbs around.
pub const REFERENCE_ENERGY: f64 = 1000.0;
/// Energy units moved per unit of biomass impact.
pub const ENERGY_PER_IMPACT: f64 = 10.0;

/// Documentary food-web propagation delay in days. Shown in the dashboard
/// copy; never used by the cascade math.
pub const TIME_DELAY_DAYS: u32 = 30;

/// Impact of a perturbation on one rank at a given cascade progress.
///
/// Progress is capped at 1 so settling ticks hold the fully propagated
/// values instead of overshooting them. Each rank starts responding only
/// after its lag fraction of progress has elapsed, and the response is
/// damped exponentially with distance from the perturbation source.
pub fn level_impact(change: f64, progress: f64, rank: TrophicRank) -> f64 {
    let effective = (progress.min(1.0) - rank.lag_fraction()).max(0.0);
    change * effective * rank.damping()
}

/// The in-memory cascade state: five ordered trophic levels, the
/// perturbation driving them, and a last-mutation timestamp.
///
/// The level list has a constant length for the lifetime of the state;
/// every mutation goes through [`set_perturbation`](Self::set_perturbation),
/// [`apply_step`](Self::apply_step), or [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeState {
    /// The food-web levels, producers first.
    pub levels: Vec<TrophicLevel>,
    /// Documentary propagation delay in days (display copy only).
    pub time_delay_days: u32,
    /// The scalar perturbation applied at the base of the food web.
    /// The dashboard slider constrains it to `[-50, 50]`; the state
    /// stores whatever it is given.
    pub phytoplankton_change: f64,
    /// When the state last changed.
    pub timestamp: DateTime<Utc>,
}

impl CascadeState {
    /// Create a state with every level at its baseline display values and
    /// no perturbation.
    pub fn new() -> Self {
        Self {
            levels: TrophicRank::ALL.into_iter().map(TrophicLevel::baseline).collect(),
            time_delay_days: TIME_DELAY_DAYS,
            phytoplankton_change: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Store a new perturbation value and touch the timestamp.
    ///
    /// No validation beyond storage; levels are not recomputed until the
    /// next step is applied.
    pub fn set_perturbation(&mut self, change: f64) {
        self.phytoplankton_change = change;
        self.timestamp = Utc::now();
    }

    /// Apply the update rule for one step of a run with `total_steps`
    /// propagation steps.
    ///
    /// Every level is recomputed from the reference values, so applying a
    /// step is idempotent for a fixed `(step, total_steps, perturbation)`.
    pub fn apply_step(&mut self, step: u32, total_steps: u32) {
        let progress = f64::from(step) / f64::from(total_steps.max(1));
        let change = self.phytoplankton_change;

        for level in &mut self.levels {
            let impact = level_impact(change, progress, level.rank);
            level.biomass = (REFERENCE_BIOMASS + impact).clamp(BIOMASS_MIN, BIOMASS_MAX);
            level.energy =
                (REFERENCE_ENERGY + impact * ENERGY_PER_IMPACT).clamp(ENERGY_MIN, ENERGY_MAX);
        }

        self.timestamp = Utc::now();
    }

    /// Restore every level to baseline and zero the perturbation.
    pub fn reset(&mut self) {
        self.levels = TrophicRank::ALL.into_iter().map(TrophicLevel::baseline).collect();
        self.phytoplankton_change = 0.0;
        self.timestamp = Utc::now();
    }
}

impl Default for CascadeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_five_baseline_levels() {
        let state = CascadeState::new();
        assert_eq!(state.levels.len(), 5);
        for level in &state.levels {
            assert_eq!(level.biomass, level.rank.baseline_biomass());
            assert_eq!(level.energy, level.rank.baseline_energy());
        }
        assert_eq!(state.phytoplankton_change, 0.0);
        assert_eq!(state.time_delay_days, TIME_DELAY_DAYS);
    }

    #[test]
    fn bounds_hold_for_any_perturbation() {
        for change in (-50..=50).step_by(5) {
            let mut state = CascadeState::new();
            state.set_perturbation(f64::from(change));
            for step in 1..=7 {
                state.apply_step(step, 5);
                for level in &state.levels {
                    assert!((BIOMASS_MIN..=BIOMASS_MAX).contains(&level.biomass));
                    assert!((ENERGY_MIN..=ENERGY_MAX).contains(&level.energy));
                }
            }
        }
    }

    #[test]
    fn deeper_ranks_are_damped_monotonically() {
        for pair in TrophicRank::ALL.windows(2) {
            if let [lower, upper] = pair {
                let lower_impact = level_impact(40.0, 1.0, *lower).abs();
                let upper_impact = level_impact(40.0, 1.0, *upper).abs();
                assert!(upper_impact <= lower_impact);
            }
        }
    }

    #[test]
    fn earlier_ranks_respond_no_later() {
        // At partial progress the lag makes upper ranks strictly weaker
        // even before damping: effective(i) >= effective(i+1).
        for pair in TrophicRank::ALL.windows(2) {
            if let [lower, upper] = pair {
                for step in 1..=5u32 {
                    let progress = f64::from(step) / 5.0;
                    let lower_effective = (progress - lower.lag_fraction()).max(0.0);
                    let upper_effective = (progress - upper.lag_fraction()).max(0.0);
                    assert!(lower_effective >= upper_effective);
                }
            }
        }
    }

    #[test]
    fn bloom_scenario_matches_expected_values() {
        let mut state = CascadeState::new();
        state.set_perturbation(40.0);
        for step in 1..=7 {
            state.apply_step(step, 5);
        }

        let biomass_for = |rank: TrophicRank| {
            state
                .levels
                .iter()
                .find(|l| l.rank == rank)
                .map(|l| l.biomass)
                .unwrap()
        };

        // Full progress: level 0 gets the whole perturbation.
        assert!((biomass_for(TrophicRank::Phytoplankton) - 140.0).abs() < 1e-9);
        // Level 1: effective 0.8, damping 0.8 -> 100 + 40*0.8*0.8 = 125.6.
        assert!((biomass_for(TrophicRank::Zooplankton) - 125.6).abs() < 1e-9);
        // Level 4: effective 0.2, damping 0.8^4 -> 100 + 40*0.2*0.4096.
        assert!((biomass_for(TrophicRank::Shark) - 103.2768).abs() < 1e-9);
    }

    #[test]
    fn crash_scenario_clamps_nothing_at_the_base() {
        let mut state = CascadeState::new();
        state.set_perturbation(-50.0);
        for step in 1..=7 {
            state.apply_step(step, 5);
        }
        let base = state.levels.first().unwrap();
        assert!((base.biomass - 50.0).abs() < 1e-9);
        assert!((base.energy - 500.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_perturbation_is_clamped() {
        let mut state = CascadeState::new();
        state.set_perturbation(500.0);
        state.apply_step(5, 5);
        let base = state.levels.first().unwrap();
        assert_eq!(base.biomass, BIOMASS_MAX);
        assert_eq!(base.energy, ENERGY_MAX);
    }

    #[test]
    fn reset_restores_baseline_regardless_of_prior_state() {
        let mut state = CascadeState::new();
        state.set_perturbation(-50.0);
        for step in 1..=7 {
            state.apply_step(step, 5);
        }
        state.reset();

        let baseline = CascadeState::new();
        assert_eq!(state.levels, baseline.levels);
        assert_eq!(state.phytoplankton_change, 0.0);
    }

    #[test]
    fn settling_steps_hold_full_progress() {
        let mut at_full = CascadeState::new();
        at_full.set_perturbation(40.0);
        at_full.apply_step(5, 5);

        let mut settled = at_full.clone();
        settled.apply_step(7, 5);

        assert_eq!(at_full.levels, settled.levels);
    }
}
