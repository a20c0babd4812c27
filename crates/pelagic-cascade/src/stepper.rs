//! Stepper lifecycle: start guard, step counter, automatic settling stop.
//!
//! The stepper is a synchronous state machine; the async driver in
//! [`crate::runner`] is the only thing that calls [`CascadeStepper::tick`]
//! on a schedule. Keeping the guard and counter here means the timer task
//! carries no state of its own and can be aborted at any point without
//! corrupting a run.

use chrono::{DateTime, Utc};
use pelagic_types::TrophicLevel;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CascadeConfig;
use crate::state::CascadeState;

/// Result of advancing the stepper by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The stepper was not running; nothing changed.
    Idle,
    /// The run advanced to the contained step.
    Advanced(u32),
    /// The run advanced to its final tick and stopped.
    Settled,
}

/// One observable frame of a cascade run, broadcast to dashboard clients
/// after every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeFrame {
    /// The step this frame reflects (0 before the run starts).
    pub step: u32,
    /// Number of propagation steps in the run.
    pub total_steps: u32,
    /// Whether the run is still in progress.
    pub running: bool,
    /// The perturbation driving the run.
    pub phytoplankton_change: f64,
    /// Level values after this step.
    pub levels: Vec<TrophicLevel>,
    /// When this frame was produced.
    pub timestamp: DateTime<Utc>,
}

/// The cascade stepper: owned state plus run lifecycle.
#[derive(Debug, Clone)]
pub struct CascadeStepper {
    state: CascadeState,
    config: CascadeConfig,
    step: u32,
    running: bool,
}

impl CascadeStepper {
    /// Create a stepper at baseline with the given timing configuration.
    ///
    /// The configuration is assumed validated; see
    /// [`CascadeConfig::validate`].
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            state: CascadeState::new(),
            config,
            step: 0,
            running: false,
        }
    }

    /// The current state (levels, perturbation, timestamp).
    pub const fn state(&self) -> &CascadeState {
        &self.state
    }

    /// The timing configuration for runs.
    pub const fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Whether a run is in progress.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The step the most recent tick advanced to (0 when reset).
    pub const fn current_step(&self) -> u32 {
        self.step
    }

    /// Store a new perturbation value.
    pub fn set_perturbation(&mut self, change: f64) {
        self.state.set_perturbation(change);
    }

    /// Replace the speed multiplier for subsequent runs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::config::CascadeConfigError::InvalidConfig`] if the
    /// speed is below 1 or not finite.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), crate::config::CascadeConfigError> {
        self.config = self.config.with_speed(speed)?;
        Ok(())
    }

    /// Begin a run from step 0.
    ///
    /// Returns `true` if a new run started. Calling this while a run is in
    /// progress is a silent no-op returning `false`: a second concurrent
    /// timer would double-advance the step counter.
    pub fn start(&mut self) -> bool {
        if self.running {
            debug!("cascade already running, start ignored");
            return false;
        }
        self.step = 0;
        self.running = true;
        true
    }

    /// Advance the run by one tick.
    ///
    /// Applies the update rule for the new step and stops the run once the
    /// settling ticks are exhausted. Returns [`StepOutcome::Idle`] without
    /// touching state when no run is in progress.
    pub fn tick(&mut self) -> StepOutcome {
        if !self.running {
            return StepOutcome::Idle;
        }

        self.step = self.step.saturating_add(1);
        self.state.apply_step(self.step, self.config.total_steps);

        if self.step >= self.config.run_ticks() {
            self.running = false;
            debug!(step = self.step, "cascade settled");
            return StepOutcome::Settled;
        }
        StepOutcome::Advanced(self.step)
    }

    /// Halt any run in progress, restore every level to baseline, and zero
    /// the perturbation. Idempotent.
    pub fn reset(&mut self) {
        self.running = false;
        self.step = 0;
        self.state.reset();
    }

    /// Produce an observable frame of the current state.
    pub fn frame(&self) -> CascadeFrame {
        CascadeFrame {
            step: self.step,
            total_steps: self.config.total_steps,
            running: self.running,
            phytoplankton_change: self.state.phytoplankton_change,
            levels: self.state.levels.clone(),
            timestamp: self.state.timestamp,
        }
    }
}

impl Default for CascadeStepper {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn run_settles_after_total_plus_settle_ticks() {
        let mut stepper = CascadeStepper::default();
        stepper.set_perturbation(40.0);
        assert!(stepper.start());

        for expected in 1..=6 {
            assert_eq!(stepper.tick(), StepOutcome::Advanced(expected));
        }
        assert_eq!(stepper.tick(), StepOutcome::Settled);
        assert!(!stepper.is_running());

        // Further ticks are inert until the next start.
        assert_eq!(stepper.tick(), StepOutcome::Idle);
        assert_eq!(stepper.current_step(), 7);
    }

    #[test]
    fn double_start_does_not_restart_the_counter() {
        let mut stepper = CascadeStepper::default();
        assert!(stepper.start());
        let _ = stepper.tick();
        let _ = stepper.tick();

        // A second start while running must not reset the counter or
        // schedule anything new.
        assert!(!stepper.start());
        assert_eq!(stepper.current_step(), 2);
        assert!(stepper.is_running());
    }

    #[test]
    fn reset_is_idempotent_and_clears_the_run() {
        let mut stepper = CascadeStepper::default();
        stepper.set_perturbation(-30.0);
        let _ = stepper.start();
        let _ = stepper.tick();

        stepper.reset();
        stepper.reset();

        assert!(!stepper.is_running());
        assert_eq!(stepper.current_step(), 0);
        assert_eq!(stepper.state().phytoplankton_change, 0.0);
        assert_eq!(stepper.state().levels, CascadeState::new().levels);
    }

    #[test]
    fn restart_after_settle_runs_again() {
        let mut stepper = CascadeStepper::default();
        stepper.set_perturbation(20.0);
        let _ = stepper.start();
        while stepper.tick() != StepOutcome::Settled {}

        assert!(stepper.start());
        assert_eq!(stepper.current_step(), 0);
        assert_eq!(stepper.tick(), StepOutcome::Advanced(1));
    }

    #[test]
    fn frame_reflects_the_current_run() {
        let mut stepper = CascadeStepper::default();
        stepper.set_perturbation(40.0);
        let _ = stepper.start();
        let _ = stepper.tick();

        let frame = stepper.frame();
        assert_eq!(frame.step, 1);
        assert_eq!(frame.total_steps, 5);
        assert!(frame.running);
        assert_eq!(frame.levels.len(), 5);
        assert_eq!(frame.phytoplankton_change, 40.0);
    }

    #[test]
    fn frame_serializes_for_the_wire() {
        let stepper = CascadeStepper::default();
        let json = serde_json::to_string(&stepper.frame()).unwrap();
        let back: CascadeFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stepper.frame());
    }
}
