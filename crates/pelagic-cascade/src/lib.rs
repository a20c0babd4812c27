//! Trophic cascade stepper for the Pelagic shark habitat service.
//!
//! Models how a single perturbation at the base of the ocean food web
//! (a phytoplankton bloom or crash) propagates upward through zooplankton,
//! fish, and finally sharks: each rank responds later and more weakly than
//! the one below it. The numbers are display-calibrated for the dashboard's
//! animated chart, not a population model.
//!
//! # Architecture
//!
//! - [`state`] -- the owned [`CascadeState`](state::CascadeState) and the
//!   pure per-step update rule
//! - [`stepper`] -- the [`CascadeStepper`](stepper::CascadeStepper)
//!   lifecycle: start guard, step counter, automatic settling stop
//! - [`config`] -- validated stepper timing configuration
//! - [`runner`] -- async interval driver; the spawned task is the only
//!   timer touching a stepper and is aborted when its handle drops
//!
//! # Design Principles
//!
//! - The update rule is a pure function of `(perturbation, step, rank)`;
//!   biomass and energy are clamped to fixed display bounds after every
//!   update, never rejected.
//! - Starting an already-running stepper is a silent no-op, not an error.
//!   Duplicate timers would corrupt the step counter, so the guard lives
//!   in the stepper itself.

pub mod config;
pub mod runner;
pub mod state;
pub mod stepper;

pub use config::{CascadeConfig, CascadeConfigError};
pub use runner::{CascadeHandle, spawn_cascade};
pub use state::CascadeState;
pub use stepper::{CascadeFrame, CascadeStepper, StepOutcome};
