//! Shared application state for the habitat API server.
//!
//! [`AppState`] holds the immutable ocean fields, the cascade stepper
//! behind a read-write lock, the broadcast channel for cascade frames,
//! and the handle of the currently running cascade driver task. All of it
//! is wrapped in [`Arc`] and injected via Axum's `State` extractor.

use std::sync::Arc;

use pelagic_cascade::{CascadeConfig, CascadeFrame, CascadeHandle, CascadeStepper, spawn_cascade};
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::info;

use crate::fields::OceanFields;

/// Capacity of the broadcast channel for cascade frames.
///
/// A run produces a handful of frames; subscribers that lag by more than
/// this many receive a
/// [`broadcast::error::RecvError::Lagged`] and skip to the newest frame.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for cascade frames.
    pub tx: broadcast::Sender<CascadeFrame>,
    /// The cascade stepper driving the dashboard's food-web animation.
    pub cascade: Arc<RwLock<CascadeStepper>>,
    /// Handle of the running cascade driver task, if any. Replacing or
    /// dropping the handle aborts the old timer.
    driver: Arc<Mutex<Option<CascadeHandle>>>,
    /// The loaded ocean field set all predictions derive from.
    pub fields: Arc<OceanFields>,
    /// Seed for tag simulations.
    pub tag_seed: u64,
}

impl AppState {
    /// Create the application state from loaded fields and a cascade
    /// configuration.
    pub fn new(fields: OceanFields, cascade_config: CascadeConfig, tag_seed: u64) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            cascade: Arc::new(RwLock::new(CascadeStepper::new(cascade_config))),
            driver: Arc::new(Mutex::new(None)),
            fields: Arc::new(fields),
            tag_seed,
        }
    }

    /// Subscribe to the cascade frame stream.
    pub fn subscribe(&self) -> broadcast::Receiver<CascadeFrame> {
        self.tx.subscribe()
    }

    /// Start a cascade run if none is in progress.
    ///
    /// Returns `true` when a new run (and its driver task) started, and
    /// `false` for the silent no-op case of an already-running cascade.
    pub async fn start_cascade(&self) -> bool {
        let mut stepper = self.cascade.write().await;
        if !stepper.start() {
            return false;
        }
        drop(stepper);

        let handle = spawn_cascade(Arc::clone(&self.cascade), self.tx.clone());
        let mut driver = self.driver.lock().await;
        // Dropping a finished handle is a no-op; a live one cannot be
        // here because start() just succeeded.
        *driver = Some(handle);
        info!("cascade run started");
        true
    }

    /// Reset the cascade: abort any driver task, restore baseline levels,
    /// zero the perturbation. Idempotent.
    pub async fn reset_cascade(&self) {
        let mut driver = self.driver.lock().await;
        if let Some(handle) = driver.take() {
            handle.abort();
        }
        drop(driver);

        self.cascade.write().await.reset();
        info!("cascade reset");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fields::FieldConfig;

    fn make_state() -> AppState {
        let fields = OceanFields::synthetic(&FieldConfig {
            rows: 4,
            cols: 4,
            ..FieldConfig::default()
        });
        AppState::new(fields, CascadeConfig::default(), 42)
    }

    #[tokio::test]
    async fn second_start_is_a_no_op() {
        let state = make_state();
        assert!(state.start_cascade().await);
        assert!(!state.start_cascade().await);
        state.reset_cascade().await;
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let state = make_state();
        state.reset_cascade().await;
        assert!(state.start_cascade().await);
        state.reset_cascade().await;
        state.reset_cascade().await;

        let stepper = state.cascade.read().await;
        assert!(!stepper.is_running());
        assert_eq!(stepper.current_step(), 0);
    }
}
