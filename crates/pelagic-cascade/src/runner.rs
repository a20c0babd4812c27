//! Async interval driver for the cascade stepper.
//!
//! [`spawn_cascade`] starts one Tokio task that ticks a shared stepper at
//! the configured period, broadcasting a [`CascadeFrame`] after every
//! advance, and exits as soon as the run settles or is reset. The returned
//! [`CascadeHandle`] aborts the task when dropped, so a stepper can never
//! outlive its owner and keep mutating state.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

use crate::stepper::{CascadeFrame, CascadeStepper, StepOutcome};

/// Owner handle for a running cascade driver task.
///
/// Dropping the handle aborts the task. This is the teardown guarantee for
/// the one mutable external resource in the stepper design: the timer.
#[derive(Debug)]
pub struct CascadeHandle {
    handle: JoinHandle<()>,
}

impl CascadeHandle {
    /// Whether the driver task has exited (run settled or was reset).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the driver task immediately.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for CascadeHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the interval task driving a shared stepper.
///
/// The caller is expected to have called [`CascadeStepper::start`] first;
/// if the stepper is not running the task observes [`StepOutcome::Idle`]
/// on its first tick and exits. Frames are sent on `frames` after every
/// tick; send failures (no connected subscribers) are ignored.
///
/// The first tick fires one full period after spawning, matching a timer
/// that is scheduled rather than fired immediately.
pub fn spawn_cascade(
    stepper: Arc<RwLock<CascadeStepper>>,
    frames: broadcast::Sender<CascadeFrame>,
) -> CascadeHandle {
    let handle = tokio::spawn(async move {
        let period = { stepper.read().await.config().tick_period() };
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            ticker.tick().await;

            let (outcome, frame) = {
                let mut guard = stepper.write().await;
                let outcome = guard.tick();
                (outcome, guard.frame())
            };

            match outcome {
                StepOutcome::Idle => {
                    debug!("cascade driver found stepper idle, exiting");
                    return;
                }
                StepOutcome::Advanced(step) => {
                    debug!(step, "cascade advanced");
                    let _ = frames.send(frame);
                }
                StepOutcome::Settled => {
                    let _ = frames.send(frame);
                    debug!("cascade driver exiting after settle");
                    return;
                }
            }
        }
    });

    CascadeHandle { handle }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CascadeConfig;

    fn make_stepper(change: f64) -> Arc<RwLock<CascadeStepper>> {
        let config = CascadeConfig {
            tick_interval_ms: 10,
            ..CascadeConfig::default()
        };
        let mut stepper = CascadeStepper::new(config);
        stepper.set_perturbation(change);
        Arc::new(RwLock::new(stepper))
    }

    #[tokio::test(start_paused = true)]
    async fn driver_runs_to_settle_and_exits() {
        let stepper = make_stepper(40.0);
        let (tx, mut rx) = broadcast::channel(16);

        assert!(stepper.write().await.start());
        let handle = spawn_cascade(Arc::clone(&stepper), tx);

        let mut frames = Vec::new();
        while let Ok(frame) = rx.recv().await {
            frames.push(frame);
        }

        // 5 propagation steps + 2 settling ticks.
        assert_eq!(frames.len(), 7);
        let last = frames.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.step, 7);

        let guard = stepper.read().await;
        assert!(!guard.is_running());
        drop(guard);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_exits_when_stepper_was_never_started() {
        let stepper = make_stepper(10.0);
        let (tx, mut rx) = broadcast::channel(16);

        let _handle = spawn_cascade(Arc::clone(&stepper), tx);

        // Channel closes without any frame once the task observes Idle.
        assert!(rx.recv().await.is_err());
        assert_eq!(stepper.read().await.current_step(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_timer() {
        let stepper = make_stepper(40.0);
        let (tx, _rx) = broadcast::channel(16);

        assert!(stepper.write().await.start());
        let handle = spawn_cascade(Arc::clone(&stepper), tx);
        drop(handle);

        // Give the aborted task a chance to be reaped, then confirm the
        // step counter no longer advances.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let step_after_drop = stepper.read().await.current_step();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(stepper.read().await.current_step(), step_after_drop);
    }
}
