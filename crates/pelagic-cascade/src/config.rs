//! Validated timing configuration for the cascade stepper.

use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when validating cascade configuration.
#[derive(Debug, thiserror::Error)]
pub enum CascadeConfigError {
    /// The configuration contains an unusable value.
    #[error("invalid cascade configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Timing parameters for a cascade run.
///
/// A run advances one step per tick for `total_steps` steps of propagation
/// plus `settle_steps` extra ticks that let the highest ranks finish
/// moving, then stops on its own.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CascadeConfig {
    /// Number of steps over which the perturbation reaches full progress.
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,

    /// Extra ticks after full progress before the run stops.
    #[serde(default = "default_settle_steps")]
    pub settle_steps: u32,

    /// Base tick interval in milliseconds at speed 1.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Playback speed multiplier. Must be at least 1; the effective tick
    /// period is the base interval divided by this value.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

const fn default_total_steps() -> u32 {
    5
}

const fn default_settle_steps() -> u32 {
    2
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_speed() -> f64 {
    1.0
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            total_steps: default_total_steps(),
            settle_steps: default_settle_steps(),
            tick_interval_ms: default_tick_interval_ms(),
            speed: default_speed(),
        }
    }
}

impl CascadeConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeConfigError::InvalidConfig`] if `total_steps` or
    /// `tick_interval_ms` is zero, or `speed` is below 1 or not finite.
    pub fn validate(&self) -> Result<(), CascadeConfigError> {
        if self.total_steps == 0 {
            return Err(CascadeConfigError::InvalidConfig {
                reason: "total_steps must be at least 1".to_owned(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(CascadeConfigError::InvalidConfig {
                reason: "tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if !self.speed.is_finite() || self.speed < 1.0 {
            return Err(CascadeConfigError::InvalidConfig {
                reason: format!("speed must be a finite value >= 1, got {}", self.speed),
            });
        }
        Ok(())
    }

    /// Return a copy with a different speed multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeConfigError::InvalidConfig`] if the resulting
    /// configuration is invalid.
    pub fn with_speed(mut self, speed: f64) -> Result<Self, CascadeConfigError> {
        self.speed = speed;
        self.validate()?;
        Ok(self)
    }

    /// Effective wall-clock period between ticks.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms).div_f64(self.speed)
    }

    /// Total number of ticks in a full run, including settling.
    pub const fn run_ticks(&self) -> u32 {
        self.total_steps.saturating_add(self.settle_steps)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CascadeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.run_ticks(), 7);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn speed_divides_the_period() {
        let config = CascadeConfig::default().with_speed(2.0).unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(500));
    }

    #[test]
    fn zero_steps_rejected() {
        let config = CascadeConfig {
            total_steps: 0,
            ..CascadeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn slow_motion_speed_rejected() {
        assert!(CascadeConfig::default().with_speed(0.5).is_err());
        assert!(CascadeConfig::default().with_speed(f64::NAN).is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: CascadeConfig = serde_json::from_str("{\"speed\": 4.0}").unwrap();
        assert_eq!(config.total_steps, 5);
        assert_eq!(config.tick_period(), Duration::from_millis(250));
    }
}
