//! Application configuration loaded from `pelagic-config.yaml`.
//!
//! Every section and every field has a default, so a missing file or a
//! partial file still produces a runnable configuration. The file is
//! looked up relative to the working directory; `PELAGIC_CONFIG` can
//! point somewhere else.

use std::path::Path;

use pelagic_api::ServerConfig;
use pelagic_api::fields::FieldConfig;
use pelagic_cascade::CascadeConfig;
use serde::Deserialize;
use tracing::info;

use crate::error::EngineError;

/// Environment variable overriding the config file path.
const CONFIG_ENV: &str = "PELAGIC_CONFIG";

/// Default config file name, resolved against the working directory.
const CONFIG_FILE: &str = "pelagic-config.yaml";

/// Environment variable overriding the listen host.
const HOST_ENV: &str = "PELAGIC_HOST";

/// Environment variable overriding the listen port.
const PORT_ENV: &str = "PELAGIC_PORT";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server section.
    #[serde(default)]
    pub server: ServerConfig,

    /// Ocean field loading section.
    #[serde(default)]
    pub fields: FieldConfig,

    /// Cascade timing section.
    #[serde(default)]
    pub cascade: CascadeConfig,
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Resolution order: the `PELAGIC_CONFIG` environment variable, then
    /// `pelagic-config.yaml` in the working directory, then built-in
    /// defaults when neither file exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when a file exists but cannot be
    /// read or parsed. A missing file is not an error.
    pub fn load() -> Result<Self, EngineError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| String::from(CONFIG_FILE));
        let path = Path::new(&path);

        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override the listen address with environment variables when set.
    ///
    /// This allows a deployment to point the server somewhere else
    /// without modifying the YAML config file.
    fn apply_env_overrides(&mut self) -> Result<(), EngineError> {
        if let Ok(val) = std::env::var(HOST_ENV) {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var(PORT_ENV) {
            self.server.port = val.parse().map_err(|e| EngineError::Config {
                message: format!("invalid {PORT_ENV} value {val:?}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Load configuration from a specific YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the file cannot be read or
    /// parsed, or when the cascade section fails validation.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        let config: Self = serde_yml::from_str(&contents).map_err(|e| EngineError::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;

        config.cascade.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: AppConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.fields.rows, 40);
        assert_eq!(config.cascade.total_steps, 5);
    }

    #[test]
    fn partial_sections_fill_in() {
        let yaml = "server:\n  port: 8100\ncascade:\n  tick_interval_ms: 250\n";
        let config: AppConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cascade.tick_interval_ms, 250);
        assert_eq!(config.cascade.settle_steps, 2);
    }

    #[test]
    fn fields_section_round_trips() {
        let yaml = "fields:\n  rows: 12\n  cols: 20\n  seed: 7\n  coverage_area: Test Bight\n";
        let config: AppConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.fields.rows, 12);
        assert_eq!(config.fields.cols, 20);
        assert_eq!(config.fields.seed, 7);
        assert_eq!(config.fields.coverage_area, "Test Bight");
    }
}
