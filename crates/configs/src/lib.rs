//! # Settings
//!
//! Layered runtime configuration for the task board binary.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `config/taskboard.toml` (optional)
//! 3. `TASKBOARD__<SECTION>__<KEY>` environment variables, after `.env` is loaded
//!
//! The services crate never reads these directly. The binary maps them
//! onto its own options type.

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "config/taskboard";
pub const ENV_PREFIX: &str = "TASKBOARD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderingSettings {
    /// Gap left between an appended item and the last sibling.
    pub position_step: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivitySettings {
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub ordering: OrderingSettings,
    pub activity: ActivitySettings,
}

impl Settings {
    /// Loads `.env`, then reads every source from the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_sources(Some(DEFAULT_CONFIG_FILE), Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds settings from an optional config file and an environment
    /// source. Tests pass an `Environment` with an explicit map.
    pub fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("ordering.position_step", 1000.0)?
            .set_default("activity.default_limit", 50)?
            .set_default("activity.max_limit", 200)?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        let settings: Settings = builder
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.ordering.position_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ordering.position_step must be a positive number, got {step}"
            )));
        }
        if self.activity.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "activity.default_limit must be at least 1".into(),
            ));
        }
        if self.activity.default_limit > self.activity.max_limit {
            return Err(ConfigError::Invalid(format!(
                "activity.default_limit ({}) exceeds activity.max_limit ({})",
                self.activity.default_limit, self.activity.max_limit
            )));
        }
        Ok(())
    }
}
