//! Core configuration loading.
//!
//! # Responsibility
//! - Deserialize engine configuration from JSON.
//! - Validate values the engine relies on before they reach it.
//!
//! # Invariants
//! - Unknown keys are rejected.
//! - Every section has a default, so `{}` is a valid configuration.
//!
//! # Example
//! ```json
//! { "logging": { "level": "info", "log_dir": "/var/log/cadence" },
//!   "competence": { "closing_day": 18 } }
//! ```

use crate::engine::cutoff::CompetenceFallback;
use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Error raised while reading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files; stderr when absent.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level_string(),
            log_dir: None,
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

/// Competence fallback section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompetenceConfig {
    /// Day of month on which fallback windows close, `1..=31`.
    #[serde(default)]
    pub closing_day: Option<u32>,
}

/// Root configuration of the core crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub competence: CompetenceConfig,
}

impl CoreConfig {
    /// Parses and validates configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks value ranges not expressible in the JSON shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_level(&self.logging.level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of trace|debug|info|warn|error, got `{}`",
                self.logging.level
            )));
        }
        if let Some(day) = self.competence.closing_day {
            if !(1..=31).contains(&day) {
                return Err(ConfigError::Invalid(format!(
                    "competence.closing_day must be within 1..=31, got {day}"
                )));
            }
        }
        if let Some(dir) = &self.logging.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Fallback competence policy, when configured.
    pub fn competence_fallback(&self) -> Option<CompetenceFallback> {
        self.competence.closing_day.map(CompetenceFallback::ClosingDay)
    }
}
