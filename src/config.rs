use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Severity;

/// Application-level constants
pub const APP_NAME: &str = "Labwise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment override for [`EngineConfig::pattern_mode`].
pub const ENV_PATTERN_MODE: &str = "LABWISE_PATTERN_MODE";
/// Environment override for [`EngineConfig::min_severity`].
pub const ENV_MIN_SEVERITY: &str = "LABWISE_MIN_SEVERITY";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "labwise=info"
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// How pattern recommendations relate to the field flags they summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    /// Report each flagged field and the pattern.
    #[default]
    Additive,
    /// Report the pattern in place of its member flags.
    Replace,
}

impl std::str::FromStr for PatternMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "replace" => Ok(Self::Replace),
            other => Err(ConfigError::InvalidValue(
                ENV_PATTERN_MODE.into(),
                other.to_string(),
            )),
        }
    }
}

/// Evaluator settings. Defaults report everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pattern_mode: PatternMode,
    /// Recommendations below this severity are dropped.
    pub min_severity: Severity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pattern_mode: PatternMode::Additive,
            min_severity: Severity::Info,
        }
    }
}

impl EngineConfig {
    /// Load settings from a JSON file. Missing members take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Defaults with `LABWISE_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup` (variable name → value).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(mode) = lookup(ENV_PATTERN_MODE) {
            self.pattern_mode = mode.parse()?;
        }
        if let Some(severity) = lookup(ENV_MIN_SEVERITY) {
            let trimmed = severity.trim().to_ascii_lowercase();
            self.min_severity = trimmed
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_MIN_SEVERITY.into(), trimmed))?;
        }
        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file load failed ({0}): {1}")]
    Load(String, String),

    #[error("Config file parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
