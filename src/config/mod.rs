//! Call configuration
//!
//! Controls how a unit treats its input:
//!
//! - `validation_mode`: stop at the first invalid field (`fail_fast`) or
//!   report every invalid field (`collect_all`)
//! - `unknown_parameters`: `reject` input keys with no declared field, or
//!   `ignore` them
//!
//! Both default to the strict setting. Files are JSON:
//!
//! ```json
//! { "validation_mode": "collect_all", "unknown_parameters": "ignore" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many field errors a failed validation reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// First invalid field aborts validation
    #[default]
    FailFast,
    /// Every field is validated; all failures are reported
    CollectAll,
}

/// Treatment of input keys that match no declared field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParameters {
    #[default]
    Reject,
    Ignore,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        "FIRE_CONFIG_ERROR"
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default)]
    pub validation_mode: ValidationMode,

    #[serde(default)]
    pub unknown_parameters: UnknownParameters,
}

impl ServiceConfig {
    /// Strict defaults with all-errors reporting
    pub fn collect_all() -> Self {
        Self {
            validation_mode: ValidationMode::CollectAll,
            ..Self::default()
        }
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn with_unknown_parameters(mut self, policy: UnknownParameters) -> Self {
        self.unknown_parameters = policy;
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;

        tracing::debug!(
            event = crate::observability::Event::ConfigLoaded.as_str(),
            path = %path.display(),
            validation_mode = ?config.validation_mode,
            unknown_parameters = ?config.unknown_parameters,
            "service config loaded"
        );

        Ok(config)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_strict() {
        let config = ServiceConfig::default();
        assert_eq!(config.validation_mode, ValidationMode::FailFast);
        assert_eq!(config.unknown_parameters, UnknownParameters::Reject);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ServiceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_parse_all_options() {
        let config = ServiceConfig::from_json_str(
            r#"{"validation_mode": "collect_all", "unknown_parameters": "ignore"}"#,
        )
        .unwrap();
        assert_eq!(config.validation_mode, ValidationMode::CollectAll);
        assert_eq!(config.unknown_parameters, UnknownParameters::Ignore);
    }

    #[test]
    fn test_rejects_unknown_option() {
        assert!(ServiceConfig::from_json_str(r#"{"mode": "fast"}"#).is_err());
        assert!(ServiceConfig::from_json_str(r#"{"validation_mode": "lazy"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"validation_mode": "collect_all"}}"#).unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config, ServiceConfig::collect_all());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServiceConfig::load(Path::new("/nonexistent/fireservice.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.code(), "FIRE_CONFIG_ERROR");
    }
}
