#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Configuration for the memory statistics collector

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MemlogError, Result};

/// Default output path for accumulated statistics
pub const DEFAULT_OUTPUT_PATH: &str = "logs/baseline-mem.log";

/// Environment key enabling memory logging (defaults to false)
pub const ENV_ENABLED: &str = "MEMLOG_ENABLED";

/// Environment key for the invocation identifier
pub const ENV_INVOCATION: &str = "MEMLOG_INVOCATION";

/// Environment key for the benchmark name
pub const ENV_BENCHMARK: &str = "MEMLOG_BENCHMARK";

/// Environment key for the parameter-property description
pub const ENV_PARAM_PROPERTY: &str = "MEMLOG_PARAM_PROPERTY";

/// Composite identifier tagging every log line of one benchmark run
///
/// Built from the invocation id, benchmark name and parameter description,
/// joined with single spaces. Fully resolved at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentLabel(String);

impl ExperimentLabel {
    /// Build a label from its three components
    ///
    /// # Errors
    ///
    /// Returns error if any component is empty.
    pub fn new(invocation: &str, benchmark: &str, param_property: &str) -> Result<Self> {
        for (name, value) in [
            ("invocation", invocation),
            ("benchmark", benchmark),
            ("param_property", param_property),
        ] {
            if value.trim().is_empty() {
                return Err(MemlogError::invalid_config(format!(
                    "experiment label component '{name}' is empty"
                )));
            }
        }

        Ok(Self(format!("{invocation} {benchmark} {param_property}")))
    }

    /// Get the label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for memory statistics logging
///
/// Resolved once at startup and immutable for the process lifetime. The
/// collector holds no ambient global state; this struct is passed into its
/// constructor explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether memory logging is active (the whole subsystem is inert when false)
    enabled: bool,

    /// Path to the append-only statistics log
    output_path: PathBuf,

    /// Invocation identifier (mandatory when enabled)
    invocation: Option<String>,

    /// Benchmark name (mandatory when enabled)
    benchmark: Option<String>,

    /// Parameter-property description (mandatory when enabled)
    param_property: Option<String>,
}

impl LoggingConfig {
    /// Create a disabled configuration (all collector operations become no-ops)
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            invocation: None,
            benchmark: None,
            param_property: None,
        }
    }

    /// Create an enabled configuration with the default output path
    #[must_use]
    pub fn enabled(
        invocation: impl Into<String>,
        benchmark: impl Into<String>,
        param_property: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            invocation: Some(invocation.into()),
            benchmark: Some(benchmark.into()),
            param_property: Some(param_property.into()),
        }
    }

    /// Override the output path
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Read configuration from `MEMLOG_*` environment variables
    ///
    /// `MEMLOG_ENABLED` must be the literal string `true` (case-insensitive)
    /// to activate logging; anything else, including absence, disables it.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var(ENV_ENABLED)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            enabled,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            invocation: std::env::var(ENV_INVOCATION).ok(),
            benchmark: std::env::var(ENV_BENCHMARK).ok(),
            param_property: std::env::var(ENV_PARAM_PROPERTY).ok(),
        }
    }

    /// Whether memory logging is active
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the output path
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Resolve the experiment label from the three mandatory keys
    ///
    /// # Errors
    ///
    /// Returns error if any of the three keys is absent or empty. This is a
    /// fatal configuration error when logging is enabled.
    pub fn experiment_label(&self) -> Result<ExperimentLabel> {
        let invocation = self
            .invocation
            .as_deref()
            .ok_or(MemlogError::MissingConfigKey(ENV_INVOCATION))?;
        let benchmark = self
            .benchmark
            .as_deref()
            .ok_or(MemlogError::MissingConfigKey(ENV_BENCHMARK))?;
        let param_property = self
            .param_property
            .as_deref()
            .ok_or(MemlogError::MissingConfigKey(ENV_PARAM_PROPERTY))?;

        ExperimentLabel::new(invocation, benchmark, param_property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_joins_components_with_spaces() {
        let label = ExperimentLabel::new("inv-1", "bench", "p=3");
        assert!(label.is_ok());
        if let Ok(label) = label {
            assert_eq!(label.as_str(), "inv-1 bench p=3");
        }
    }

    #[test]
    fn test_label_rejects_empty_component() {
        let label = ExperimentLabel::new("inv-1", "", "p=3");
        assert!(matches!(label, Err(MemlogError::InvalidConfig(_))));
    }

    #[test]
    fn test_enabled_config_resolves_label() {
        let config = LoggingConfig::enabled("inv-1", "bench", "p=3");
        assert!(config.is_enabled());
        assert!(config.experiment_label().is_ok());
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let config = LoggingConfig {
            enabled: true,
            output_path: PathBuf::from("test.log"),
            invocation: Some("inv-1".to_string()),
            benchmark: None,
            param_property: Some("p=3".to_string()),
        };
        assert!(matches!(
            config.experiment_label(),
            Err(MemlogError::MissingConfigKey(ENV_BENCHMARK))
        ));
    }

    #[test]
    fn test_disabled_config_defaults() {
        let config = LoggingConfig::disabled();
        assert!(!config.is_enabled());
        assert_eq!(config.output_path(), Path::new(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_with_output_path() {
        let config =
            LoggingConfig::enabled("inv-1", "bench", "p=3").with_output_path("/tmp/custom.log");
        assert_eq!(config.output_path(), Path::new("/tmp/custom.log"));
    }
}
