//! Configuration loading and typed config structures for the log generator.
//!
//! A generator configuration is a small JSON object:
//!
//! ```json
//! { "type": "var_ratio", "ratio": 0.5, "num_events": 10000, "num_procs": 8 }
//! ```
//!
//! YAML is accepted as well when the file extension is `.yaml` or `.yml`.
//! The `type` tag is kept as a raw string here and only validated when a
//! strategy is resolved, so an unknown tag surfaces as
//! [`ConfigError::UnknownStrategy`] before any event is generated.

use std::path::Path;

use loggen_types::{StrategyKind, UnknownStrategy};
use serde::Deserialize;

/// Environment variable that overrides the configured seed.
pub const SEED_ENV_VAR: &str = "LOGGEN_SEED";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The `type` tag does not name a known strategy.
    #[error("invalid log type specified in the config: {source}")]
    UnknownStrategy {
        /// The rejected tag.
        #[from]
        source: UnknownStrategy,
    },

    /// A run parameter is out of range.
    #[error("invalid run parameters: {reason}")]
    InvalidParams {
        /// Explanation of what is wrong with the parameters.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level generator configuration.
///
/// Mirrors the configuration file. Only `type` is required; the other
/// fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    /// Strategy tag: `var_ratio`, `var_procs` or `var_events`.
    #[serde(rename = "type")]
    pub log_type: String,

    /// Fraction of events that should be network events, in `[0, 1]`.
    #[serde(default = "default_ratio")]
    pub ratio: f64,

    /// Target total number of events.
    #[serde(default = "default_num_events")]
    pub num_events: usize,

    /// Number of simulated processes.
    #[serde(default = "default_num_procs")]
    pub num_procs: usize,

    /// Random seed for reproducible output. Drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Create a configuration for `kind` with default parameters.
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            log_type: kind.as_str().to_owned(),
            ratio: default_ratio(),
            num_events: default_num_events(),
            num_procs: default_num_procs(),
            seed: None,
        }
    }

    /// Load configuration from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything
    /// else as JSON. [`SEED_ENV_VAR`] overrides the `seed` field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, a parse
    /// error if the content is malformed, or
    /// [`ConfigError::InvalidParams`] if the seed override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let mut config = if is_yaml {
            Self::parse_yaml(&contents)?
        } else {
            Self::parse(&contents)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not valid JSON or
    /// lacks the `type` field.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// lacks the `type` field.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override the seed from [`SEED_ENV_VAR`] when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParams`] if the variable is set but is
    /// not an unsigned integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let value = std::env::var(SEED_ENV_VAR).ok();
        self.apply_seed_override(value.as_deref())
    }

    /// Override the seed with `value` when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParams`] if `value` is not an unsigned
    /// integer.
    pub fn apply_seed_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidParams {
                    reason: format!("{SEED_ENV_VAR}={raw:?} is not a valid seed: {e}"),
                })?;
            self.seed = Some(seed);
        }
        Ok(())
    }

    /// Resolve the `type` tag into a [`StrategyKind`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownStrategy`] for an unrecognized tag.
    pub fn strategy(&self) -> Result<StrategyKind, ConfigError> {
        Ok(self.log_type.parse()?)
    }
}

/// The parameters actually used by one generation run.
///
/// Produced by a strategy from a [`GeneratorConfig`] and validated on
/// construction, so the sequencer can rely on a non-zero process count,
/// a non-zero event target, and a finite ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParams {
    process_count: usize,
    total_events: usize,
    ratio: f64,
}

impl RunParams {
    /// Validate and bundle run parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParams`] if `process_count` or
    /// `total_events` is zero, or if `ratio` is not a finite value in
    /// `[0, 1]`.
    pub fn new(process_count: usize, total_events: usize, ratio: f64) -> Result<Self, ConfigError> {
        if process_count == 0 {
            return Err(ConfigError::InvalidParams {
                reason: "num_procs must be at least 1".to_owned(),
            });
        }
        if total_events == 0 {
            return Err(ConfigError::InvalidParams {
                reason: "num_events must be at least 1".to_owned(),
            });
        }
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::InvalidParams {
                reason: format!("ratio must be within [0, 1], got {ratio}"),
            });
        }
        Ok(Self {
            process_count,
            total_events,
            ratio,
        })
    }

    /// Number of simulated processes.
    pub const fn process_count(&self) -> usize {
        self.process_count
    }

    /// Target total number of events.
    pub const fn total_events(&self) -> usize {
        self.total_events
    }

    /// Target fraction of network events.
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }
}

const fn default_ratio() -> f64 {
    0.5
}

const fn default_num_events() -> usize {
    1000
}

const fn default_num_procs() -> usize {
    4
}
