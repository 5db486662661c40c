//! Scoring configuration.
//!
//! Configuration can be loaded from:
//! - TOML files (default: ~/.config/trendlens/scoring.toml, `[scoring]` table)
//! - Environment variables (TRENDLENS_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use trendlens_core::config::ScoringConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = ScoringConfig::load().expect("Failed to load config");
//!
//! // Or from environment variables only
//! let config = ScoringConfig::from_env();
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::defaults::{MAX_CONCURRENCY, SERIES_WINDOW_DAYS, SIMILARITY_THRESHOLD};
use crate::models::CompositionMode;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable parameters for momentum scoring and clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// How sub-scores combine into the composite momentum score
    pub composition_mode: CompositionMode,
    /// Mean similarity needed to join an existing cluster (0.0 to 1.0)
    pub similarity_threshold: f64,
    /// Interest-over-time window requested from the series provider
    pub window_days: u32,
    /// Maximum concurrent provider fetches per batch
    pub max_concurrency: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            composition_mode: CompositionMode::default(),
            similarity_threshold: SIMILARITY_THRESHOLD,
            window_days: SERIES_WINDOW_DAYS,
            max_concurrency: MAX_CONCURRENCY,
        }
    }
}

impl ScoringConfig {
    /// Set the composition mode.
    pub fn with_composition_mode(mut self, mode: CompositionMode) -> Self {
        self.composition_mode = mode;
        self
    }

    /// Set the clustering similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the provider fetch concurrency.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Get the default config file path.
    ///
    /// Returns: ~/.config/trendlens/scoring.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("trendlens");
        path.push("scoring.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading scoring config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file with a `[scoring]` table.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, substituting `${VAR}` references.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);

        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            scoring: ScoringConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        root.scoring.validate()?;
        Ok(root.scoring)
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRENDLENS_COMPOSITION_MODE` ("averaged" or "additive")
    /// - `TRENDLENS_SIMILARITY_THRESHOLD` (float, 0.0 to 1.0)
    /// - `TRENDLENS_WINDOW_DAYS` (integer)
    /// - `TRENDLENS_MAX_CONCURRENCY` (integer)
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            composition_mode: parse_env("TRENDLENS_COMPOSITION_MODE")
                .unwrap_or(defaults.composition_mode),
            similarity_threshold: parse_env("TRENDLENS_SIMILARITY_THRESHOLD")
                .unwrap_or(defaults.similarity_threshold),
            window_days: parse_env("TRENDLENS_WINDOW_DAYS").unwrap_or(defaults.window_days),
            max_concurrency: parse_env("TRENDLENS_MAX_CONCURRENCY")
                .unwrap_or(defaults.max_concurrency),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Validation(format!(
                "similarity_threshold must be within [0, 1], got: {}",
                self.similarity_threshold
            )));
        }

        if self.window_days == 0 {
            return Err(ConfigError::Validation(
                "window_days must be greater than zero".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::Validation(
                "max_concurrency must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Substitute `${VAR}` references with environment values.
    ///
    /// Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_REF: OnceLock<regex::Regex> = OnceLock::new();
        let re = ENV_REF.get_or_init(|| {
            regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex is valid")
        });
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

/// Parses an environment variable, warning when it is set but unparsable.
fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable config value, using default");
            None
        }
    }
}
