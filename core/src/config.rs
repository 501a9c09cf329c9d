//! Layered configuration for the dashboard.
//!
//! Precedence, lowest to highest:
//! 1. Hardcoded defaults
//! 2. File config (`config.toml`)
//! 3. `IMPORTDASH_*` environment variables
//!
//! CLI flags are applied on top by the binary.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
const DEFAULT_RUN_LIMIT: u32 = 25;
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error loading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for ${var}: '{value}' (expected: {expected})")]
    InvalidEnvValue {
        var: String,
        value: String,
        expected: String,
    },
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the import-progress backend.
    pub server_url: String,
    /// Maximum number of runs to request from the listing endpoint.
    pub run_limit: u32,
    /// Deadline for a run's attempt fan-out.
    pub attempt_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            run_limit: DEFAULT_RUN_LIMIT,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

/// Optional fields as they appear in `config.toml`.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_url: Option<String>,
    run_limit: Option<u32>,
    attempt_timeout_secs: Option<u64>,
}

/// Layered configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read file-layer values from `path` instead of skipping the file layer.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load configuration from defaults, file, and the process environment.
    pub fn load(self) -> Result<DashboardConfig, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.load_with_env(&env)
    }

    /// Load with an explicit environment map. Lets tests exercise env
    /// precedence without mutating process state.
    pub fn load_with_env(
        self,
        env: &HashMap<String, String>,
    ) -> Result<DashboardConfig, ConfigError> {
        let mut config = DashboardConfig::default();

        if let Some(path) = &self.config_path {
            apply_file(&mut config, path)?;
        }

        if let Some(url) = env.get("IMPORTDASH_SERVER_URL") {
            config.server_url = url.clone();
        }
        if let Some(raw) = env.get("IMPORTDASH_RUN_LIMIT") {
            config.run_limit = parse_env("IMPORTDASH_RUN_LIMIT", raw, "positive integer")?;
        }
        if let Some(raw) = env.get("IMPORTDASH_ATTEMPT_TIMEOUT_SECS") {
            config.attempt_timeout_secs =
                parse_env("IMPORTDASH_ATTEMPT_TIMEOUT_SECS", raw, "seconds as integer")?;
        }

        Ok(config)
    }
}

fn apply_file(config: &mut DashboardConfig, path: &Path) -> Result<(), ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(url) = file.server_url {
        config.server_url = url;
    }
    if let Some(limit) = file.run_limit {
        config.run_limit = limit;
    }
    if let Some(secs) = file.attempt_timeout_secs {
        config.attempt_timeout_secs = secs;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(
    var: &str,
    raw: &str,
    expected: &str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidEnvValue {
        var: var.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    })
}
