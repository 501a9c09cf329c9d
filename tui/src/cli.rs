use std::path::PathBuf;

use clap::Parser;
use importdash_core::{ConfigError, ConfigLoader, DashboardConfig};

#[derive(Parser, Debug, Default)]
#[command(
    name = "importdash",
    version,
    about = "Terminal dashboard for import automation runs"
)]
pub struct Cli {
    /// Base URL of the import-progress backend.
    #[arg(long, value_name = "URL")]
    pub server_url: Option<String>,

    /// Maximum number of runs to list.
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,

    /// Deadline in seconds for a run's attempt fan-out.
    #[arg(long, value_name = "SECS")]
    pub attempt_timeout_secs: Option<u64>,

    /// Path to a config.toml overriding the defaults.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter for the log file (e.g. "info", "importdash=debug").
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Resolve the effective configuration: defaults, then config file,
    /// then environment, then these flags.
    pub fn resolve_config(&self) -> Result<DashboardConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_config_path(path);
        }
        let mut config = loader.load()?;

        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(limit) = self.limit {
            config.run_limit = limit;
        }
        if let Some(secs) = self.attempt_timeout_secs {
            config.attempt_timeout_secs = secs;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli {
            server_url: Some("http://dash:9999".to_string()),
            limit: Some(3),
            ..Default::default()
        };
        let config = cli.resolve_config().expect("config resolves");

        assert_eq!(config.server_url, "http://dash:9999");
        assert_eq!(config.run_limit, 3);
        // Flag not given: default stands.
        assert_eq!(config.attempt_timeout_secs, 10);
    }

    #[test]
    fn cli_parses_long_flags() {
        let cli = Cli::parse_from([
            "importdash",
            "--server-url",
            "http://localhost:1234",
            "--limit",
            "7",
            "--attempt-timeout-secs",
            "3",
        ]);

        assert_eq!(cli.server_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(cli.limit, Some(7));
        assert_eq!(cli.attempt_timeout_secs, Some(3));
    }
}
