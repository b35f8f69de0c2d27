// crates/ecotrace-cli/src/config.rs
//
// Runtime configuration for the EcoTrace CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

use ecotrace_consensus::ConsensusConfig;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory for local data storage (RocksDB).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Log level used when `RUST_LOG` is unset: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Weights, agreement cutoffs, and evidence tables for the pipeline.
    #[serde(default)]
    pub consensus: ConsensusConfig,
}

fn default_data_dir() -> String {
    "~/.ecotrace/data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            consensus: ConsensusConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Path of the analysis database under the data directory.
    pub fn analyses_db_path(&self) -> String {
        format!("{}/analyses", expand_tilde(&self.data_dir))
    }
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
