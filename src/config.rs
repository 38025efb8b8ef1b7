//! Query tool configuration.
//!
//! Settings live in a YAML file (`~/.p8/query.yaml`, or the path in
//! `P8_QUERY_CONFIG`). Every key is optional; command-line flags override
//! whatever the file says.
//!
//! ```yaml
//! database: ~/.p8/data/demo.json
//! format: json
//! log_filter: percolate_query=debug
//! log_json: false
//! ```

use crate::types::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "P8_QUERY_CONFIG";

/// Result rendering for the command-line tool.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON database file (`~` and `$VAR` are expanded).
    pub database: Option<PathBuf>,
    /// Default output format.
    pub format: OutputFormat,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            format: OutputFormat::default(),
            log_filter: "warn".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Get default config directory (~/.p8/).
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| QueryError::ConfigError("HOME not set".to_string()))?;
        Ok(PathBuf::from(home).join(".p8"))
    }

    /// Get config file path (`$P8_QUERY_CONFIG` or ~/.p8/query.yaml).
    pub fn config_file() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => expand_path(Path::new(&path)),
            None => Ok(Self::config_dir()?.join("query.yaml")),
        }
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        if config_file.exists() {
            Self::load_from(&config_file)
        } else {
            tracing::debug!(path = %config_file.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| QueryError::ConfigError(format!("Invalid config: {}", e)))
    }

    /// Save configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Configured database path with `~` and variables expanded.
    pub fn database_path(&self) -> Result<Option<PathBuf>> {
        self.database.as_deref().map(expand_path).transpose()
    }
}

/// Expand `~` and environment variables in a path.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path
        .to_str()
        .ok_or_else(|| QueryError::ConfigError(format!("Non UTF-8 path: {}", path.display())))?;
    let expanded = shellexpand::full(raw)
        .map_err(|e| QueryError::ConfigError(format!("Cannot expand '{}': {}", raw, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
