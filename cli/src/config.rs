use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH: &str = "parsync.toml";

/// Process-wide configuration, read once at startup before any job runs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
}

/// Log destination and verbosity, from the `[logging]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filename: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filename: PathBuf::from("parsync.log"),
        }
    }
}

impl Config {
    /// Load from `path`. A missing or malformed file warns on stderr and
    /// falls back to the defaults; configuration is never fatal.
    pub fn load(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| toml::from_str(&raw).map_err(|e| e.to_string()));
        match loaded {
            Ok(config) => config,
            Err(reason) => {
                eprintln!(
                    "Warning: Could not load config from {}: {}",
                    path.display(),
                    reason
                );
                Self::default()
            }
        }
    }
}
