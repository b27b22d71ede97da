//! Service configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration, loaded from an optional YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port for the HTTP server (default: 8080).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file (default: tasks.db).
    #[serde(default = "default_database")]
    pub database: String,

    /// Exact origin allowed by CORS; all origins when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database: default_database(),
            cors_origin: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database() -> String {
    "tasks.db".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading config file {}", path.as_ref().display()))?;
        let config = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Resolve configuration: explicit path, then `TASK_API_CONFIG`, then
    /// built-in defaults.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var("TASK_API_CONFIG") {
            return Self::from_file(path);
        }
        Ok(Self::default())
    }
}
