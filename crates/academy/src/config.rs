/// Service configuration loaded from a JSON file
use crate::schedule::CheckerConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database holding classes and schedules
    pub database_path: String,
    pub checker: CheckerConfig,
}

impl AppConfig {
    /// Loads the configuration from a JSON file. Missing keys fall back to
    /// their defaults.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "academy.db".to_string(),
            checker: CheckerConfig::default(),
        }
    }
}
