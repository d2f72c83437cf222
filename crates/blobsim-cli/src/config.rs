//! Configuration management for the blobsim CLI.

use anyhow::{Context, Result};
use blobsim::prelude::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "blobsim.toml";

/// blobsim project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print the per-day census table.
    #[serde(default = "default_show_census")]
    pub show_census: bool,
    /// Print every blob's lifetime record.
    #[serde(default)]
    pub show_blobs: bool,
}

fn default_show_census() -> bool { true }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_census: default_show_census(),
            show_blobs: false,
        }
    }
}

impl Config {
    /// Load config from blobsim.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find blobsim.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[simulation]\npopulation = 12\n").unwrap();
        assert_eq!(config.simulation.population, 12);
        assert_eq!(config.simulation.daylight, 720);
        assert!(config.report.show_census);
        assert!(!config.report.show_blobs);
    }

    #[test]
    fn default_config_survives_a_toml_round_trip() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.simulation, SimulationConfig::default());
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.simulation.population = 5;
        config.report.show_blobs = true;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.simulation.population, 5);
        assert!(loaded.report.show_blobs);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[simulation]\npopulation = \"many\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse config"));
    }
}
