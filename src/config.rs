use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default Overpass API endpoint
pub const DEFAULT_API_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Overpass API endpoint
    pub api_url: String,
    /// Value of the `amenity` tag to search for
    pub amenity: String,
    /// Radius in meters used when none is given
    pub default_radius: u32,
    /// Fixed device position `[lat, lon]` for the positioning provider;
    /// `None` means positioning is unavailable
    pub device_position: Option<[f64; 2]>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            amenity: "drinking_water".to_string(),
            default_radius: 1000,
            device_position: None,
        }
    }
}

impl Config {
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    pub fn get_config_path(config_arg: &Option<PathBuf>) -> PathBuf {
        config_arg
            .clone()
            .unwrap_or_else(|| PathBuf::from("amenity-finder.yaml"))
    }
}
