//! Configuration system for Strangelove

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::integrations::clock::Coordinates;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
    #[error("static feed needs at least one label")]
    EmptyStaticFeed,
    #[error("clock tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Global application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub clock: ClockConfig,
    pub feed: FeedConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("strangelove").join("config.toml"))
    }

    /// Check everything the runtime assumes cannot fail later on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let LocationConfig {
            latitude,
            longitude,
        } = self.location;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidLongitude(longitude));
        }
        if self.feed.kind == FeedKind::Static && self.feed.labels.is_empty() {
            return Err(ConfigError::EmptyStaticFeed);
        }
        if self.clock.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 40.688265,
            longitude: -73.9184594,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub tick_interval_ms: u64,
}

impl ClockConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Poll a GBFS `station_information` endpoint.
    Gbfs,
    /// Emit the configured labels once.
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub kind: FeedKind,
    pub url: String,
    pub poll_interval_secs: u64,
    pub station_count: usize,
    pub labels: Vec<String>,
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: FeedKind::Gbfs,
            url: "https://gbfs.citibikenyc.com/gbfs/en/station_information.json".to_string(),
            poll_interval_secs: 60,
            station_count: 5,
            labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    pub status_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            status_label: "stations".to_string(),
        }
    }
}

/// Write a default configuration file
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [location]
            latitude = 51.5

            [feed]
            kind = "static"
            labels = ["Kings Cross", "Angel"]
            "#,
        )
        .unwrap();

        assert_eq!(config.location.latitude, 51.5);
        assert_eq!(config.location.longitude, -73.9184594);
        assert_eq!(config.feed.kind, FeedKind::Static);
        assert_eq!(config.feed.station_count, 5);
        assert_eq!(config.clock.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.display.theme, "dark");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut config = Config::default();
        config.location.latitude = 91.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLatitude(91.0)));

        config.location.latitude = 0.0;
        config.location.longitude = -180.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn rejects_empty_static_feed() {
        let mut config = Config::default();
        config.feed.kind = FeedKind::Static;
        assert_eq!(config.validate(), Err(ConfigError::EmptyStaticFeed));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.feed.station_count = 8;
        config.display.theme = "light".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.feed.station_count, 8);
        assert_eq!(loaded.display.theme, "light");
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());
    }
}
