use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::provider::StationId;

pub const DEFAULT_BASE_URL: &str = "https://aviationweather.gov";

/// Settings for the aviationweather.gov data API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Lookback window requested from the API, in hours.
    pub hours: f64,
    pub timeout_secs: u64,
    /// Extra attempts after the first failed one.
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            hours: 2.0,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_stations = ["KSLC", "KTVY", "KU42"]
///
/// [provider]
/// base_url = "https://aviationweather.gov"
/// hours = 2.0
/// timeout_secs = 10
/// max_retries = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stations shown by `metar show` when none are given on the command line.
    pub default_stations: Vec<String>,

    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_stations: vec!["KSLC".into(), "KTVY".into(), "KU42".into()],
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Default stations as validated ids.
    pub fn default_stations(&self) -> Result<Vec<StationId>> {
        if self.default_stations.is_empty() {
            return Err(anyhow!(
                "No default stations configured.\n\
                 Hint: run `metar configure` or pass station ids, e.g. `metar show KSLC`."
            ));
        }

        self.default_stations.iter().map(|s| StationId::try_from(s.as_str())).collect()
    }

    /// Append a station unless it is already listed.
    pub fn add_station(&mut self, id: &StationId) -> bool {
        if self.has_station(id) {
            return false;
        }
        self.default_stations.push(id.to_string());
        true
    }

    pub fn remove_station(&mut self, id: &StationId) -> bool {
        let before = self.default_stations.len();
        self.default_stations.retain(|s| !s.eq_ignore_ascii_case(id.as_str()));
        before != self.default_stations.len()
    }

    pub fn has_station(&self, id: &StationId) -> bool {
        self.default_stations.iter().any(|s| s.eq_ignore_ascii_case(id.as_str()))
    }

    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("Base URL must start with http:// or https://, got '{url}'"));
        }
        self.provider.base_url = url.to_string();
        Ok(())
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), stations = cfg.default_stations.len(), "loaded config");
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "metar-decoder", "metar-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> StationId {
        StationId::try_from(s).expect("valid station id")
    }

    #[test]
    fn defaults_watch_salt_lake_valley() {
        let cfg = Config::default();
        let ids = cfg.default_stations().expect("defaults are valid");

        let names: Vec<&str> = ids.iter().map(StationId::as_str).collect();
        assert_eq!(names, ["KSLC", "KTVY", "KU42"]);
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.provider.hours, 2.0);
    }

    #[test]
    fn empty_station_list_errors_with_hint() {
        let cfg = Config { default_stations: Vec::new(), ..Config::default() };
        let err = cfg.default_stations().unwrap_err();

        assert!(err.to_string().contains("No default stations configured"));
        assert!(err.to_string().contains("Hint: run `metar configure`"));
    }

    #[test]
    fn add_station_is_deduplicated() {
        let mut cfg = Config::default();

        assert!(!cfg.add_station(&station("kslc")));
        assert!(cfg.add_station(&station("KDEN")));
        assert_eq!(cfg.default_stations.len(), 4);
        assert!(cfg.has_station(&station("KDEN")));
    }

    #[test]
    fn remove_station() {
        let mut cfg = Config::default();

        assert!(cfg.remove_station(&station("KTVY")));
        assert!(!cfg.remove_station(&station("KTVY")));
        assert_eq!(cfg.default_stations, ["KSLC", "KU42"]);
    }

    #[test]
    fn set_base_url_validates_scheme() {
        let mut cfg = Config::default();

        cfg.set_base_url("http://localhost:8080/").unwrap();
        assert_eq!(cfg.provider.base_url, "http://localhost:8080");

        assert!(cfg.set_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = Config::from_toml("default_stations = [\"KOGD\"]\n").unwrap();

        assert_eq!(cfg.default_stations, ["KOGD"]);
        assert_eq!(cfg.provider, ProviderConfig::default());
    }

    #[test]
    fn provider_hours_from_toml() {
        let cfg = Config::from_toml("[provider]\nhours = 6.0\n").unwrap();

        assert_eq!(cfg.provider.hours, 6.0);
        assert_eq!(cfg.provider.max_retries, 2);
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.provider.max_retries = 5;

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
