use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::units::TemperatureUnit;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REPORTS_DIR: &str = "reports";

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BASE_URL: &str = "WEATHERWISE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WEATHERWISE_TIMEOUT_SECS";
pub const ENV_REPORTS_DIR: &str = "WEATHERWISE_REPORTS_DIR";
pub const ENV_UNIT: &str = "WEATHERWISE_UNIT";

/// Settings loaded once at startup and passed to the client and report writer.
///
/// Example TOML:
/// api_key = "..."
/// timeout_secs = 10
/// reports_dir = "reports"
/// display_unit = "celsius"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub reports_dir: PathBuf,
    pub display_unit: TemperatureUnit,
    /// Open generated reports in the default browser.
    pub open_reports: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            display_unit: TemperatureUnit::default(),
            open_reports: true,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;

        if !cfg.has_api_key() {
            tracing::debug!("no API key configured; fetches will fail until one is set");
        }

        Ok(cfg)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override fields from environment variables, looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var(ENV_API_KEY) {
            self.api_key = Some(key);
        }

        if let Some(url) = var(ENV_BASE_URL) {
            self.base_url = url;
        }

        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse::<u64>().with_context(|| {
                format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'")
            })?;
        }

        if let Some(dir) = var(ENV_REPORTS_DIR) {
            self.reports_dir = PathBuf::from(dir);
        }

        if let Some(raw) = var(ENV_UNIT) {
            self.display_unit = raw
                .trim()
                .parse::<TemperatureUnit>()
                .with_context(|| format!("Invalid {ENV_UNIT}"))?;
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherwise", "weatherwise")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key, or an empty string when none is configured.
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key().is_empty()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
        assert_eq!(cfg.display_unit, TemperatureUnit::Celsius);
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.api_key(), "");
    }

    #[test]
    fn env_overrides_every_field() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            (ENV_API_KEY, "KEY"),
            (ENV_BASE_URL, "http://localhost:9999/weather"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_REPORTS_DIR, "/tmp/out"),
            (ENV_UNIT, "fahrenheit"),
        ]))
        .expect("env should apply");

        assert_eq!(cfg.api_key(), "KEY");
        assert_eq!(cfg.base_url, "http://localhost:9999/weather");
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.reports_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.display_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn env_rejects_bad_timeout() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn env_rejects_bad_unit() {
        let mut cfg = Config::default();
        assert!(cfg.apply_env(env(&[(ENV_UNIT, "rankine")])).is_err());
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.display_unit = TemperatureUnit::Kelvin;
        cfg.save_to(&path).expect("save should succeed");

        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 4\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 4);
        assert_eq!(loaded.base_url, DEFAULT_BASE_URL);
    }
}
