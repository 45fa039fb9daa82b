use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Coordinates, TemperatureUnit};

pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = concat!("globe-weather/", env!("CARGO_PKG_VERSION"));

/// Remote endpoints. Override them to point at a mirror or a test server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather_url: String,
    pub reverse_geocode_url: String,
    pub search_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            reverse_geocode_url: DEFAULT_REVERSE_GEOCODE_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints rooted at one base URL, using the upstream paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            weather_url: format!("{base}/v1/forecast"),
            reverse_geocode_url: format!("{base}/reverse"),
            search_url: format!("{base}/search"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept_language: String,
    /// Transport timeout applied to every remote call.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en".to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search runs.
    pub debounce_ms: u64,
    /// Shorter queries clear and close the result list.
    pub min_query_len: usize,
    /// Number of candidates requested from the remote place search.
    pub remote_limit: usize,
    /// Cap on the merged result list.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            remote_limit: 8,
            max_results: 10,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// unit = "fahrenheit"
///
/// [home]
/// lat = 47.6062
/// lng = -122.3321
///
/// [search]
/// debounce_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub unit: TemperatureUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Coordinates>,
    pub endpoints: Endpoints,
    pub http: HttpConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Home position, or an error telling the user how to set one.
    pub fn home_position(&self) -> Result<Coordinates> {
        self.home.ok_or_else(|| {
            anyhow!(
                "No home location configured.\n\
                 Hint: run `globe configure` and enter your latitude and longitude."
            )
        })
    }

    pub fn set_home(&mut self, lat: f64, lng: f64) -> Result<()> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(anyhow!("Latitude {lat} is out of range (-90..=90)"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(anyhow!("Longitude {lng} is out of range (-180..=180)"));
        }
        self.home = Some(Coordinates::new(lat, lng));
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "globe-weather", "globe")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_position_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.home_position().unwrap_err();

        assert!(err.to_string().contains("No home location configured"));
    }

    #[test]
    fn set_home_rejects_out_of_range() {
        let mut cfg = Config::default();
        assert!(cfg.set_home(91.0, 0.0).is_err());
        assert!(cfg.set_home(0.0, -181.0).is_err());
        assert!(cfg.home.is_none());

        cfg.set_home(47.6062, -122.3321).expect("valid coordinates");
        assert_eq!(cfg.home_position().unwrap(), Coordinates::new(47.6062, -122.3321));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.search.debounce_ms, 300);
        assert_eq!(cfg.search.max_results, 10);
        assert_eq!(cfg.endpoints.weather_url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit = \"fahrenheit\"\n\n[search]\ndebounce_ms = 150\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.search.debounce_ms, 150);
        assert_eq!(cfg.search.min_query_len, 2);
        assert_eq!(cfg.http.accept_language, "en");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            unit: TemperatureUnit::Fahrenheit,
            ..Config::default()
        };
        cfg.set_home(-33.8688, 151.2093).unwrap();
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn endpoints_with_base_strips_trailing_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:8080/");
        assert_eq!(endpoints.weather_url, "http://127.0.0.1:8080/v1/forecast");
        assert_eq!(endpoints.reverse_geocode_url, "http://127.0.0.1:8080/reverse");
        assert_eq!(endpoints.search_url, "http://127.0.0.1:8080/search");
    }
}
