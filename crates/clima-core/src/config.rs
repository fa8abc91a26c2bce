use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix for environment overrides, e.g. `CLIMA__WEATHER__BATCH_SIZE=8`.
pub const ENV_PREFIX: &str = "CLIMA";
const ENV_SEPARATOR: &str = "__";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds the TUI log file)
    pub config_dir: PathBuf,

    /// The metropolitan area being displayed
    pub city: CityConfig,

    /// Third-party service endpoints
    pub services: ServiceConfig,

    /// Weather fetching behavior
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Terminal UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Neighborhoods listed on the Log page
    #[serde(default)]
    pub log: LogPageConfig,
}

/// A neighborhood used when the places service cannot be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackNeighborhood {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    /// City name as tagged in OpenStreetMap (used in the Overpass area filter)
    pub name: String,

    /// Country name, appended to geocoding queries
    pub country: String,

    /// Map and Home page center
    pub center_lat: f64,
    pub center_lon: f64,

    /// Initial zoom for the exported tile map
    pub zoom: u8,

    /// Maximum number of neighborhoods considered by the Dashboard
    #[serde(default = "default_neighborhood_limit")]
    pub neighborhood_limit: usize,

    #[serde(default = "default_fallback_neighborhoods")]
    pub fallback_neighborhoods: Vec<FallbackNeighborhood>,
}

fn default_neighborhood_limit() -> usize {
    63
}

fn default_fallback_neighborhoods() -> Vec<FallbackNeighborhood> {
    [
        ("Centro", -3.1316, -60.0233),
        ("Adrianópolis", -3.1020, -60.0090),
        ("Aleixo", -3.0890, -59.9930),
    ]
    .into_iter()
    .map(|(name, lat, lon)| FallbackNeighborhood {
        name: name.to_string(),
        lat,
        lon,
    })
    .collect()
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            name: "Manaus".to_string(),
            country: "Brasil".to_string(),
            center_lat: -3.119,
            center_lon: -60.0217,
            zoom: 12,
            neighborhood_limit: default_neighborhood_limit(),
            fallback_neighborhoods: default_fallback_neighborhoods(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Overpass interpreter endpoint
    pub overpass_url: String,

    /// MET Norway locationforecast "compact" endpoint
    pub forecast_url: String,

    /// Nominatim base URL (the `/search` path is appended)
    pub nominatim_url: String,

    /// Tile URL template for the exported map
    pub tile_url: String,

    /// User-Agent sent with every request. MET Norway rejects requests without one.
    pub user_agent: String,

    /// Timeout for weather and geocoding requests
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for Overpass queries, which are slower
    #[serde(default = "default_overpass_timeout")]
    pub overpass_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_overpass_timeout() -> u64 {
    15
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            forecast_url: "https://api.met.no/weatherapi/locationforecast/2.0/compact"
                .to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            user_agent: concat!("Clima/", env!("CARGO_PKG_VERSION"), " (clima@example.com)")
                .to_string(),
            request_timeout_secs: default_request_timeout(),
            overpass_timeout_secs: default_overpass_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// How long a fetched snapshot is reused, in minutes
    pub cache_ttl_minutes: u32,

    /// Attempts per coordinate before giving up
    pub max_attempts: u32,

    /// Backoff step; the wait after attempt `n` is `n * step`
    pub backoff_step_ms: u64,

    /// Requests issued concurrently per batch chunk
    pub batch_size: usize,

    /// Pause between batch chunks
    pub batch_pause_ms: u64,

    /// Upper bound of the random delay before each batched request
    pub max_jitter_ms: u64,

    /// Map page re-fetch interval in minutes
    pub refresh_minutes: u32,

    /// Reference temperature the Dashboard measures variation against (°C)
    pub reference_temperature: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 10,
            max_attempts: 3,
            backoff_step_ms: 2000,
            batch_size: 5,
            batch_pause_ms: 1000,
            max_jitter_ms: 500,
            refresh_minutes: 5,
            reference_temperature: 27.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event loop tick in milliseconds
    pub tick_rate_ms: u64,

    /// Rotation period of tied hottest/coldest cards on the Map page
    pub extremes_rotate_secs: u64,

    /// Rotation period of the tied hottest card on the Dashboard
    pub hottest_rotate_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            extremes_rotate_secs: 7,
            hottest_rotate_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPageConfig {
    /// Neighborhood names resolved through the geocoder
    pub neighborhoods: Vec<String>,
}

impl Default for LogPageConfig {
    fn default() -> Self {
        Self {
            neighborhoods: [
                "Centro",
                "Nova Cidade",
                "Cidade Nova",
                "Ponta Negra",
                "Adrianópolis",
                "Compensa",
                "São José",
                "Aleixo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            city: CityConfig::default(),
            services: ServiceConfig::default(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            log: LogPageConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clima")
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file
    File(PathBuf),
    /// No file existed; defaults were written to this path
    Created(PathBuf),
    /// Built in code rather than loaded
    Memory,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<(Self, ConfigSource)> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there first if the
    /// file is missing. Environment overrides are layered on top.
    ///
    /// Runs before logging is set up, so the caller reports the source.
    pub fn load_from(path: &Path) -> Result<(Self, ConfigSource)> {
        let source = if path.exists() {
            ConfigSource::File(path.to_path_buf())
        } else {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            ConfigSource::Created(path.to_path_buf())
        };

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf()).format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read config file")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to parse config file")?;

        Ok((config, source))
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult, ConfigSource)> {
        let (config, source) = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        Ok((config, validation, source))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.services.overpass_url, "services.overpass_url", &mut result);
        self.validate_url(&self.services.forecast_url, "services.forecast_url", &mut result);
        self.validate_url(&self.services.nominatim_url, "services.nominatim_url", &mut result);

        if self.services.user_agent.trim().is_empty() {
            result.add_error(
                "services.user_agent",
                "User agent is required by the forecast service",
            );
        }

        if self.services.request_timeout_secs == 0 {
            result.add_error("services.request_timeout_secs", "Timeout must be greater than 0");
        }

        if self.city.name.trim().is_empty() {
            result.add_error("city.name", "City name must not be empty");
        } else if self.city.name.contains('"') {
            result.add_warning("city.name", "City name contains quotes; they will be escaped");
        }

        if !(-90.0..=90.0).contains(&self.city.center_lat) {
            result.add_error("city.center_lat", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.city.center_lon) {
            result.add_error("city.center_lon", "Longitude must be between -180 and 180");
        }

        if self.city.zoom == 0 || self.city.zoom > 19 {
            result.add_warning("city.zoom", "Zoom outside the 1-19 tile range");
        }

        if self.city.neighborhood_limit == 0 {
            result.add_warning(
                "city.neighborhood_limit",
                "Neighborhood limit is 0; the Dashboard will be empty",
            );
        }

        if self.weather.max_attempts == 0 {
            result.add_error("weather.max_attempts", "At least one attempt is required");
        } else if self.weather.max_attempts > 10 {
            result.add_warning("weather.max_attempts", "More than 10 attempts per request");
        }

        if self.weather.batch_size == 0 {
            result.add_warning("weather.batch_size", "Batch size 0 is treated as 1");
        }

        if self.weather.cache_ttl_minutes == 0 {
            result.add_warning("weather.cache_ttl_minutes", "Weather cache disabled (0 minutes)");
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning("weather.refresh_minutes", "Map refresh disabled (0 minutes)");
        } else if self.weather.refresh_minutes > 1440 {
            result.add_warning(
                "weather.refresh_minutes",
                "Map refresh interval is more than 24 hours",
            );
        }

        if !self.weather.reference_temperature.is_finite() {
            result.add_error("weather.reference_temperature", "Must be a finite number");
        }

        if self.ui.tick_rate_ms == 0 {
            result.add_error("ui.tick_rate_ms", "Tick rate must be greater than 0");
        }

        if self.log.neighborhoods.is_empty() {
            result.add_warning("log.neighborhoods", "No neighborhoods configured for the Log page");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the TUI log file
    pub fn log_path(&self) -> PathBuf {
        self.config_dir.join("clima.log")
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("clima");

        Ok(config_dir.join("config.toml"))
    }
}
