use chrono::{DateTime, Utc};
use clima_geo::Neighborhood;
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from MET Norway symbol codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Convert a MET symbol code (e.g. `lightrainshowers_day`) to a condition.
    /// See: https://api.met.no/weatherapi/weathericon/2.0/documentation
    pub fn from_symbol_code(code: &str) -> Self {
        let base = code
            .split_once('_')
            .map_or(code, |(base, _variant)| base)
            .to_ascii_lowercase();

        if base.contains("thunder") {
            return Self::Thunderstorm;
        }
        if base.contains("sleet") {
            return Self::Sleet;
        }
        if base.contains("snow") {
            return Self::Snow;
        }

        match base.as_str() {
            "clearsky" => Self::Clear,
            "fair" | "partlycloudy" => Self::PartlyCloudy,
            "cloudy" => Self::Cloudy,
            "fog" => Self::Fog,
            "lightrain" | "lightrainshowers" => Self::Drizzle,
            "rain" | "rainshowers" => Self::Rain,
            "heavyrain" | "heavyrainshowers" => Self::HeavyRain,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Short glyph used by the terminal pages
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy | Self::Unknown => "☁",
            Self::Fog => "≡",
            Self::Drizzle | Self::Rain | Self::HeavyRain => "☂",
            Self::Snow | Self::Sleet => "❄",
            Self::Thunderstorm => "⚡",
        }
    }
}

/// Current conditions for one coordinate at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature, °C
    pub temperature: f64,
    /// Heat index, °C (the compact forecast has no apparent temperature)
    pub feels_like: f64,
    /// Relative humidity, %
    pub humidity: f64,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Air pressure at sea level, hPa
    pub pressure: f64,
    /// Precipitation over the next hour, mm
    pub precipitation: f64,
    /// Raw MET symbol code, `"unknown"` when absent
    pub symbol_code: String,
    pub condition: WeatherCondition,
    /// When the forecast model was last updated
    pub updated_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

/// One entry of a batch result; `weather` is `None` when every attempt failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodWeather {
    pub neighborhood: Neighborhood,
    pub weather: Option<WeatherSnapshot>,
}

impl NeighborhoodWeather {
    pub fn temperature(&self) -> Option<f64> {
        self.weather.as_ref().map(|w| w.temperature)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast service returned status {0}")]
    Status(u16),
    #[error("Rate limited by forecast service")]
    RateLimited,
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Forecast contained no time series")]
    NoData,
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<WeatherError>,
    },
}

impl WeatherError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Status(status) => *status >= 500 || *status == 408,
            Self::RateLimited => true,
            Self::Parse(_) | Self::NoData | Self::Exhausted { .. } => false,
        }
    }

    /// The error that ended the last attempt
    pub fn root(&self) -> &WeatherError {
        match self {
            Self::Exhausted { last, .. } => last.root(),
            other => other,
        }
    }
}
