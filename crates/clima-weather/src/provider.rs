//! MET Norway locationforecast 2.0 ("compact") provider.
//!
//! One request per coordinate; the first time series entry is the current
//! hour. MET requires an identifying User-Agent and at most four decimals
//! in coordinates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::metrics::heat_index;
use crate::types::{WeatherCondition, WeatherError, WeatherSnapshot};

const UNKNOWN_SYMBOL: &str = "unknown";

#[derive(Debug, Deserialize)]
struct MetResponse {
    properties: MetProperties,
}

#[derive(Debug, Deserialize)]
struct MetProperties {
    #[serde(default)]
    meta: Option<MetMeta>,
    #[serde(default)]
    timeseries: Vec<MetTimeStep>,
}

#[derive(Debug, Deserialize)]
struct MetMeta {
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct MetTimeStep {
    data: MetData,
}

#[derive(Debug, Deserialize)]
struct MetData {
    instant: MetInstant,
    #[serde(default)]
    next_1_hours: Option<MetNextHour>,
}

#[derive(Debug, Deserialize)]
struct MetInstant {
    details: MetInstantDetails,
}

#[derive(Debug, Deserialize)]
struct MetInstantDetails {
    air_temperature: f64,
    #[serde(default)]
    relative_humidity: f64,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    air_pressure_at_sea_level: f64,
}

#[derive(Debug, Deserialize)]
struct MetNextHour {
    #[serde(default)]
    summary: Option<MetSummary>,
    #[serde(default)]
    details: Option<MetNextHourDetails>,
}

#[derive(Debug, Deserialize)]
struct MetSummary {
    symbol_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetNextHourDetails {
    precipitation_amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch current conditions for one coordinate (single attempt)
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let lat = format!("{:.4}", lat);
        let lon = format!("{:.4}", lon);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimited);
        }
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_forecast(&body)
    }
}

/// Turn a locationforecast body into a snapshot of its first time step
pub(crate) fn parse_forecast(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let response: MetResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    let updated_at = response.properties.meta.and_then(|m| m.updated_at);
    let step = response
        .properties
        .timeseries
        .into_iter()
        .next()
        .ok_or(WeatherError::NoData)?;

    let details = step.data.instant.details;
    let next_hour = step.data.next_1_hours;

    let symbol_code = next_hour
        .as_ref()
        .and_then(|n| n.summary.as_ref())
        .and_then(|s| s.symbol_code.clone())
        .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string());
    let precipitation = next_hour
        .as_ref()
        .and_then(|n| n.details.as_ref())
        .and_then(|d| d.precipitation_amount)
        .unwrap_or(0.0);

    Ok(WeatherSnapshot {
        temperature: details.air_temperature,
        feels_like: heat_index(details.air_temperature, details.relative_humidity),
        humidity: details.relative_humidity,
        wind_speed: details.wind_speed,
        pressure: details.air_pressure_at_sea_level,
        precipitation,
        condition: WeatherCondition::from_symbol_code(&symbol_code),
        symbol_code,
        updated_at,
        fetched_at: Utc::now(),
    })
}
