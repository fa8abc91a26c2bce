use clima_core::AppError;
use clima_geo::Neighborhood;
use clima_weather::{NeighborhoodWeather, WeatherSnapshot};

use crate::models::LoadState;
use crate::services::WeatherServiceError;

/// Region cards shown under the city-center panel
pub const REGION_CARDS: usize = 3;

/// City-center conditions plus a few region cards
#[derive(Debug, Default)]
pub struct HomeModel {
    pub state: LoadState,
    pub current: Option<WeatherSnapshot>,
    pub regions_state: LoadState,
    pub regions: Vec<NeighborhoodWeather>,
    request: u64,
    regions_request: u64,
}

impl HomeModel {
    /// Start a city-center fetch; returns the request id to tag it with
    pub fn begin(&mut self) -> u64 {
        self.request += 1;
        self.state = LoadState::Loading;
        self.request
    }

    pub fn apply_current(&mut self, request: u64, result: Result<WeatherSnapshot, WeatherServiceError>) {
        if request != self.request {
            tracing::debug!("Dropping stale home response {}", request);
            return;
        }
        match result {
            Ok(snapshot) => {
                self.current = Some(snapshot);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.state = LoadState::Failed(AppError::from(e).user_message().to_string());
            }
        }
    }

    /// Start the region batch; placeholders keep the cards laid out meanwhile
    pub fn begin_regions(&mut self, regions: &[Neighborhood]) -> u64 {
        self.regions_request += 1;
        self.regions_state = LoadState::Loading;
        self.regions = regions
            .iter()
            .map(|n| NeighborhoodWeather {
                neighborhood: n.clone(),
                weather: None,
            })
            .collect();
        self.regions_request
    }

    pub fn apply_regions(&mut self, request: u64, results: Vec<NeighborhoodWeather>) {
        if request != self.regions_request {
            return;
        }
        self.regions = results;
        self.regions_state = LoadState::Ready;
    }

    /// Daily range estimate around the current temperature
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.current
            .as_ref()
            .map(|w| (w.temperature - 3.0, w.temperature + 2.0))
    }
}

/// Neighborhoods backing the region cards
pub fn region_sources(neighborhoods: &[Neighborhood]) -> Vec<Neighborhood> {
    neighborhoods.iter().take(REGION_CARDS).cloned().collect()
}

pub fn temperature_label(value: f64) -> String {
    format!("{:.1}°C", value)
}

pub fn wind_label(speed: f64) -> String {
    format!("{:.1} m/s", speed)
}

pub fn pressure_label(pressure: f64) -> String {
    format!("{:.0} hPa", pressure)
}

pub fn precipitation_label(amount: f64) -> String {
    format!("{:.1} mm", amount)
}

pub fn humidity_label(humidity: f64) -> String {
    format!("{:.0}%", humidity)
}
