//! Log backend: resolves a fixed list of neighborhood names through forward
//! geocoding and fetches weather for each hit.
//!
//! Lookups run one after another so the geocoder sees at most one request at
//! a time; each entry is sent as soon as it resolves.

use std::sync::mpsc::Sender;

use clima_geo::{Coordinates, GeoError};
use clima_weather::WeatherSnapshot;

use crate::app_services::AppServices;

/// Error type for log lookups
#[derive(Debug, Clone, PartialEq)]
pub enum LogError {
    NotFound(String),
    Geocode(String),
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::NotFound(s) => write!(f, "Place not found: {}", s),
            LogError::Geocode(s) => write!(f, "Geocoding error: {}", s),
        }
    }
}

impl std::error::Error for LogError {}

impl From<GeoError> for LogError {
    fn from(e: GeoError) -> Self {
        match e {
            GeoError::NotFound(name) => LogError::NotFound(name),
            other => LogError::Geocode(other.to_string()),
        }
    }
}

/// A resolved log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogLookup {
    pub coordinates: Coordinates,
    /// `None` when the forecast lookup failed
    pub weather: Option<WeatherSnapshot>,
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum LogServiceMessage {
    EntryDone {
        request: u64,
        index: usize,
        result: Result<LogLookup, LogError>,
    },
}

/// Request lookups for every name, in order.
/// Sends one `EntryDone` per name.
pub fn request_lookups(
    tx: &Sender<LogServiceMessage>,
    services: &AppServices,
    request: u64,
    names: Vec<String>,
) {
    let tx = tx.clone();
    let nominatim = services.nominatim();
    let weather = services.weather();
    let city = services.config().city.clone();
    let token = services.shutdown_token();

    services.runtime().spawn(async move {
        for (index, name) in names.into_iter().enumerate() {
            let lookup = async {
                let coordinates = nominatim
                    .search_neighborhood(&name, &city.name, &city.country)
                    .await?
                    .ok_or_else(|| GeoError::NotFound(name.clone()))?;
                let weather = weather.current_or_none(coordinates.lat, coordinates.lon).await;
                Ok::<_, GeoError>(LogLookup {
                    coordinates,
                    weather,
                })
            };

            let result = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Log lookups {} cancelled", request);
                    return;
                }
                result = lookup => result,
            };

            if let Err(e) = &result {
                tracing::warn!("Log lookup for {} failed: {}", name, e);
            }

            let message = LogServiceMessage::EntryDone {
                request,
                index,
                result: result.map_err(LogError::from),
            };
            if tx.send(message).is_err() {
                return;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_error_display() {
        assert!(format!("{}", LogError::NotFound("Aleixo".into())).contains("Aleixo"));
        assert!(format!("{}", LogError::Geocode("status 500".into())).contains("Geocoding"));
    }

    #[test]
    fn geo_errors_map_to_log_errors() {
        assert_eq!(
            LogError::from(GeoError::NotFound("Centro".into())),
            LogError::NotFound("Centro".into())
        );
        assert!(matches!(
            LogError::from(GeoError::Parse("bad".into())),
            LogError::Geocode(_)
        ));
    }
}
