//! Weather backend: single-point and batched weather fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;

use clima_core::{NetworkError, ReqwestErrorExt};
use clima_geo::Neighborhood;
use clima_weather::{NeighborhoodWeather, WeatherError, WeatherSnapshot};

use crate::app_services::AppServices;
use crate::services::neighborhood_service::load_neighborhoods;

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherServiceError {
    /// Transport failure or an unexpected HTTP status
    Network(NetworkError),
    /// The service answered with something unusable
    Api(String),
    RateLimited,
    NoData,
}

impl std::fmt::Display for WeatherServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherServiceError::Network(e) => write!(f, "Weather request failed: {}", e),
            WeatherServiceError::Api(s) => write!(f, "Weather error: {}", s),
            WeatherServiceError::RateLimited => write!(f, "Weather service rate limited"),
            WeatherServiceError::NoData => write!(f, "No weather data available"),
        }
    }
}

impl std::error::Error for WeatherServiceError {}

impl From<WeatherError> for WeatherServiceError {
    fn from(e: WeatherError) -> Self {
        match e.root() {
            WeatherError::RateLimited => WeatherServiceError::RateLimited,
            WeatherError::NoData => WeatherServiceError::NoData,
            WeatherError::Network(err) => WeatherServiceError::Network(err.to_network_error()),
            WeatherError::Status(status) => WeatherServiceError::Network(NetworkError::ServerError {
                status: *status,
                message: e.to_string(),
            }),
            _ => WeatherServiceError::Api(e.to_string()),
        }
    }
}

/// Which page asked for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchTarget {
    Regions,
    Dashboard,
    Map,
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching the city-center snapshot
    CurrentDone {
        request: u64,
        result: Result<WeatherSnapshot, WeatherServiceError>,
    },
    /// Cumulative batch progress, sent after each chunk
    BatchProgress {
        target: BatchTarget,
        request: u64,
        done: usize,
        total: usize,
    },
    /// Finished batch, in request order
    BatchDone {
        target: BatchTarget,
        request: u64,
        results: Vec<NeighborhoodWeather>,
    },
}

/// Request a snapshot for one coordinate.
/// Sends `CurrentDone` on the channel when complete.
pub fn request_current(
    tx: &Sender<WeatherServiceMessage>,
    services: &AppServices,
    request: u64,
    lat: f64,
    lon: f64,
) {
    let tx = tx.clone();
    let client = services.weather();
    let token = services.shutdown_token();

    services.runtime().spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Current weather request {} cancelled", request);
            }
            result = client.current(lat, lon) => {
                let result = result.map_err(|e| {
                    tracing::error!("Current weather failed: {}", e);
                    WeatherServiceError::from(e)
                });
                let _ = tx.send(WeatherServiceMessage::CurrentDone { request, result });
            }
        }
    });
}

/// Request weather for many neighborhoods.
/// Sends `BatchProgress` after every chunk and `BatchDone` at the end.
pub fn request_batch(
    tx: &Sender<WeatherServiceMessage>,
    services: &AppServices,
    target: BatchTarget,
    request: u64,
    locations: Vec<Neighborhood>,
) {
    let tx = tx.clone();
    let client = services.weather();
    let options = services.batch_options();
    let token = services.shutdown_token();

    services.runtime().spawn(async move {
        let progress_tx = tx.clone();
        let fetch = client.batch(&locations, &options, move |done, total| {
            let _ = progress_tx.send(WeatherServiceMessage::BatchProgress {
                target,
                request,
                done,
                total,
            });
        });

        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("{:?} batch {} cancelled", target, request);
            }
            results = fetch => {
                let _ = tx.send(WeatherServiceMessage::BatchDone { target, request, results });
            }
        }
    });
}

/// Discover neighborhoods and fetch weather for the first `limit` of them.
/// Used by the one-shot CLI commands.
pub async fn fetch_city_weather<F>(
    services: &AppServices,
    limit: Option<usize>,
    on_progress: F,
) -> Vec<NeighborhoodWeather>
where
    F: FnMut(usize, usize),
{
    let mut neighborhoods = load_neighborhoods(&services.overpass(), &services.config().city)
        .await
        .neighborhoods;
    if let Some(limit) = limit {
        neighborhoods.truncate(limit);
    }

    services
        .weather()
        .batch(&neighborhoods, &services.batch_options(), on_progress)
        .await
}
