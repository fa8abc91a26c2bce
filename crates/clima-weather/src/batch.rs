//! Batched lookups for many neighborhoods.
//!
//! Locations are processed in fixed-size chunks. Requests within a chunk run
//! concurrently, each after a small random delay so they do not hit the
//! forecast service in the same instant; chunks are separated by a pause.

use std::time::Duration;

use clima_geo::Neighborhood;
use futures::future::join_all;
use rand::Rng;

use crate::client::WeatherClient;
use crate::types::NeighborhoodWeather;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Requests in flight per chunk; 0 behaves like 1
    pub batch_size: usize,
    /// Pause between chunks (not after the last one)
    pub pause: Duration,
    /// Upper bound (exclusive) of the per-request random delay
    pub max_jitter: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            pause: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(500),
        }
    }
}

fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
}

impl WeatherClient {
    /// Fetch weather for every location, reporting cumulative progress after
    /// each chunk as `(processed, total)`.
    ///
    /// Results keep the input order; failed lookups carry `weather: None`.
    pub async fn batch<F>(
        &self,
        locations: &[Neighborhood],
        options: &BatchOptions,
        mut on_progress: F,
    ) -> Vec<NeighborhoodWeather>
    where
        F: FnMut(usize, usize),
    {
        let total = locations.len();
        let chunk_size = options.batch_size.max(1);
        let mut results = Vec::with_capacity(total);

        tracing::info!(
            "Fetching weather for {} locations in chunks of {}",
            total,
            chunk_size
        );

        let chunks: Vec<&[Neighborhood]> = locations.chunks(chunk_size).collect();
        let chunk_count = chunks.len();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let requests = chunk.iter().map(|neighborhood| {
                let delay = jitter(options.max_jitter);
                async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let weather = self
                        .current_or_none(neighborhood.lat, neighborhood.lon)
                        .await;
                    NeighborhoodWeather {
                        neighborhood: neighborhood.clone(),
                        weather,
                    }
                }
            });

            results.extend(join_all(requests).await);
            on_progress(results.len(), total);

            if index + 1 < chunk_count && !options.pause.is_zero() {
                tokio::time::sleep(options.pause).await;
            }
        }

        let failed = results.iter().filter(|r| r.weather.is_none()).count();
        if failed > 0 {
            tracing::warn!("{} of {} weather lookups failed", failed, total);
        }

        results
    }
}
