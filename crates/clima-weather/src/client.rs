//! Cached, retrying weather client used by every page.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::cache::{cache_key, WeatherCache};
use crate::provider::WeatherProvider;
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{WeatherError, WeatherSnapshot};

#[derive(Debug, Clone)]
pub struct WeatherClient {
    provider: WeatherProvider,
    cache: Arc<WeatherCache>,
    retry: RetryPolicy,
}

impl WeatherClient {
    pub fn new(provider: WeatherProvider, cache_ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            provider,
            cache: Arc::new(WeatherCache::new(cache_ttl)),
            retry,
        }
    }

    /// Current conditions at a coordinate, served from cache when fresh
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let key = cache_key(lat, lon);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let snapshot = with_retry(&self.retry, |attempt| {
            tracing::debug!("Fetching weather for {} (attempt {})", key, attempt);
            self.provider.fetch(lat, lon)
        })
        .await?;

        tracing::debug!("Fetched weather for {}", key);
        self.cache.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    /// Like [`current`](Self::current) but logs failures and yields `None`
    pub async fn current_or_none(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        match self.current(lat, lon).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!("Weather lookup failed for {}: {}", cache_key(lat, lon), e);
                None
            }
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}
