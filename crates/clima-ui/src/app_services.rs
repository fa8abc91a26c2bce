//! Shared application services.
//!
//! `AppServices` owns the tokio runtime that background work runs on, the
//! HTTP clients built from the configuration, and the shutdown token that
//! stops in-flight work when the application exits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use clima_core::{CityConfig, Config};
use clima_geo::{Neighborhood, NominatimClient, OverpassClient};
use clima_weather::{BatchOptions, RetryPolicy, WeatherClient, WeatherProvider};

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Cancelled on shutdown; spawned work selects on it
    shutdown: CancellationToken,

    config: Arc<Config>,

    overpass: Arc<OverpassClient>,

    nominatim: Arc<NominatimClient>,

    /// Weather client, including the shared snapshot cache
    weather: Arc<WeatherClient>,
}

impl AppServices {
    /// Build the runtime and every client from `config`
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("clima-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let services = &config.services;
        let request_timeout = Duration::from_secs(services.request_timeout_secs);

        let overpass = OverpassClient::new(
            services.overpass_url.clone(),
            &services.user_agent,
            Duration::from_secs(services.overpass_timeout_secs),
        )
        .context("Failed to create Overpass client")?;

        let nominatim = NominatimClient::new(
            services.nominatim_url.clone(),
            &services.user_agent,
            request_timeout,
        )
        .context("Failed to create Nominatim client")?;

        let provider = WeatherProvider::new(
            services.forecast_url.clone(),
            &services.user_agent,
            request_timeout,
        )
        .context("Failed to create weather provider")?;

        let weather = WeatherClient::new(
            provider,
            Duration::from_secs(u64::from(config.weather.cache_ttl_minutes) * 60),
            RetryPolicy::new(config.weather.max_attempts, config.weather.backoff_step_ms),
        );

        tracing::info!(
            "Services initialized for {} (forecast: {})",
            config.city.name,
            services.forecast_url
        );

        Ok(Self {
            runtime,
            shutdown: CancellationToken::new(),
            config,
            overpass: Arc::new(overpass),
            nominatim: Arc::new(nominatim),
            weather: Arc::new(weather),
        })
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Run a future to completion on the services runtime.
    /// Used by the one-shot CLI commands.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn overpass(&self) -> Arc<OverpassClient> {
        self.overpass.clone()
    }

    pub fn nominatim(&self) -> Arc<NominatimClient> {
        self.nominatim.clone()
    }

    pub fn weather(&self) -> Arc<WeatherClient> {
        self.weather.clone()
    }

    pub fn batch_options(&self) -> BatchOptions {
        let weather = &self.config.weather;
        BatchOptions {
            batch_size: weather.batch_size,
            pause: Duration::from_millis(weather.batch_pause_ms),
            max_jitter: Duration::from_millis(weather.max_jitter_ms),
        }
    }

    /// Child token for one piece of background work
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Signal shutdown and drop the weather cache.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown.cancel();
        self.weather.clear_cache();
        tracing::info!("AppServices shutdown complete");
    }
}

/// Configured fallback neighborhoods as domain values
pub fn fallback_neighborhoods(city: &CityConfig) -> Vec<Neighborhood> {
    city.fallback_neighborhoods
        .iter()
        .map(|n| Neighborhood::new(n.name.clone(), n.lat, n.lon))
        .collect()
}
