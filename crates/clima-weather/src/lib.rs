//! Weather service for Clima
//!
//! Fetches current conditions from the MET Norway locationforecast API with
//! an in-memory TTL cache, retry with backoff, and a batched variant for
//! many neighborhoods at once. Also hosts the derived metrics and the
//! temperature color bands shared by the map and chart pages.

pub mod bands;
pub mod batch;
pub mod cache;
pub mod client;
pub mod metrics;
pub mod provider;
pub mod retry;
pub mod types;

pub use bands::{color_for, heat_intensity, TemperatureLevel};
pub use batch::BatchOptions;
pub use cache::{cache_key, WeatherCache};
pub use client::WeatherClient;
pub use metrics::{chart_points, extremes, heat_index, summarize, ChartPoint, Extremes, Summary};
pub use provider::WeatherProvider;
pub use retry::RetryPolicy;
pub use types::*;
