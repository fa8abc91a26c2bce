pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    CityConfig, Config, ConfigSource, FallbackNeighborhood, LogPageConfig, ServiceConfig, UiConfig,
    ValidationResult, WeatherConfig,
};
pub use error::{AppError, GeoError, NetworkError, ReqwestErrorExt, WeatherError};

use anyhow::{Context, Result};
use std::path::Path;

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize the core application, logging to stderr
pub fn init() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    tracing::info!("Clima core initialized");
    Ok(())
}

/// Initialize the core application, logging to `log_path`.
///
/// Used by the terminal UI, which owns stdout and stderr while running.
pub fn init_with_log_file(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();

    tracing::info!("Clima core initialized, logging to {}", log_path.display());
    Ok(())
}
