use anyhow::Result;
use std::sync::Arc;

use crate::{Config, ConfigSource, ValidationResult};

/// Application configuration and lifecycle
#[derive(Debug)]
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
    source: ConfigSource,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, validation, source) = Config::load_validated()?;
        Ok(Self {
            config: Arc::new(config),
            validation,
            source,
        })
    }

    /// Create an application around an already-loaded configuration.
    ///
    /// Fails when the configuration has validation errors.
    pub fn with_config(config: Config) -> Result<Self> {
        let validation = config.validate();
        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        Ok(Self {
            config: Arc::new(config),
            validation,
            source: ConfigSource::Memory,
        })
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for background tasks
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Where the configuration was loaded from
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Warnings collected while validating the configuration
    pub fn warnings(&self) -> &[crate::config::ConfigValidationError] {
        &self.validation.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_accepts_defaults() {
        let app = App::with_config(Config::default()).unwrap();
        assert_eq!(app.config().city.name, "Manaus");
        assert_eq!(app.source(), &ConfigSource::Memory);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let mut config = Config::default();
        config.city.name = String::new();
        assert!(App::with_config(config).is_err());
    }
}
