use anyhow::Result;

use crate::{Config, Language, ProfileStore};

/// Main application state and lifecycle manager
pub struct App {
    config: Config,
    profile: ProfileStore,
}

impl App {
    /// Create a new application instance from the on-disk config and preferences
    pub fn new() -> Result<Self> {
        let (config, _warnings) = Config::load_validated()?;
        Self::with_config(config)
    }

    /// Create an application instance around an already-loaded config
    pub fn with_config(config: Config) -> Result<Self> {
        let profile = ProfileStore::open(&config.config_dir)?;
        Ok(Self { config, profile })
    }

    /// Log the startup state
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application (language: {}, signed in: {})",
            self.profile.language(),
            self.profile.user().is_some()
        );
        tracing::debug!(
            "Weather endpoints: forecast={} geocoding={}",
            self.config.weather.forecast_url,
            self.config.weather.geocoding_url
        );
        tracing::info!("Application initialized successfully");
        Ok(())
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

    pub fn language(&self) -> Language {
        self.profile.language()
    }

    pub fn profile_mut(&mut self) -> &mut ProfileStore {
        &mut self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_reads_language_from_profile_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.config_dir = dir.path().to_path_buf();

        let mut app = App::with_config(config).unwrap();
        assert_eq!(app.language(), Language::Vi);

        app.profile_mut().toggle_language().unwrap();
        assert_eq!(app.language(), Language::En);
        assert!(app.initialize().is_ok());
        assert!(app.shutdown().is_ok());
    }

    #[test]
    fn test_app_keeps_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.config_dir = dir.path().to_path_buf();
        config.weather.forecast_url = "http://localhost:9000/v1/forecast".into();

        let app = App::with_config(config).unwrap();
        assert_eq!(app.config().config_dir, dir.path());
        assert_eq!(app.config().weather.forecast_url, "http://localhost:9000/v1/forecast");
    }
}
