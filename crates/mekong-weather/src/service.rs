//! Weather refresh flow: resolve location, fetch, install one snapshot.

use std::sync::Arc;

use mekong_core::{Config, Language, WeatherError};

use crate::location::LocationResolver;
use crate::provider::{http_client, WeatherProvider};
use crate::state::WeatherState;
use crate::types::WeatherSnapshot;

/// Owns the resolver, the fetcher and the shared weather state.
pub struct WeatherService {
    resolver: LocationResolver,
    provider: WeatherProvider,
    state: Arc<WeatherState>,
}

impl WeatherService {
    pub fn new(config: &Config, language: Language) -> Result<Self, WeatherError> {
        let client = http_client(&config.weather)?;
        Ok(Self {
            resolver: LocationResolver::new(client.clone(), config.location.providers.clone()),
            provider: WeatherProvider::new(client, config.weather.clone()),
            state: Arc::new(WeatherState::new(
                language,
                config.weather.default_location.clone(),
            )),
        })
    }

    /// Shared handle for readers of the panel state
    pub fn state(&self) -> Arc<WeatherState> {
        self.state.clone()
    }

    pub fn set_language(&self, language: Language) {
        self.state.set_language(language);
    }

    /// Drop the displayed weather on logout
    pub fn clear(&self) {
        self.state.clear();
    }

    /// Run one refresh and return the snapshot it installed. Never fails:
    /// without a location the default coordinates are used, and without live
    /// data the fallback snapshot is installed.
    pub async fn refresh(&self) -> Arc<WeatherSnapshot> {
        let language = self.state.begin_refresh();

        let location = match self.resolver.resolve().await {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!("Location unavailable, using default coordinates: {}", e);
                None
            }
        };

        let snapshot = match &location {
            Some(loc) => {
                self.provider
                    .fetch_snapshot(
                        Some(loc.coordinates()),
                        Some(loc.city.as_str()),
                        loc.country.as_deref(),
                        language,
                    )
                    .await
            }
            None => self.provider.fetch_snapshot(None, None, None, language).await,
        };

        self.state.install(snapshot)
    }
}
