pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod profile;

pub use app::App;
pub use config::{Config, DefaultLocation, GeoProviderConfig, GeoProviderKind, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
pub use i18n::Language;
pub use profile::{Farm, FontSize, Plot, ProfileStore, UserProfile};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Mekong core initialized");
    Ok(())
}
