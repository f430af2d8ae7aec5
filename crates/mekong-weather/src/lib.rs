//! Weather panel for the Mekong farm assistant
//!
//! Detects an approximate location from the device's IP address, fetches
//! current conditions and a short daily forecast from Open-Meteo, and falls
//! back to static demo weather whenever live data cannot be obtained.

pub mod advisory;
pub mod fallback;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod service;
pub mod snapshot;
pub mod state;
pub mod types;

pub use types::*;
pub use fallback::fallback_snapshot;
pub use geocode::reverse_geocode;
pub use location::LocationResolver;
pub use provider::WeatherProvider;
pub use service::WeatherService;
pub use snapshot::{Acquired, LiveReading};
pub use state::WeatherState;
