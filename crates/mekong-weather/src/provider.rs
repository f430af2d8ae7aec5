//! Open-Meteo forecast client and response normalization.

use std::time::Duration;

use chrono::NaiveDate;
use mekong_core::{Language, NetworkError, ReqwestErrorExt, WeatherConfig, WeatherError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::fallback::today;
use crate::geocode::reverse_geocode;
use crate::snapshot::{Acquired, LiveReading};
use crate::types::{
    Coordinates, CurrentConditions, DailyForecast, WeatherCondition, WeatherSnapshot,
};

const USER_AGENT: &str = "Mekong/0.1.0";
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";
const FORECAST_DAYS: u8 = 7;
/// Index 0 is today; the panel shows the days after it
const MAX_FORECAST_INDEX: usize = 6;

/// Build the HTTP client shared by the resolver, fetcher and geocoder.
pub fn http_client(config: &WeatherConfig) -> Result<Client, WeatherError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| WeatherError::ClientInit(e.to_string()))
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    current: &'a str,
    daily: &'a str,
    timezone: &'a str,
    forecast_days: u8,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    current: Option<CurrentData>,
    daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    precipitation: Option<f64>,
    wind_speed_10m: Option<f64>,
    weather_code: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

/// Round to the nearest whole number, halves up
fn round_whole(value: Option<f64>) -> i32 {
    half_up(value.unwrap_or(0.0)) as i32
}

/// Round to one decimal place, halves up
fn round_tenth(value: Option<f64>) -> f64 {
    half_up(value.unwrap_or(0.0) * 10.0) / 10.0
}

/// Nearest integer with ties toward positive infinity. Compares against the
/// floor so no addition can round the input across a .5 boundary.
fn half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn normalize_current(current: &CurrentData) -> CurrentConditions {
    CurrentConditions {
        temperature: round_whole(current.temperature_2m),
        humidity: round_whole(current.relative_humidity_2m),
        rainfall: round_tenth(current.precipitation),
        wind_speed: round_whole(current.wind_speed_10m),
        condition: WeatherCondition::from_wmo_code(current.weather_code),
    }
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

/// Days 1 through 5 of the daily series.
fn extract_forecast(daily: &DailyData) -> Result<Vec<DailyForecast>, WeatherError> {
    let end = daily.time.len().min(MAX_FORECAST_INDEX);
    (1..end)
        .map(|i| {
            let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d").map_err(|e| {
                WeatherError::InvalidResponseShape(format!(
                    "daily.time[{}] = {:?}: {}",
                    i, daily.time[i], e
                ))
            })?;
            Ok(DailyForecast {
                date,
                high: round_whole(at(&daily.temperature_2m_max, i)),
                low: round_whole(at(&daily.temperature_2m_min, i)),
                rainfall: round_tenth(at(&daily.precipitation_sum, i)),
                condition: WeatherCondition::from_wmo_code(at(&daily.weather_code, i)),
            })
        })
        .collect()
}

/// Fetches live weather and turns it into a panel snapshot.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    config: WeatherConfig,
}

impl WeatherProvider {
    pub fn new(client: Client, config: WeatherConfig) -> Self {
        Self { client, config }
    }

    /// Fetch and normalize live weather.
    ///
    /// `coords` falls back to the configured default location. The resolver's
    /// `city` and `country` are used verbatim only when both are present.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_live(
        &self,
        coords: Option<Coordinates>,
        city: Option<&str>,
        country: Option<&str>,
    ) -> Result<LiveReading, WeatherError> {
        let defaults = &self.config.default_location;
        let coords = coords.unwrap_or(Coordinates {
            latitude: defaults.latitude,
            longitude: defaults.longitude,
        });

        let query = ForecastQuery {
            latitude: coords.latitude,
            longitude: coords.longitude,
            current: CURRENT_FIELDS,
            daily: DAILY_FIELDS,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };

        let response = self
            .client
            .get(&self.config.forecast_url)
            .query(&query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::provider_unavailable("forecast", e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::provider_unavailable(
                "forecast",
                NetworkError::ServerError {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("unknown").to_string(),
                },
            ));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponseShape(e.to_string()))?;

        let (Some(current), Some(daily)) = (body.current.as_ref(), body.daily.as_ref()) else {
            return Err(WeatherError::InvalidResponseShape(
                "forecast response lacks current or daily section".to_string(),
            ));
        };

        let current = normalize_current(current);
        let forecast = extract_forecast(daily)?;
        let timezone = body.timezone.unwrap_or_else(|| "UTC".to_string());

        let (place, country) = match (city, country) {
            (Some(city), Some(country)) => (city.to_string(), Some(country.to_string())),
            _ => {
                let place = reverse_geocode(&self.client, &self.config.geocoding_url, coords)
                    .await
                    .unwrap_or_else(|| {
                        tracing::debug!("Using default place name {}", defaults.name);
                        defaults.name.clone()
                    });
                (place, None)
            }
        };

        tracing::info!(
            "Fetched weather for {}: {}°C, {}",
            place,
            current.temperature,
            current.condition
        );

        Ok(LiveReading {
            place,
            country,
            timezone,
            current,
            forecast,
        })
    }

    /// Fetch a complete snapshot; any failure yields the fallback snapshot.
    pub async fn fetch_snapshot(
        &self,
        coords: Option<Coordinates>,
        city: Option<&str>,
        country: Option<&str>,
        language: Language,
    ) -> WeatherSnapshot {
        let acquired = match self.fetch_live(coords, city, country).await {
            Ok(reading) => Acquired::Live(reading),
            Err(e) => {
                tracing::warn!("Live weather unavailable, using fallback: {}", e);
                Acquired::Fallback
            }
        };
        WeatherSnapshot::build(acquired, language, &self.config.default_location, today())
    }
}
