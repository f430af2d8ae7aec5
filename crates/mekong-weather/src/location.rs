//! Approximate device location from public IP-geolocation services.

use mekong_core::{GeoProviderConfig, GeoProviderKind, NetworkError, ReqwestErrorExt, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::Location;

/// A coordinate sent either as a JSON number or as a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// ipapi.co record
#[derive(Debug, Deserialize)]
struct IpApiRecord {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    latitude: Option<CoordinateValue>,
    longitude: Option<CoordinateValue>,
}

/// get.geojs.io record
#[derive(Debug, Deserialize)]
struct GeoJsRecord {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    latitude: Option<CoordinateValue>,
    longitude: Option<CoordinateValue>,
}

/// Provider-neutral view of a geolocation record
struct RawLocation {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    latitude: Option<CoordinateValue>,
    longitude: Option<CoordinateValue>,
}

impl From<IpApiRecord> for RawLocation {
    fn from(r: IpApiRecord) -> Self {
        Self {
            city: r.city,
            region: r.region,
            country: r.country_name,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

impl From<GeoJsRecord> for RawLocation {
    fn from(r: GeoJsRecord) -> Self {
        Self {
            city: r.city,
            region: r.region,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawLocation {
    /// Usable when the city is non-empty and both coordinates parse
    fn into_location(self) -> Option<Location> {
        let latitude = self.latitude.as_ref().and_then(CoordinateValue::as_f64)?;
        let longitude = self.longitude.as_ref().and_then(CoordinateValue::as_f64)?;
        let city = non_empty(self.city)?;
        Some(Location {
            latitude,
            longitude,
            city,
            region: non_empty(self.region),
            country: non_empty(self.country),
        })
    }
}

fn provider_label(kind: GeoProviderKind) -> &'static str {
    match kind {
        GeoProviderKind::IpApi => "ipapi.co",
        GeoProviderKind::GeoJs => "geojs.io",
    }
}

/// Parse a provider's JSON body into a usable location.
fn parse_record(kind: GeoProviderKind, body: serde_json::Value) -> Result<Location, WeatherError> {
    let raw: RawLocation = match kind {
        GeoProviderKind::IpApi => serde_json::from_value::<IpApiRecord>(body).map(Into::into),
        GeoProviderKind::GeoJs => serde_json::from_value::<GeoJsRecord>(body).map(Into::into),
    }
    .map_err(|e| {
        WeatherError::InvalidResponseShape(format!("{}: {}", provider_label(kind), e))
    })?;

    raw.into_location().ok_or_else(|| {
        WeatherError::InvalidResponseShape(format!(
            "{}: record lacks a city or coordinates",
            provider_label(kind)
        ))
    })
}

/// Tries each configured IP-geolocation provider in order.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    providers: Vec<GeoProviderConfig>,
}

impl LocationResolver {
    pub fn new(client: Client, providers: Vec<GeoProviderConfig>) -> Self {
        Self { client, providers }
    }

    /// Resolve the device location; the first usable record wins.
    pub async fn resolve(&self) -> Result<Location, WeatherError> {
        for provider in &self.providers {
            match self.attempt(provider).await {
                Ok(location) => {
                    tracing::info!(
                        "Resolved location via {}: {} ({}, {})",
                        provider_label(provider.kind),
                        location.city,
                        location.latitude,
                        location.longitude
                    );
                    return Ok(location);
                }
                Err(e) => {
                    tracing::warn!("Location provider failed, trying next: {}", e);
                }
            }
        }

        Err(WeatherError::NoUsableLocation {
            attempted: self.providers.len(),
        })
    }

    #[instrument(skip(self), fields(provider = provider_label(provider.kind)), level = "debug")]
    async fn attempt(&self, provider: &GeoProviderConfig) -> Result<Location, WeatherError> {
        let label = provider_label(provider.kind);

        let response = self
            .client
            .get(&provider.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::provider_unavailable(label, e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::provider_unavailable(
                label,
                NetworkError::ServerError {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("unknown").to_string(),
                },
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponseShape(format!("{}: {}", label, e)))?;

        parse_record(provider.kind, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ipapi_numeric_coordinates() {
        let body = json!({
            "city": "Can Tho",
            "region": "Can Tho",
            "country_name": "Vietnam",
            "latitude": 10.0452,
            "longitude": 105.7469
        });
        let location = parse_record(GeoProviderKind::IpApi, body).unwrap();
        assert_eq!(location.city, "Can Tho");
        assert_eq!(location.country.as_deref(), Some("Vietnam"));
        assert_eq!(location.latitude, 10.0452);
    }

    #[test]
    fn test_geojs_string_coordinates() {
        let body = json!({
            "city": "Ho Chi Minh City",
            "country": "Vietnam",
            "latitude": "10.8142",
            "longitude": "106.6438"
        });
        let location = parse_record(GeoProviderKind::GeoJs, body).unwrap();
        assert_eq!(location.longitude, 106.6438);
        assert!(location.region.is_none());
    }

    #[test]
    fn test_zero_coordinate_counts_as_present() {
        let body = json!({ "city": "Null Island", "latitude": 0, "longitude": "0" });
        let location = parse_record(GeoProviderKind::GeoJs, body).unwrap();
        assert_eq!(location.latitude, 0.0);
        assert_eq!(location.longitude, 0.0);
    }

    #[test]
    fn test_missing_latitude_is_unusable() {
        let body = json!({ "city": "Can Tho", "longitude": 105.7 });
        let err = parse_record(GeoProviderKind::IpApi, body).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponseShape(_)));
    }

    #[test]
    fn test_empty_city_is_unusable() {
        let body = json!({ "city": " ", "latitude": 10.0, "longitude": 105.0 });
        assert!(parse_record(GeoProviderKind::IpApi, body).is_err());
    }

    #[test]
    fn test_non_numeric_string_is_unusable() {
        let body = json!({ "city": "X", "latitude": "nan-ish", "longitude": "105" });
        assert!(parse_record(GeoProviderKind::GeoJs, body).is_err());
    }

    #[test]
    fn test_ipapi_error_body_is_unusable() {
        let body = json!({ "error": true, "reason": "RateLimited" });
        assert!(parse_record(GeoProviderKind::IpApi, body).is_err());
    }

    #[tokio::test]
    async fn test_no_providers_is_no_usable_location() {
        let resolver = LocationResolver::new(Client::new(), Vec::new());
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, WeatherError::NoUsableLocation { attempted: 0 }));
    }
}
