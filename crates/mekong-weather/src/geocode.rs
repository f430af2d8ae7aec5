//! Reverse geocoding: convert coordinates to a human-readable place name.
//! Uses the Open-Meteo geocoding endpoint - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::Coordinates;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    admin1: Option<String>,
    admin2: Option<String>,
}

impl GeocodingResult {
    /// Prefer the place name, then the first and second administrative areas
    fn place(self) -> Option<String> {
        [self.name, self.admin1, self.admin2]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

/// Look up a place name for the given coordinates.
/// Returns `None` on any failure; the caller keeps its default name.
#[instrument(skip(client), level = "debug")]
pub async fn reverse_geocode(client: &Client, url: &str, coords: Coordinates) -> Option<String> {
    let response = match client
        .get(url)
        .query(&[
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("count", "1".to_string()),
        ])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("Reverse geocode request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Reverse geocode returned status {}", response.status());
        return None;
    }

    let body: GeocodingResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!("Reverse geocode parse error: {}", e);
            return None;
        }
    };

    let place = body.results?.into_iter().next()?.place()?;
    tracing::info!("Reverse geocoded to: {}", place);
    Some(place)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: Option<&str>, admin1: Option<&str>, admin2: Option<&str>) -> GeocodingResult {
        GeocodingResult {
            name: name.map(str::to_string),
            admin1: admin1.map(str::to_string),
            admin2: admin2.map(str::to_string),
        }
    }

    #[test]
    fn test_place_prefers_name() {
        let r = result(Some("Châu Đốc"), Some("An Giang"), None);
        assert_eq!(r.place().as_deref(), Some("Châu Đốc"));
    }

    #[test]
    fn test_place_falls_back_to_admin_areas() {
        assert_eq!(
            result(None, Some("An Giang"), Some("Tri Tôn")).place().as_deref(),
            Some("An Giang")
        );
        assert_eq!(
            result(Some(""), None, Some("Tri Tôn")).place().as_deref(),
            Some("Tri Tôn")
        );
        assert_eq!(result(None, None, None).place(), None);
    }

    #[test]
    fn test_response_without_results_parses() {
        let body: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.2}"#).unwrap();
        assert!(body.results.is_none());
    }
}
