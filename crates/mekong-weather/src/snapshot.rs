//! Turning a live-or-fallback acquisition into one complete snapshot.

use chrono::NaiveDate;
use mekong_core::{DefaultLocation, Language};

use crate::advisory::advisories;
use crate::fallback::{fallback_place, fallback_snapshot};
use crate::types::{CurrentConditions, DailyForecast, SnapshotOrigin, WeatherSnapshot};

/// Normalized live weather before localization.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveReading {
    /// Place name: resolver city, reverse-geocoded name, or the default name
    pub place: String,
    /// Resolver country, used verbatim. `None` means the default country label.
    pub country: Option<String>,
    pub timezone: String,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

/// Outcome of one acquisition attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Acquired {
    Live(LiveReading),
    Fallback,
}

fn display_location(
    place: &str,
    country: Option<&str>,
    language: Language,
    default_location: &DefaultLocation,
) -> String {
    let country = country.unwrap_or_else(|| default_location.country_label(language));
    format!("{}, {}", place, country)
}

impl WeatherSnapshot {
    /// Build the snapshot that replaces whatever the panel currently shows.
    pub fn build(
        acquired: Acquired,
        language: Language,
        default_location: &DefaultLocation,
        today: NaiveDate,
    ) -> Self {
        match acquired {
            Acquired::Live(reading) => Self {
                location: display_location(
                    &reading.place,
                    reading.country.as_deref(),
                    language,
                    default_location,
                ),
                timezone: reading.timezone,
                current: reading.current,
                forecast: reading.forecast,
                alerts: advisories(language),
                language,
                origin: SnapshotOrigin::Live {
                    place: reading.place,
                    country: reading.country,
                },
            },
            Acquired::Fallback => fallback_snapshot(language, today),
        }
    }

    /// Re-render the language-dependent parts without refetching.
    #[must_use]
    pub fn relocalized(&self, language: Language, default_location: &DefaultLocation) -> Self {
        let location = match &self.origin {
            SnapshotOrigin::Live { place, country } => {
                display_location(place, country.as_deref(), language, default_location)
            }
            SnapshotOrigin::Fallback => fallback_place(language).to_string(),
        };

        Self {
            location,
            alerts: advisories(language),
            language,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn reading(country: Option<&str>) -> LiveReading {
        LiveReading {
            place: "Long Xuyên".to_string(),
            country: country.map(str::to_string),
            timezone: "Asia/Bangkok".to_string(),
            current: CurrentConditions {
                temperature: 31,
                humidity: 70,
                rainfall: 0.4,
                wind_speed: 9,
                condition: WeatherCondition::Cloudy,
            },
            forecast: Vec::new(),
        }
    }

    #[test]
    fn test_live_with_country_is_verbatim() {
        let snapshot = WeatherSnapshot::build(
            Acquired::Live(reading(Some("Vietnam"))),
            Language::Vi,
            &DefaultLocation::default(),
            today(),
        );
        assert_eq!(snapshot.location, "Long Xuyên, Vietnam");
        assert_eq!(snapshot.timezone, "Asia/Bangkok");
        assert!(!snapshot.is_fallback());
    }

    #[test]
    fn test_live_without_country_uses_language_label() {
        let defaults = DefaultLocation::default();
        let snapshot = WeatherSnapshot::build(
            Acquired::Live(reading(None)),
            Language::Vi,
            &defaults,
            today(),
        );
        assert_eq!(snapshot.location, "Long Xuyên, Việt Nam");

        let english = snapshot.relocalized(Language::En, &defaults);
        assert_eq!(english.location, "Long Xuyên, Vietnam");
        assert_eq!(english.alerts[0].kind, "Monsoon Season Advisory");
        assert_eq!(english.current, snapshot.current);
    }

    #[test]
    fn test_fallback_build_matches_fallback_snapshot() {
        let snapshot = WeatherSnapshot::build(
            Acquired::Fallback,
            Language::En,
            &DefaultLocation::default(),
            today(),
        );
        assert_eq!(snapshot, fallback_snapshot(Language::En, today()));
    }

    #[test]
    fn test_relocalized_fallback_equals_fresh_fallback() {
        let defaults = DefaultLocation::default();
        let vi = fallback_snapshot(Language::Vi, today());
        assert_eq!(
            vi.relocalized(Language::En, &defaults),
            fallback_snapshot(Language::En, today())
        );
    }
}
