use chrono::NaiveDate;
use mekong_core::Language;
use serde::{Deserialize, Serialize};

/// Display conditions shown on the weather panel.
///
/// Live data only ever produces the WMO-derived buckets; `Sunny` appears in
/// the static demo forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    #[serde(rename = "Clear")]
    Clear,
    #[serde(rename = "Sunny")]
    Sunny,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    #[serde(rename = "Cloudy")]
    Cloudy,
    #[serde(rename = "Light Rain")]
    LightRain,
    #[serde(rename = "Rain")]
    Rain,
    #[serde(rename = "Heavy Rain")]
    HeavyRain,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl WeatherCondition {
    /// Bucket a WMO weather code by inclusive upper bounds.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: Option<i32>) -> Self {
        let Some(code) = code else {
            return Self::Unknown;
        };
        match code {
            0 => Self::Clear,
            c if c <= 3 => Self::PartlyCloudy,
            c if c <= 49 => Self::Cloudy,
            c if c <= 67 => Self::LightRain,
            c if c <= 77 => Self::Rain,
            c if c <= 86 => Self::HeavyRain,
            // Thunderstorms and anything newer
            _ => Self::Rain,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::LightRain => "Light Rain",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Unknown => "Unknown",
        }
    }

    pub fn localized(&self, language: Language) -> &'static str {
        match self {
            Self::Clear => language.pick("Clear", "Quang đãng"),
            Self::Sunny => language.pick("Sunny", "Nắng"),
            Self::PartlyCloudy => language.pick("Partly Cloudy", "Có mây rải rác"),
            Self::Cloudy => language.pick("Cloudy", "Nhiều mây"),
            Self::LightRain => language.pick("Light Rain", "Mưa nhẹ"),
            Self::Rain => language.pick("Rain", "Mưa"),
            Self::HeavyRain => language.pick("Heavy Rain", "Mưa lớn"),
            Self::Unknown => language.pick("Unknown", "Không rõ"),
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Farming advisory shown under the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Approximate device location from an IP-geolocation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// °C, whole degrees
    pub temperature: i32,
    /// Relative humidity, whole percent
    pub humidity: i32,
    /// mm, one decimal place
    pub rainfall: f64,
    /// km/h, whole units
    pub wind_speed: i32,
    pub condition: WeatherCondition,
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high: i32,
    pub low: i32,
    pub rainfall: f64,
    pub condition: WeatherCondition,
}

/// Where a snapshot's data came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SnapshotOrigin {
    /// Live API data. `country: None` means the default country label was used,
    /// which follows the display language.
    Live {
        place: String,
        country: Option<String>,
    },
    /// Static demo data
    Fallback,
}

/// Complete weather record for the panel, replaced wholesale on every refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    /// IANA timezone identifier, e.g. `Asia/Ho_Chi_Minh`
    pub timezone: String,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    pub alerts: Vec<Advisory>,
    pub language: Language,
    pub origin: SnapshotOrigin,
}

impl WeatherSnapshot {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, SnapshotOrigin::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(0)), WeatherCondition::Clear);
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(1)), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(Some(2)), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(Some(3)), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_wmo_code_cloudy() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(4)), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_wmo_code(Some(45)), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_wmo_code(Some(49)), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_wmo_code_light_rain() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(50)), WeatherCondition::LightRain);
        assert_eq!(WeatherCondition::from_wmo_code(Some(61)), WeatherCondition::LightRain);
        assert_eq!(WeatherCondition::from_wmo_code(Some(67)), WeatherCondition::LightRain);
    }

    #[test]
    fn test_wmo_code_rain() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(71)), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(Some(77)), WeatherCondition::Rain);
    }

    #[test]
    fn test_wmo_code_heavy_rain() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(80)), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_wmo_code(Some(86)), WeatherCondition::HeavyRain);
    }

    #[test]
    fn test_wmo_code_above_table_is_rain() {
        assert_eq!(WeatherCondition::from_wmo_code(Some(95)), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(Some(200)), WeatherCondition::Rain);
    }

    #[test]
    fn test_wmo_code_absent_is_unknown() {
        assert_eq!(WeatherCondition::from_wmo_code(None), WeatherCondition::Unknown);
    }

    #[test]
    fn test_condition_serializes_as_display_text() {
        let json = serde_json::to_string(&WeatherCondition::PartlyCloudy).unwrap();
        assert_eq!(json, "\"Partly Cloudy\"");
        assert_eq!(WeatherCondition::HeavyRain.to_string(), "Heavy Rain");
    }

    #[test]
    fn test_condition_localized() {
        assert_eq!(WeatherCondition::Rain.localized(Language::En), "Rain");
        assert_eq!(WeatherCondition::Rain.localized(Language::Vi), "Mưa");
    }

    #[test]
    fn test_current_conditions_field_names() {
        let current = CurrentConditions {
            temperature: 28,
            humidity: 78,
            rainfall: 0.0,
            wind_speed: 12,
            condition: WeatherCondition::PartlyCloudy,
        };
        let value = serde_json::to_value(&current).unwrap();
        assert_eq!(value["windSpeed"], 12);
        assert_eq!(value["condition"], "Partly Cloudy");
    }
}
