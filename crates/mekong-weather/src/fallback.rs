//! Static demo weather used whenever live data cannot be obtained.

use chrono::{Days, NaiveDate};
use mekong_core::Language;

use crate::advisory::advisories;
use crate::types::{
    CurrentConditions, DailyForecast, SnapshotOrigin, WeatherCondition, WeatherSnapshot,
};

const FALLBACK_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

/// (high, low, rainfall, condition) for the days after `today`
const FALLBACK_DAYS: [(i32, i32, f64, WeatherCondition); 5] = [
    (32, 24, 0.0, WeatherCondition::Sunny),
    (30, 23, 5.0, WeatherCondition::LightRain),
    (29, 22, 15.0, WeatherCondition::Rain),
    (31, 25, 0.0, WeatherCondition::PartlyCloudy),
    (33, 26, 0.0, WeatherCondition::Sunny),
];

/// Region label of the demo data
pub fn fallback_place(language: Language) -> &'static str {
    language.pick("Mekong Delta, Vietnam", "Đồng Bằng Sông Cửu Long, Việt Nam")
}

/// Today's date in the device's local timezone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The complete demo snapshot, with forecast days starting the day after `today`.
pub fn fallback_snapshot(language: Language, today: NaiveDate) -> WeatherSnapshot {
    let forecast = FALLBACK_DAYS
        .iter()
        .zip(1u64..)
        .filter_map(|(&(high, low, rainfall, condition), offset)| {
            today
                .checked_add_days(Days::new(offset))
                .map(|date| DailyForecast {
                    date,
                    high,
                    low,
                    rainfall,
                    condition,
                })
        })
        .collect();

    WeatherSnapshot {
        location: fallback_place(language).to_string(),
        timezone: FALLBACK_TIMEZONE.to_string(),
        current: CurrentConditions {
            temperature: 28,
            humidity: 78,
            rainfall: 0.0,
            wind_speed: 12,
            condition: WeatherCondition::PartlyCloudy,
        },
        forecast,
        alerts: advisories(language),
        language,
        origin: SnapshotOrigin::Fallback,
    }
}
