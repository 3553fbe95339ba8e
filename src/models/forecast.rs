//! Forecast period as delivered by the forecast-data endpoint

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One forecast segment ("Tuesday", "Tuesday Night", ...)
///
/// Every field is optional so that a partially populated period from upstream
/// still deserializes; consumers decide what a missing field means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default)]
    pub name: Option<String>,
    /// ISO-8601 timestamp with offset, kept raw until needed
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub is_daytime: Option<bool>,
    #[serde(default)]
    pub temperature: Option<i64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub short_forecast: Option<String>,
}

impl ForecastPeriod {
    /// Parsed start timestamp; `None` when absent or malformed
    #[must_use]
    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        self.start_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    /// Calendar day of the start timestamp, in the timestamp's own offset
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start().map(|start| start.date_naive())
    }

    #[must_use]
    pub fn is_night(&self) -> bool {
        self.is_daytime == Some(false)
    }

    #[must_use]
    pub fn is_day(&self) -> bool {
        self.is_daytime == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upstream_period() {
        let period: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "number": 2,
            "name": "Tonight",
            "startTime": "2025-04-10T18:00:00-04:00",
            "endTime": "2025-04-11T06:00:00-04:00",
            "isDaytime": false,
            "temperature": 48,
            "temperatureUnit": "F",
            "windSpeed": "5 to 10 mph",
            "windDirection": "NW",
            "icon": "https://api.weather.gov/icons/land/night/few?size=medium",
            "shortForecast": "Mostly Clear"
        }))
        .unwrap();

        assert_eq!(period.name.as_deref(), Some("Tonight"));
        assert_eq!(period.temperature, Some(48));
        assert!(period.is_night());
        assert_eq!(
            period.start_date(),
            NaiveDate::from_ymd_opt(2025, 4, 10)
        );
    }

    #[test]
    fn test_start_date_uses_own_offset() {
        let period = ForecastPeriod {
            start_time: Some("2025-04-10T23:30:00-04:00".to_string()),
            ..Default::default()
        };
        // 03:30 UTC on the 11th, but still the 10th locally
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2025, 4, 10));
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let period: ForecastPeriod =
            serde_json::from_value(serde_json::json!({ "temperature": 65 })).unwrap();
        assert_eq!(period.temperature, Some(65));
        assert!(period.start().is_none());
        assert!(!period.is_day());
        assert!(!period.is_night());
    }

    #[test]
    fn test_malformed_start_time() {
        let period = ForecastPeriod {
            start_time: Some("next tuesday".to_string()),
            ..Default::default()
        };
        assert!(period.start_date().is_none());
    }
}
