//! Display model produced by the period extractor

use serde::{Deserialize, Serialize};

/// Compact per-evening summary handed to callers and stored in the cache
///
/// `low` always equals `current_temp`: the evening temperature doubles as the
/// day's low. `high` comes from the daytime period of the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPeriod {
    /// Upstream period name, with "Tonight"/"This Afternoon" shown as "Today"
    pub name: Option<String>,
    /// Start date as `%m/%d/%y`
    pub day: String,
    pub current_temp: Option<i64>,
    pub high: Option<i64>,
    pub low: Option<i64>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    /// Icon URL from upstream
    pub wind_icon: Option<String>,
    pub temp_unit: Option<String>,
    pub description: Option<String>,
}

impl DisplayPeriod {
    /// Format the high/low pair with unit, e.g. `72°F / 65°F`
    #[must_use]
    pub fn format_temperature_range(&self) -> String {
        let unit = self.temp_unit.as_deref().unwrap_or("");
        let show = |value: Option<i64>| match value {
            Some(v) => format!("{v}°{unit}"),
            None => "--".to_string(),
        };
        format!("{} / {}", show(self.high), show(self.low))
    }

    /// Format wind information, e.g. `5 to 10 mph NW`
    #[must_use]
    pub fn format_wind(&self) -> String {
        match (self.wind_speed.as_deref(), self.wind_direction.as_deref()) {
            (Some(speed), Some(direction)) => format!("{speed} {direction}"),
            (Some(speed), None) => speed.to_string(),
            (None, Some(direction)) => direction.to_string(),
            (None, None) => "--".to_string(),
        }
    }
}
