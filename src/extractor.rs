//! Period extraction: reshapes raw forecast periods into evening summaries
//!
//! Nighttime periods starting no later than three days after today are kept,
//! each paired with the daytime period of the same date for its high.

use crate::models::{DisplayPeriod, ForecastPeriod};
use chrono::{DateTime, Days, Utc};

/// Days after today still included in the window
pub const WINDOW_DAYS: u64 = 3;

/// Upstream names shown as "Today"
const TODAY_SYNONYMS: [&str; 2] = ["This Afternoon", "Tonight"];

const DAY_LABEL_FORMAT: &str = "%m/%d/%y";

/// Extract display periods relative to the current instant
#[must_use]
pub fn extract_now(periods: &[ForecastPeriod]) -> Vec<DisplayPeriod> {
    extract(periods, Utc::now())
}

/// Extract display periods relative to `now`
///
/// Input order is preserved. A nighttime period without a parseable start
/// cannot be windowed and is dropped.
#[must_use]
pub fn extract(periods: &[ForecastPeriod], now: DateTime<Utc>) -> Vec<DisplayPeriod> {
    periods
        .iter()
        .filter(|period| period.is_night())
        .filter_map(|period| {
            let start = period.start()?;
            let today = now.with_timezone(start.offset()).date_naive();
            let last_day = today.checked_add_days(Days::new(WINDOW_DAYS))?;
            if start.date_naive() > last_day {
                return None;
            }
            Some(DisplayPeriod {
                name: period.name.as_deref().map(display_name),
                day: start.format(DAY_LABEL_FORMAT).to_string(),
                current_temp: period.temperature,
                high: high_for_day(periods, period),
                low: period.temperature,
                wind_speed: period.wind_speed.clone(),
                wind_direction: period.wind_direction.clone(),
                wind_icon: period.icon.clone(),
                temp_unit: period.temperature_unit.clone(),
                description: period.short_forecast.clone(),
            })
        })
        .collect()
}

fn display_name(name: &str) -> String {
    if TODAY_SYNONYMS.contains(&name) {
        "Today".to_string()
    } else {
        name.to_string()
    }
}

/// Temperature of the first daytime period on the same date as `period`
fn high_for_day(periods: &[ForecastPeriod], period: &ForecastPeriod) -> Option<i64> {
    let date = period.start_date()?;
    periods
        .iter()
        .find(|candidate| candidate.is_day() && candidate.start_date() == Some(date))
        .and_then(|candidate| candidate.temperature)
}
