use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

/// Counts Monday-to-Friday days in `[start, end]`, both ends inclusive.
pub fn calculate_work_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Whole days from `today` to `target`. Negative once the target has passed.
pub fn days_remaining(target: NaiveDate, today: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// `YYYY-MM-DD` of the UTC calendar date, as expected by date inputs.
pub fn format_date_for_input<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc).format("%Y-%m-%d").to_string()
}

pub fn hours_minutes_to_minutes(hours: u32, minutes: u32) -> u32 {
    hours * 60 + minutes
}

pub fn minutes_to_hours_minutes(total_minutes: u32) -> HoursMinutes {
    HoursMinutes { hours: total_minutes / 60, minutes: total_minutes % 60 }
}

/// Dialer-time label such as `2h 5m`, or `45m` under an hour.
pub fn format_minutes(total_minutes: u32) -> String {
    let HoursMinutes { hours, minutes } = minutes_to_hours_minutes(total_minutes);
    if hours == 0 {
        format!("{minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Rounds halves toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}
