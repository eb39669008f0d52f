//! Time-of-day utilities: parsing HH:MM and minutes since midnight.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Strict `HH:MM` parsing, reported as a validation failure.
pub fn parse_hhmm(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::Validation(format!("Invalid time '{}': expected HH:MM", t)))
}

pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub fn minutes_since_midnight(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}
