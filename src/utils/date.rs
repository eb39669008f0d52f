//! Calendar helpers for the statistics windows.

use chrono::{Datelike, NaiveDate};

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// Most recent Monday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - chrono::Duration::days(day.weekday().num_days_from_monday() as i64)
}

pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Inclusive, ascending range of calendar days.
///
/// Cloning the range restarts it from its first day.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    /// The `days` calendar days ending at (and including) `end`.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        if days == 0 {
            return Self { next: None, end };
        }
        Self::new(end - chrono::Duration::days(days as i64 - 1), end)
    }

    /// First of the month through `day`.
    pub fn month_to_date(day: NaiveDate) -> Self {
        Self::new(month_start(day), day)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ_opt()
        } else {
            None
        };
        Some(current)
    }
}
