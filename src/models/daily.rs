use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Per-date rollup of completed sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub exercise_count: u32,
    pub total_duration: f64,
}

/// One day of a chart series, zero-filled when no aggregate exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub day_name: String,
    pub day: u32,
    pub count: u32,
    pub duration: f64,
}

impl ChartPoint {
    pub fn new(date: NaiveDate, aggregate: Option<&DailyAggregate>) -> Self {
        Self {
            date,
            day_name: date.format("%a").to_string(),
            day: date.day(),
            count: aggregate.map(|a| a.exercise_count).unwrap_or(0),
            duration: aggregate.map(|a| a.total_duration).unwrap_or(0.0),
        }
    }
}
