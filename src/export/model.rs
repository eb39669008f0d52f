// src/export/model.rs

use crate::models::session::ExerciseSession;
use serde::Serialize;

/// Flat row for a completed session, shared by the CSV and JSON writers.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    pub planned_duration_secs: u32,
    pub repetitions: u32,
}

impl From<&ExerciseSession> for SessionExport {
    fn from(s: &ExerciseSession) -> Self {
        Self {
            id: s.id,
            date: s.start_time.format("%Y-%m-%d").to_string(),
            start_time: s.start_time.to_rfc3339(),
            end_time: s.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            duration_secs: s.duration.unwrap_or(0.0),
            planned_duration_secs: s.planned_duration,
            repetitions: s.repetitions,
        }
    }
}
