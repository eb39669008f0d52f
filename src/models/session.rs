use chrono::{DateTime, Local};
use serde::Serialize;

/// One exercise attempt. `end_time`/`duration` are set exactly once, when the
/// session is completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSession {
    pub id: i64,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    pub duration: Option<f64>, // seconds, end - start
    pub planned_duration: u32,
    pub repetitions: u32,
    pub completed: bool,
}

impl ExerciseSession {
    pub fn is_in_progress(&self) -> bool {
        !self.completed
    }
}

/// Seconds between two instants, millisecond precision.
pub fn elapsed_secs(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedSession {
    pub exercise_id: i64,
    pub start_time: DateTime<Local>,
    pub planned_duration: u32,
    pub repetitions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub exercise_id: i64,
    pub duration: f64,
    pub today_count: u32,
}
