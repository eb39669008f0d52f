use chrono::{DateTime, Local};
use serde::Serialize;

/// A reminder that fired, and whether the user reacted to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEvent {
    pub id: i64,
    pub reminder_time: DateTime<Local>,
    pub responded: bool,
    pub response_time: Option<DateTime<Local>>,
}
