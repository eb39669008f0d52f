//! Queries for the singleton `settings` row.

use crate::db::db_utils::bool_from_row;
use crate::errors::{AppError, AppResult};
use crate::models::settings::{Settings, WorkingHours};
use crate::utils::time::format_hhmm;
use chrono::{Local, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<Settings> {
    let parse = |col: &str| -> rusqlite::Result<NaiveTime> {
        let raw: String = row.get(col)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::Validation(format!("Invalid time in {}: {}", col, raw))),
            )
        })
    };

    Ok(Settings {
        reminder_interval: row.get("reminder_interval")?,
        exercise_duration: row.get("exercise_duration")?,
        repetitions: row.get("repetitions")?,
        enable_sound: bool_from_row(row, "enable_sound")?,
        enable_notifications: bool_from_row(row, "enable_notifications")?,
        theme: row.get("theme")?,
        working_hours: WorkingHours {
            start: parse("working_hours_start")?,
            end: parse("working_hours_end")?,
            enabled: bool_from_row(row, "working_hours_enabled")?,
        },
    })
}

/// The stored settings, if the row has been created.
pub fn load_settings(conn: &Connection) -> AppResult<Option<Settings>> {
    let settings = conn
        .query_row("SELECT * FROM settings WHERE id = 1", [], map_row)
        .optional()?;
    Ok(settings)
}

/// Stored settings or `NotFound`.
pub fn require_settings(conn: &Connection) -> AppResult<Settings> {
    load_settings(conn)?.ok_or_else(|| AppError::NotFound("User settings do not exist".into()))
}

/// Insert or overwrite the singleton row.
pub fn save_settings(conn: &Connection, s: &Settings) -> AppResult<()> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO settings (
             id, reminder_interval, exercise_duration, repetitions,
             enable_sound, enable_notifications, theme,
             working_hours_start, working_hours_end, working_hours_enabled,
             created_at, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         ON CONFLICT(id) DO UPDATE SET
             reminder_interval     = excluded.reminder_interval,
             exercise_duration     = excluded.exercise_duration,
             repetitions           = excluded.repetitions,
             enable_sound          = excluded.enable_sound,
             enable_notifications  = excluded.enable_notifications,
             theme                 = excluded.theme,
             working_hours_start   = excluded.working_hours_start,
             working_hours_end     = excluded.working_hours_end,
             working_hours_enabled = excluded.working_hours_enabled,
             updated_at            = excluded.updated_at",
        params![
            s.reminder_interval,
            s.exercise_duration,
            s.repetitions,
            s.enable_sound as i64,
            s.enable_notifications as i64,
            s.theme,
            format_hhmm(s.working_hours.start),
            format_hhmm(s.working_hours.end),
            s.working_hours.enabled as i64,
            now,
        ],
    )?;
    Ok(())
}
