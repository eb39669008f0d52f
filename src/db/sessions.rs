//! Queries for the `exercise_records` session log.

use crate::db::db_utils::{bool_from_row, opt_ts_from_row, ts_from_row, ts_to_sql};
use crate::errors::AppResult;
use crate::models::session::ExerciseSession;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<ExerciseSession> {
    Ok(ExerciseSession {
        id: row.get("id")?,
        start_time: ts_from_row(row, "start_time")?,
        end_time: opt_ts_from_row(row, "end_time")?,
        duration: row.get("duration")?,
        planned_duration: row.get("planned_duration")?,
        repetitions: row.get("repetitions")?,
        completed: bool_from_row(row, "completed")?,
    })
}

/// Insert a new in-progress session and return its id.
pub fn insert_session(
    conn: &Connection,
    start: &DateTime<Local>,
    planned_duration: u32,
    repetitions: u32,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO exercise_records (start_time, planned_duration, repetitions, completed, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        params![
            ts_to_sql(start),
            planned_duration,
            repetitions,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The "current" session: most recent by start time among the incomplete ones.
pub fn latest_in_progress(conn: &Connection) -> AppResult<Option<ExerciseSession>> {
    let session = conn
        .query_row(
            "SELECT * FROM exercise_records
             WHERE completed = 0
             ORDER BY start_time DESC, id DESC
             LIMIT 1",
            [],
            map_row,
        )
        .optional()?;
    Ok(session)
}

/// Mark a session completed. Only an in-progress row is touched; returns
/// false when nothing was updated.
pub fn mark_completed(
    conn: &Connection,
    id: i64,
    end: &DateTime<Local>,
    duration: f64,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE exercise_records
         SET end_time = ?1, duration = ?2, completed = 1
         WHERE id = ?3 AND completed = 0",
        params![ts_to_sql(end), duration, id],
    )?;
    Ok(changed == 1)
}

pub fn load_session(conn: &Connection, id: i64) -> AppResult<Option<ExerciseSession>> {
    let session = conn
        .query_row("SELECT * FROM exercise_records WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(session)
}

/// Completed sessions, newest first.
pub fn completed_history(conn: &Connection, limit: u32) -> AppResult<Vec<ExerciseSession>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM exercise_records
         WHERE completed = 1
         ORDER BY start_time DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every completed session, oldest first.
pub fn completed_ascending(conn: &Connection) -> AppResult<Vec<ExerciseSession>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM exercise_records
         WHERE completed = 1
         ORDER BY start_time ASC, id ASC",
    )?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// End time of the most recently completed session.
pub fn last_completed_end(conn: &Connection) -> AppResult<Option<DateTime<Local>>> {
    let last = conn
        .query_row(
            "SELECT * FROM exercise_records
             WHERE completed = 1 AND end_time IS NOT NULL
             ORDER BY end_time DESC, id DESC
             LIMIT 1",
            [],
            map_row,
        )
        .optional()?;
    Ok(last.and_then(|s| s.end_time))
}

/// (total sessions, completed sessions, average completed duration)
pub fn session_counters(conn: &Connection) -> AppResult<(u32, u32, Option<f64>)> {
    let counters = conn.query_row(
        "SELECT COUNT(*),
                IFNULL(SUM(completed), 0),
                (SELECT AVG(duration) FROM exercise_records WHERE completed = 1)
         FROM exercise_records",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    Ok(counters)
}
