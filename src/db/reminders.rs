//! Queries for the `reminder_logs` table.

use crate::db::db_utils::{bool_from_row, opt_ts_from_row, ts_from_row, ts_to_sql};
use crate::errors::AppResult;
use crate::models::reminder::ReminderEvent;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<ReminderEvent> {
    Ok(ReminderEvent {
        id: row.get("id")?,
        reminder_time: ts_from_row(row, "reminder_time")?,
        responded: bool_from_row(row, "responded")?,
        response_time: opt_ts_from_row(row, "response_time")?,
    })
}

pub fn insert_reminder(conn: &Connection, fired_at: &DateTime<Local>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO reminder_logs (reminder_time, responded, created_at)
         VALUES (?1, 0, ?2)",
        params![ts_to_sql(fired_at), Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent unanswered reminder fired at or after `since`.
pub fn latest_unanswered_since(
    conn: &Connection,
    since: &DateTime<Local>,
) -> AppResult<Option<ReminderEvent>> {
    let ev = conn
        .query_row(
            "SELECT * FROM reminder_logs
             WHERE responded = 0 AND reminder_time >= ?1
             ORDER BY reminder_time DESC, id DESC
             LIMIT 1",
            [ts_to_sql(since)],
            map_row,
        )
        .optional()?;
    Ok(ev)
}

pub fn mark_responded(conn: &Connection, id: i64, at: &DateTime<Local>) -> AppResult<()> {
    conn.execute(
        "UPDATE reminder_logs SET responded = 1, response_time = ?1 WHERE id = ?2",
        params![ts_to_sql(at), id],
    )?;
    Ok(())
}

/// Reminders fired within `[from, to)`, oldest first.
pub fn load_between(
    conn: &Connection,
    from: &DateTime<Local>,
    to: &DateTime<Local>,
) -> AppResult<Vec<ReminderEvent>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM reminder_logs
         WHERE reminder_time >= ?1 AND reminder_time < ?2
         ORDER BY reminder_time ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![ts_to_sql(from), ts_to_sql(to)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
