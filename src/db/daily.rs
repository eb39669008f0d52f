//! Queries for the `daily_stats` per-date rollups.

use crate::db::db_utils::{date_from_row, date_to_sql};
use crate::errors::AppResult;
use crate::models::daily::DailyAggregate;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<DailyAggregate> {
    Ok(DailyAggregate {
        date: date_from_row(row, "date")?,
        exercise_count: row.get("exercise_count")?,
        total_duration: row.get("total_duration")?,
    })
}

/// Create the row for `date` with count 1, or add one session to it.
pub fn add_completed(conn: &Connection, date: NaiveDate, duration: f64) -> AppResult<()> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO daily_stats (date, exercise_count, total_duration, created_at, updated_at)
         VALUES (?1, 1, ?2, ?3, ?3)
         ON CONFLICT(date) DO UPDATE SET
             exercise_count = exercise_count + 1,
             total_duration = total_duration + excluded.total_duration,
             updated_at     = excluded.updated_at",
        params![date_to_sql(date), duration, now],
    )?;
    Ok(())
}

pub fn load_day(conn: &Connection, date: NaiveDate) -> AppResult<Option<DailyAggregate>> {
    let day = conn
        .query_row(
            "SELECT * FROM daily_stats WHERE date = ?1",
            [date_to_sql(date)],
            map_row,
        )
        .optional()?;
    Ok(day)
}

/// Aggregates with `start <= date <= end`, ascending.
pub fn load_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyAggregate>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM daily_stats
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(params![date_to_sql(start), date_to_sql(end)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sum of counts with `start <= date <= end`; `None` bounds are open.
pub fn sum_counts(conn: &Connection, start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<u32> {
    let total: Option<i64> = conn.query_row(
        "SELECT SUM(exercise_count) FROM daily_stats
         WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)",
        params![start.map(date_to_sql), end.map(date_to_sql)],
        |row| row.get(0),
    )?;
    Ok(total.unwrap_or(0).max(0) as u32)
}

/// Dates with at least one session, on or before `until`, newest first.
pub fn active_dates_desc(conn: &Connection, until: NaiveDate) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM daily_stats
         WHERE exercise_count > 0 AND date <= ?1
         ORDER BY date DESC",
    )?;

    let rows = stmt.query_map([date_to_sql(until)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?.date);
    }
    Ok(out)
}
