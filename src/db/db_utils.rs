//! Column conversion helpers shared by the query modules.

use crate::utils::date::{format_date, parse_date};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::Row;
use rusqlite::types::Type;

pub fn ts_to_sql(ts: &DateTime<Local>) -> String {
    ts.to_rfc3339()
}

pub fn date_to_sql(d: NaiveDate) -> String {
    format_date(d)
}

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
    )
}

pub fn ts_from_row(row: &Row, name: &str) -> rusqlite::Result<DateTime<Local>> {
    let idx = row.as_ref().column_index(name)?;
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_error(idx, format!("Invalid timestamp: {}", raw)))
}

pub fn opt_ts_from_row(row: &Row, name: &str) -> rusqlite::Result<Option<DateTime<Local>>> {
    let idx = row.as_ref().column_index(name)?;
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) if !s.is_empty() => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Local)))
            .map_err(|_| conversion_error(idx, format!("Invalid timestamp: {}", s))),
        _ => Ok(None),
    }
}

pub fn date_from_row(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let idx = row.as_ref().column_index(name)?;
    let raw: String = row.get(idx)?;
    parse_date(&raw).ok_or_else(|| conversion_error(idx, format!("Invalid date: {}", raw)))
}

pub fn bool_from_row(row: &Row, name: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(name)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn conversion_errors_name_the_failing_column() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT 1 AS id, 'not-a-date' AS day", [], |row| date_from_row(row, "day"))
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(1, _, _)));

        let err = conn
            .query_row("SELECT 1 AS id, 'garbage' AS start_time", [], |row| {
                ts_from_row(row, "start_time")
            })
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(1, _, _)));
    }

    #[test]
    fn unknown_column_is_reported_as_such() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT 1 AS id", [], |row| opt_ts_from_row(row, "end_time"))
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::InvalidColumnName(_)));
    }
}
