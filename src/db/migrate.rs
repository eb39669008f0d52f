use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists. Versioned migrations are recorded here.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the base schema: settings singleton, session log, daily rollups and
/// the reminder log.
fn create_base_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id                    INTEGER PRIMARY KEY CHECK (id = 1),
            reminder_interval     INTEGER NOT NULL DEFAULT 30,
            exercise_duration     INTEGER NOT NULL DEFAULT 5,
            repetitions           INTEGER NOT NULL DEFAULT 10,
            enable_sound          INTEGER NOT NULL DEFAULT 1,
            enable_notifications  INTEGER NOT NULL DEFAULT 1,
            theme                 TEXT NOT NULL DEFAULT 'light',
            working_hours_start   TEXT NOT NULL DEFAULT '09:00',
            working_hours_end     TEXT NOT NULL DEFAULT '18:00',
            working_hours_enabled INTEGER NOT NULL DEFAULT 1,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS exercise_records (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time       TEXT NOT NULL,
            end_time         TEXT,
            duration         REAL,
            planned_duration INTEGER NOT NULL DEFAULT 5,
            repetitions      INTEGER NOT NULL DEFAULT 10,
            completed        INTEGER NOT NULL DEFAULT 0 CHECK(completed IN (0, 1)),
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_stats (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            date           TEXT NOT NULL UNIQUE,
            exercise_count INTEGER NOT NULL DEFAULT 0,
            total_duration REAL NOT NULL DEFAULT 0.0,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reminder_logs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            reminder_time TEXT NOT NULL,
            responded     INTEGER NOT NULL DEFAULT 0 CHECK(responded IN (0, 1)),
            response_time TEXT,
            created_at    TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Apply a versioned migration once, recording it in the `log` table.
fn apply_migration(conn: &Connection, version: &str, sql: &str, message: &str) -> Result<()> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(()); // already applied
    }

    conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", sql))
        .inspect_err(|_| {
            let _ = conn.execute_batch("ROLLBACK;");
        })?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        rusqlite::params![chrono::Local::now().to_rfc3339(), version, message],
    )?;

    info!(version, message, "migration applied");

    Ok(())
}

const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251018_0001_exercise_records_open_index",
        "CREATE INDEX IF NOT EXISTS idx_exercise_records_completed_start
             ON exercise_records(completed, start_time);",
        "Index exercise_records by completion and start time",
    ),
    (
        "20251018_0002_reminder_logs_time_index",
        "CREATE INDEX IF NOT EXISTS idx_reminder_logs_time
             ON reminder_logs(reminder_time);",
        "Index reminder_logs by fire time",
    ),
];

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base schema
    let fresh = !table_exists(conn, "exercise_records")?;
    create_base_tables(conn)?;
    if fresh {
        info!("created base schema");
    }

    // 3) Versioned migrations, in order
    for (version, sql, message) in MIGRATIONS {
        apply_migration(conn, version, sql, message)?;
    }

    Ok(())
}
