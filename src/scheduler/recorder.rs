use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::reminders::insert_reminder;
use crate::errors::AppResult;
use chrono::{DateTime, Local};

/// Sink for fired reminders.
pub trait ReminderRecorder: Send + Sync {
    fn record(&self, fired_at: DateTime<Local>) -> AppResult<()>;
}

/// Appends each fired reminder to `reminder_logs`, on a connection opened for
/// that single write.
#[derive(Debug, Clone)]
pub struct SqliteReminderRecorder {
    db_path: String,
}

impl SqliteReminderRecorder {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl ReminderRecorder for SqliteReminderRecorder {
    fn record(&self, fired_at: DateTime<Local>) -> AppResult<()> {
        let pool = DbPool::new(&self.db_path)?;
        init_db(&pool.conn)?;
        insert_reminder(&pool.conn, &fired_at)?;
        Ok(())
    }
}
