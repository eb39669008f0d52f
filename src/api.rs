//! Request/response facade over settings, sessions, statistics and the
//! reminder scheduler.
//!
//! Every operation opens its own connection on the configured database, so
//! nothing read here survives past a single call.

use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::core::settings::SettingsLogic;
use crate::core::stats::{PerformanceMetrics, ReminderSummary, StatsService, StatsSummary};
use crate::db::initialize::init_db;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppResult, ErrorKind};
use crate::models::daily::ChartPoint;
use crate::models::session::{CompletedSession, ExerciseSession, StartedSession};
use crate::models::settings::{Settings, SettingsPatch};
use crate::scheduler::{Cadence, ReminderScheduler};
use crate::utils::clock::{Clock, SystemClock};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatus {
    pub enabled: bool,
    pub next_reminder: Option<DateTime<Local>>,
    /// Minutes, from the stored settings.
    pub interval: u32,
}

pub struct App {
    db_path: String,
    defaults: Settings,
    clock: Arc<dyn Clock>,
    scheduler: ReminderScheduler,
}

impl App {
    pub fn new(
        db_path: impl Into<String>,
        defaults: Settings,
        clock: Arc<dyn Clock>,
        scheduler: ReminderScheduler,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            defaults,
            clock,
            scheduler,
        }
    }

    /// Production wiring for the configured database.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.database.clone(),
            cfg.default_settings(),
            Arc::new(SystemClock),
            ReminderScheduler::for_database(&cfg.database),
        )
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn pool(&self) -> AppResult<DbPool> {
        let pool = DbPool::new(&self.db_path)?;
        init_db(&pool.conn)?;
        Ok(pool)
    }

    // ---------------------------
    // Settings
    // ---------------------------

    pub fn get_settings(&self) -> AppResult<Settings> {
        let pool = self.pool()?;
        SettingsLogic::get_or_create(&pool.conn, &self.defaults)
    }

    /// Partial update. An installed reminder is reinstalled when the new
    /// settings describe a different cadence.
    pub fn update_settings(&self, patch: &SettingsPatch) -> AppResult<Settings> {
        let pool = self.pool()?;
        let next = SettingsLogic::update(&pool.conn, &self.defaults, patch)?;

        if self.scheduler.is_enabled() {
            let cadence = Cadence::from_settings(&next);
            if self.scheduler.cadence().as_ref() != Some(&cadence) {
                self.scheduler.set_reminder(cadence)?;
                info!(interval = next.reminder_interval, "reminder rescheduled");
            }
        }

        Ok(next)
    }

    // ---------------------------
    // Statistics
    // ---------------------------

    pub fn stats(&self) -> AppResult<StatsSummary> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).comprehensive()
    }

    pub fn weekly_chart(&self) -> AppResult<Vec<ChartPoint>> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).weekly_series()
    }

    pub fn monthly_chart(&self) -> AppResult<Vec<ChartPoint>> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).monthly_series()
    }

    pub fn history(&self, limit: u32) -> AppResult<Vec<ExerciseSession>> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).history(limit)
    }

    pub fn performance(&self) -> AppResult<PerformanceMetrics> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).performance_metrics()
    }

    pub fn reminder_summary(&self) -> AppResult<ReminderSummary> {
        let pool = self.pool()?;
        StatsService::new(&pool.conn, self.clock.as_ref()).reminder_summary()
    }

    // ---------------------------
    // Exercise sessions
    // ---------------------------

    pub fn start_exercise(&self) -> AppResult<StartedSession> {
        let mut pool = self.pool()?;
        SessionLogic::start(&mut pool, self.clock.as_ref())
    }

    pub fn complete_exercise(&self) -> AppResult<CompletedSession> {
        let mut pool = self.pool()?;
        SessionLogic::complete(&mut pool, self.clock.as_ref())
    }

    // ---------------------------
    // Reminder
    // ---------------------------

    pub fn reminder_status(&self) -> AppResult<ReminderStatus> {
        let settings = self.get_settings()?;
        Ok(ReminderStatus {
            enabled: self.scheduler.is_enabled(),
            next_reminder: self.scheduler.next_fire_time(),
            interval: settings.reminder_interval,
        })
    }

    /// Flip the reminder on or off, using the stored cadence when turning it on.
    pub fn toggle_reminder(&self) -> AppResult<ReminderStatus> {
        let pool = self.pool()?;
        let settings = SettingsLogic::get_or_create(&pool.conn, &self.defaults)?;

        if self.scheduler.is_enabled() {
            self.scheduler.cancel_reminder();
            audit(&pool.conn, "reminder_off", "reminder", "Reminder disabled");
        } else {
            self.scheduler.set_reminder(Cadence::from_settings(&settings))?;
            audit(
                &pool.conn,
                "reminder_on",
                "reminder",
                &format!("Reminder enabled every {} minutes", settings.reminder_interval),
            );
        }

        Ok(ReminderStatus {
            enabled: self.scheduler.is_enabled(),
            next_reminder: self.scheduler.next_fire_time(),
            interval: settings.reminder_interval,
        })
    }

    /// Wrap a result in the response envelope. Caller-facing failures keep
    /// their message; internal ones are logged first.
    pub fn respond<T>(result: AppResult<T>) -> ApiResponse<T> {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => {
                if e.kind() == ErrorKind::Internal {
                    error!(error = %e, "request failed");
                }
                ApiResponse::failure(e.to_string())
            }
        }
    }
}
