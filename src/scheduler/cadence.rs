use crate::errors::{AppError, AppResult};
use crate::models::settings::{Settings, WorkingHours};
use chrono::NaiveTime;
use std::time::Duration;

/// How often a reminder fires and when it is allowed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cadence {
    pub period: Duration,
    /// When set, ticks outside the window are skipped (the timer keeps running).
    pub working_hours: Option<WorkingHours>,
    /// When false the desktop notifier is skipped and only fallbacks run.
    pub desktop_notifications: bool,
}

impl Cadence {
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            working_hours: None,
            desktop_notifications: true,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::every(Duration::from_secs(minutes as u64 * 60))
    }

    /// Cadence described by the stored settings.
    pub fn from_settings(s: &Settings) -> Self {
        let mut cadence = Self::from_minutes(s.reminder_interval);
        if s.working_hours.enabled {
            cadence.working_hours = Some(s.working_hours);
        }
        cadence.desktop_notifications = s.enable_notifications;
        cadence
    }

    pub fn with_working_hours(mut self, window: WorkingHours) -> Self {
        self.working_hours = Some(window);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.period.is_zero() {
            return Err(AppError::Validation(
                "Reminder interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether a tick evaluated at `at` may fire the side effects.
    pub fn allows(&self, at: NaiveTime) -> bool {
        match &self.working_hours {
            Some(window) => window.contains(at),
            None => true,
        }
    }
}

/// Result of evaluating one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Fired,
    OutsideWorkingHours,
}
