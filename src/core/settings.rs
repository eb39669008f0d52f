use crate::db::log::audit;
use crate::db::settings::{load_settings, save_settings};
use crate::errors::AppResult;
use crate::models::settings::{Settings, SettingsPatch};
use rusqlite::Connection;
use tracing::{debug, info};

/// High-level business logic for the settings singleton.
pub struct SettingsLogic;

impl SettingsLogic {
    /// Read the settings, creating the row from `defaults` on first access.
    pub fn get_or_create(conn: &Connection, defaults: &Settings) -> AppResult<Settings> {
        if let Some(existing) = load_settings(conn)? {
            return Ok(existing);
        }

        defaults.validate()?;
        save_settings(conn, defaults)?;
        debug!("created default settings row");
        Ok(defaults.clone())
    }

    /// Apply a partial update. Nothing is written when validation fails.
    pub fn update(
        conn: &Connection,
        defaults: &Settings,
        patch: &SettingsPatch,
    ) -> AppResult<Settings> {
        let current = Self::get_or_create(conn, defaults)?;
        let next = current.merged(patch)?;

        save_settings(conn, &next)?;

        info!(
            interval = next.reminder_interval,
            duration = next.exercise_duration,
            repetitions = next.repetitions,
            "settings updated"
        );
        audit(
            conn,
            "settings_update",
            "settings",
            &format!(
                "interval={}m duration={}s reps={} working_hours={}-{} ({})",
                next.reminder_interval,
                next.exercise_duration,
                next.repetitions,
                next.working_hours.start.format("%H:%M"),
                next.working_hours.end.format("%H:%M"),
                if next.working_hours.enabled { "on" } else { "off" }
            ),
        );

        Ok(next)
    }
}
