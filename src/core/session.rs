use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::{daily, reminders, sessions, settings};
use crate::errors::{AppError, AppResult};
use crate::models::session::{CompletedSession, StartedSession, elapsed_secs};
use crate::utils::clock::Clock;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// High-level business logic for the exercise session lifecycle.
pub struct SessionLogic;

impl SessionLogic {
    /// Open a new in-progress session with the planned duration and
    /// repetitions copied from the stored settings.
    pub fn start(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<StartedSession> {
        let cfg = settings::require_settings(&pool.conn)?;
        let now = clock.now();

        let id = sessions::insert_session(&pool.conn, &now, cfg.exercise_duration, cfg.repetitions)?;

        if let Err(e) = Self::acknowledge_reminder(&pool.conn, clock, cfg.reminder_interval) {
            warn!(error = %e, "could not mark reminder as responded");
        }

        info!(exercise_id = id, planned = cfg.exercise_duration, "exercise started");
        audit(
            &pool.conn,
            "session_start",
            &format!("#{}", id),
            &format!(
                "Started exercise: {}s x {} reps",
                cfg.exercise_duration, cfg.repetitions
            ),
        );

        Ok(StartedSession {
            exercise_id: id,
            start_time: now,
            planned_duration: cfg.exercise_duration,
            repetitions: cfg.repetitions,
        })
    }

    /// Complete the current session and fold it into today's aggregate.
    /// Both writes commit together or not at all.
    pub fn complete(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<CompletedSession> {
        let tx = pool.conn.transaction()?;

        let current = sessions::latest_in_progress(&tx)?
            .ok_or_else(|| AppError::NotFound("No exercise session in progress".into()))?;

        let end = clock.now();
        let duration = elapsed_secs(current.start_time, end).max(0.0);
        let today = end.date_naive();

        if !sessions::mark_completed(&tx, current.id, &end, duration)? {
            return Err(AppError::NotFound(format!(
                "Exercise session #{} is no longer in progress",
                current.id
            )));
        }
        daily::add_completed(&tx, today, duration)?;

        let today_count = daily::load_day(&tx, today)?
            .map(|d| d.exercise_count)
            .unwrap_or(0);

        tx.commit()?;

        info!(exercise_id = current.id, duration, today_count, "exercise completed");
        audit(
            &pool.conn,
            "session_complete",
            &format!("#{}", current.id),
            &format!("Completed exercise in {:.1}s", duration),
        );

        Ok(CompletedSession {
            exercise_id: current.id,
            duration,
            today_count,
        })
    }

    /// Mark the latest unanswered reminder from the current cadence window
    /// as responded.
    fn acknowledge_reminder(conn: &Connection, clock: &dyn Clock, interval_minutes: u32) -> AppResult<()> {
        let now = clock.now();
        let since = now - chrono::Duration::minutes(interval_minutes as i64);

        if let Some(ev) = reminders::latest_unanswered_since(conn, &since)? {
            reminders::mark_responded(conn, ev.id, &now)?;
            debug!(reminder_id = ev.id, "reminder marked as responded");
        }
        Ok(())
    }
}
