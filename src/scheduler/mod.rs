//! Reminder scheduler.
//!
//! [`ReminderScheduler`] owns a small tokio runtime and at most one recurring
//! reminder job. Each tick checks the optional working-hours window and, when
//! inside it, runs the registered callbacks, the notifier chain and the
//! reminder recorder. Failures in any of those are logged and never stop the
//! job.
//!
//! Ticks and job changes are serialized by a dispatch lock. A tick holds it
//! while dispatching and first re-checks that its job is still the installed
//! one, so once [`set_reminder`](ReminderScheduler::set_reminder) or
//! [`cancel_reminder`](ReminderScheduler::cancel_reminder) returns, the old
//! cadence cannot fire again. The job slot itself is only locked for short
//! reads and writes, never across callbacks or I/O, so status queries do not
//! wait for a tick. Callbacks may query the scheduler but must not change its
//! job.

pub mod cadence;
pub mod notifier;
pub mod recorder;

pub use cadence::{Cadence, TickOutcome};
pub use notifier::{ConsoleNotifier, DesktopNotifier, Notification, Notifier, NotifierChain};
pub use recorder::{ReminderRecorder, SqliteReminderRecorder};

use crate::errors::{AppError, AppResult};
use crate::utils::clock::{Clock, SystemClock};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What a callback learns about the reminder being fired.
#[derive(Debug, Clone)]
pub struct ReminderContext {
    pub fired_at: DateTime<Local>,
    pub cadence: Cadence,
}

pub type NotificationCallback = Arc<dyn Fn(&ReminderContext) -> Result<(), String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub running: bool,
    pub job_count: usize,
    pub reminder_enabled: bool,
    pub next_reminder: Option<DateTime<Local>>,
}

struct ActiveJob {
    id: u64,
    cadence: Cadence,
    next_fire: DateTime<Local>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActiveJob {
    fn shutdown(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

struct Shared {
    // lock order: dispatch, then job
    dispatch: Mutex<()>,
    job: Mutex<Option<ActiveJob>>,
    callbacks: Mutex<Vec<(CallbackId, NotificationCallback)>>,
    notifiers: NotifierChain,
    recorder: Option<Arc<dyn ReminderRecorder>>,
    clock: Arc<dyn Clock>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // poisoning is ignored
    m.lock().unwrap_or_else(|p| p.into_inner())
}

fn next_after(now: DateTime<Local>, period: Duration) -> DateTime<Local> {
    chrono::Duration::from_std(period)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(now)
}

impl Shared {
    /// Background tick for job `id`. Returns false when the job has been
    /// replaced or cancelled and the loop should end.
    fn tick_job(&self, id: u64) -> bool {
        let _dispatching = lock(&self.dispatch);

        let cadence = {
            let mut slot = lock(&self.job);
            let Some(job) = slot
                .as_mut()
                .filter(|j| j.id == id && !j.cancel.is_cancelled())
            else {
                return false;
            };
            job.next_fire = next_after(self.clock.now(), job.cadence.period);
            job.cadence.clone()
        };

        // a replacement waits on the dispatch lock until this returns
        self.dispatch(&cadence);
        true
    }

    fn dispatch(&self, cadence: &Cadence) -> TickOutcome {
        let now = self.clock.now();

        if !cadence.allows(now.time()) {
            debug!(
                at = %now.format("%H:%M"),
                "outside working hours, skipping reminder"
            );
            return TickOutcome::OutsideWorkingHours;
        }

        self.fire(now, cadence);
        TickOutcome::Fired
    }

    fn fire(&self, now: DateTime<Local>, cadence: &Cadence) {
        info!("sending exercise reminder");

        let ctx = ReminderContext {
            fired_at: now,
            cadence: cadence.clone(),
        };

        // snapshot so callbacks can be (un)registered concurrently
        let callbacks: Vec<(CallbackId, NotificationCallback)> = lock(&self.callbacks)
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();

        for (id, cb) in callbacks {
            match panic::catch_unwind(AssertUnwindSafe(|| cb(&ctx))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(callback = id.0, error = %e, "notification callback failed"),
                Err(_) => error!(callback = id.0, "notification callback panicked"),
            }
        }

        if self
            .notifiers
            .notify(&Notification::reminder(), cadence.desktop_notifications)
            .is_none()
            && !self.notifiers.is_empty()
        {
            warn!("no notifier could show the reminder");
        }

        if let Some(recorder) = &self.recorder
            && let Err(e) = recorder.record(now)
        {
            error!(error = %e, "failed to record reminder event");
        }

        info!(at = %now.to_rfc3339(), "reminder sent");
    }
}

async fn run_job(shared: Arc<Shared>, id: u64, period: Duration, cancel: CancellationToken) {
    let first = tokio::time::Instant::now() + period;
    let mut ticker = tokio::time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let shared = Arc::clone(&shared);
                let keep_going = tokio::task::block_in_place(move || shared.tick_job(id));
                if !keep_going {
                    break;
                }
            }
        }
    }

    debug!(job = id, "reminder job finished");
}

/// Explicitly owned reminder scheduler: Stopped until [`start`](Self::start),
/// holding zero or one reminder job.
pub struct ReminderScheduler {
    shared: Arc<Shared>,
    runtime: Mutex<Option<Runtime>>,
    next_job_id: AtomicU64,
    next_callback_id: AtomicU64,
}

impl ReminderScheduler {
    pub fn new(
        notifiers: NotifierChain,
        clock: Arc<dyn Clock>,
        recorder: Option<Arc<dyn ReminderRecorder>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                dispatch: Mutex::new(()),
                job: Mutex::new(None),
                callbacks: Mutex::new(Vec::new()),
                notifiers,
                recorder,
                clock,
            }),
            runtime: Mutex::new(None),
            next_job_id: AtomicU64::new(1),
            next_callback_id: AtomicU64::new(1),
        }
    }

    /// Production wiring: platform notifiers, system clock, and reminders
    /// persisted to the database at `db_path`.
    pub fn for_database(db_path: &str) -> Self {
        Self::new(
            NotifierChain::platform_default(),
            Arc::new(SystemClock),
            Some(Arc::new(SqliteReminderRecorder::new(db_path))),
        )
    }

    /// Stopped → Running. No-op when already running.
    pub fn start(&self) -> AppResult<()> {
        let mut rt = lock(&self.runtime);
        if rt.is_some() {
            return Ok(());
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("kegel-reminder")
            .enable_all()
            .build()
            .map_err(|e| AppError::Scheduler(e.to_string()))?;

        *rt = Some(runtime);
        info!("reminder scheduler started");
        Ok(())
    }

    /// Cancel any reminder job and go back to Stopped. No-op when stopped.
    pub fn stop(&self) {
        self.cancel_reminder();

        if let Some(runtime) = lock(&self.runtime).take() {
            runtime.shutdown_background();
            info!("reminder scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.runtime).is_some()
    }

    /// Install `cadence`, replacing any existing reminder job. Starts the
    /// scheduler if needed.
    pub fn set_reminder(&self, cadence: Cadence) -> AppResult<()> {
        cadence.validate()?;
        self.start()?;

        let handle = lock(&self.runtime)
            .as_ref()
            .map(|rt| rt.handle().clone())
            .ok_or_else(|| AppError::Scheduler("scheduler runtime is not available".into()))?;

        let id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        let _dispatching = lock(&self.shared.dispatch);
        let mut slot = lock(&self.shared.job);
        if let Some(old) = slot.take() {
            debug!(job = old.id, "replacing reminder job");
            old.shutdown();
        }

        let task = handle.spawn(run_job(
            Arc::clone(&self.shared),
            id,
            cadence.period,
            cancel.clone(),
        ));

        info!(
            job = id,
            period_secs = cadence.period.as_secs(),
            working_hours_only = cadence.working_hours.is_some(),
            "reminder job installed"
        );

        *slot = Some(ActiveJob {
            id,
            next_fire: next_after(self.shared.clock.now(), cadence.period),
            cadence,
            cancel,
            handle: task,
        });

        Ok(())
    }

    /// Remove the reminder job. Returns whether one was installed.
    pub fn cancel_reminder(&self) -> bool {
        let _dispatching = lock(&self.shared.dispatch);
        let removed = lock(&self.shared.job).take();
        match removed {
            Some(job) => {
                let id = job.id;
                job.shutdown();
                info!(job = id, "reminder job removed");
                true
            }
            None => false,
        }
    }

    /// True iff a reminder job is installed.
    pub fn is_enabled(&self) -> bool {
        lock(&self.shared.job).is_some()
    }

    pub fn next_fire_time(&self) -> Option<DateTime<Local>> {
        lock(&self.shared.job).as_ref().map(|j| j.next_fire)
    }

    pub fn cadence(&self) -> Option<Cadence> {
        lock(&self.shared.job).as_ref().map(|j| j.cadence.clone())
    }

    /// Evaluate one tick of the installed job right now, against the clock.
    /// `None` when no reminder is installed.
    pub fn run_tick(&self) -> Option<TickOutcome> {
        let _dispatching = lock(&self.shared.dispatch);
        let cadence = self.cadence()?;
        Some(self.shared.dispatch(&cadence))
    }

    pub fn add_notification_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&ReminderContext) -> Result<(), String> + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_callback_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.shared.callbacks).push((id, Arc::new(callback)));
        id
    }

    pub fn remove_notification_callback(&self, id: CallbackId) -> bool {
        let mut callbacks = lock(&self.shared.callbacks);
        let before = callbacks.len();
        callbacks.retain(|(cb_id, _)| *cb_id != id);
        callbacks.len() != before
    }

    pub fn status(&self) -> SchedulerStatus {
        let next_reminder = lock(&self.shared.job).as_ref().map(|j| j.next_fire);
        let job_count = usize::from(next_reminder.is_some());
        SchedulerStatus {
            running: self.is_running(),
            job_count,
            reminder_enabled: job_count > 0,
            next_reminder,
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
