mod common;
use chrono::{DateTime, Local};
use common::{at, day, setup_test_db};
use kegel_helper::db::initialize::init_db;
use kegel_helper::db::pool::DbPool;
use kegel_helper::db::reminders::load_between;
use kegel_helper::errors::AppResult;
use kegel_helper::models::settings::WorkingHours;
use kegel_helper::scheduler::{
    Cadence, ConsoleNotifier, NotifierChain, ReminderRecorder, ReminderScheduler,
    SqliteReminderRecorder, TickOutcome,
};
use kegel_helper::utils::clock::{Clock, FixedClock, SystemClock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;

fn clock_at(h: u32, m: u32) -> Arc<dyn Clock> {
    Arc::new(FixedClock(at(day(2025, 5, 14), h, m, 0)))
}

fn silent(clock: Arc<dyn Clock>) -> ReminderScheduler {
    ReminderScheduler::new(NotifierChain::new(), clock, None)
}

fn counter(s: &ReminderScheduler) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    s.add_notification_callback(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    hits
}

#[derive(Default)]
struct MemoryRecorder {
    fired: Mutex<Vec<DateTime<Local>>>,
}

impl ReminderRecorder for MemoryRecorder {
    fn record(&self, fired_at: DateTime<Local>) -> AppResult<()> {
        self.fired.lock().unwrap().push(fired_at);
        Ok(())
    }
}

struct SlowRecorder(Duration);

impl ReminderRecorder for SlowRecorder {
    fn record(&self, _fired_at: DateTime<Local>) -> AppResult<()> {
        sleep(self.0);
        Ok(())
    }
}

#[test]
fn test_every_valid_interval_enables_reminder() {
    let s = silent(Arc::new(SystemClock));
    assert!(!s.is_enabled());
    assert_eq!(s.next_fire_time(), None);

    for minutes in 5..=120 {
        s.set_reminder(Cadence::from_minutes(minutes)).unwrap();
        assert!(s.is_enabled(), "interval {minutes}");
        let next = s.next_fire_time().expect("next fire time");
        assert!(next > Local::now());
    }
    assert_eq!(s.status().job_count, 1);
}

#[test]
fn test_zero_period_is_rejected() {
    let s = silent(Arc::new(SystemClock));
    assert!(s.set_reminder(Cadence::every(Duration::ZERO)).is_err());
    assert!(!s.is_enabled());
}

#[test]
fn test_working_hours_gate() {
    let window = WorkingHours::default();

    let evening = silent(clock_at(20, 0));
    let hits = counter(&evening);
    evening
        .set_reminder(Cadence::from_minutes(30).with_working_hours(window))
        .unwrap();
    assert_eq!(evening.run_tick(), Some(TickOutcome::OutsideWorkingHours));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    // the timer survives a skipped tick
    assert!(evening.is_enabled());

    let morning = silent(clock_at(10, 0));
    let hits = counter(&morning);
    morning
        .set_reminder(Cadence::from_minutes(30).with_working_hours(window))
        .unwrap();
    assert_eq!(morning.run_tick(), Some(TickOutcome::Fired));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_ungated_cadence_fires_at_night() {
    let s = silent(clock_at(23, 30));
    let hits = counter(&s);
    s.set_reminder(Cadence::from_minutes(30)).unwrap();
    assert_eq!(s.run_tick(), Some(TickOutcome::Fired));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_callbacks_do_not_stop_others() {
    let s = silent(clock_at(10, 0));
    s.add_notification_callback(|_| Err("callback failed".into()));
    s.add_notification_callback(|_| panic!("callback exploded"));
    let hits = counter(&s);

    s.set_reminder(Cadence::from_minutes(10)).unwrap();
    assert_eq!(s.run_tick(), Some(TickOutcome::Fired));
    assert_eq!(s.run_tick(), Some(TickOutcome::Fired));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(s.is_enabled());
}

#[test]
fn test_fired_reminders_are_recorded() {
    let recorder = Arc::new(MemoryRecorder::default());
    let s = ReminderScheduler::new(
        NotifierChain::new().with(Box::new(ConsoleNotifier)),
        clock_at(11, 0),
        Some(recorder.clone()),
    );

    s.set_reminder(Cadence::from_minutes(30).with_working_hours(WorkingHours::default()))
        .unwrap();
    s.run_tick();
    s.run_tick();
    assert_eq!(recorder.fired.lock().unwrap().len(), 2);
}

#[test]
fn test_skipped_ticks_are_not_recorded() {
    let recorder = Arc::new(MemoryRecorder::default());
    let s = ReminderScheduler::new(NotifierChain::new(), clock_at(7, 0), Some(recorder.clone()));

    s.set_reminder(Cadence::from_minutes(30).with_working_hours(WorkingHours::default()))
        .unwrap();
    assert_eq!(s.run_tick(), Some(TickOutcome::OutsideWorkingHours));
    assert!(recorder.fired.lock().unwrap().is_empty());
}

#[test]
fn test_sqlite_recorder_persists_events() {
    let db_path = setup_test_db("sqlite_recorder");
    let recorder = SqliteReminderRecorder::new(&db_path);
    let fired = at(day(2025, 5, 14), 10, 30, 0);

    recorder.record(fired).unwrap();

    let pool = DbPool::new(&db_path).unwrap();
    init_db(&pool.conn).unwrap();
    let events = load_between(
        &pool.conn,
        &at(day(2025, 5, 14), 0, 0, 0),
        &at(day(2025, 5, 15), 0, 0, 0),
    )
    .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reminder_time, fired);
    assert!(!events[0].responded);
}

#[test]
fn test_background_ticks_fire_callbacks() {
    let s = silent(Arc::new(SystemClock));
    let hits = counter(&s);

    s.set_reminder(Cadence::every(Duration::from_millis(30)))
        .unwrap();
    sleep(Duration::from_millis(250));

    assert!(hits.load(Ordering::SeqCst) >= 2);
}

#[test]
fn test_replacing_cadence_supersedes_old_one() {
    let s = silent(Arc::new(SystemClock));
    let seen: Arc<Mutex<Vec<Duration>>> = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    s.add_notification_callback(move |ctx| {
        log.lock().unwrap().push(ctx.cadence.period);
        Ok(())
    });

    let old = Duration::from_millis(25);
    let new = Duration::from_millis(40);

    s.set_reminder(Cadence::every(old)).unwrap();
    sleep(Duration::from_millis(150));
    s.set_reminder(Cadence::every(new)).unwrap();
    let boundary = seen.lock().unwrap().len();
    sleep(Duration::from_millis(250));

    let events = seen.lock().unwrap().clone();
    assert!(boundary > 0, "old cadence never fired");
    assert!(events.len() > boundary, "new cadence never fired");
    assert!(events[boundary..].iter().all(|p| *p == new));
    assert_eq!(s.cadence().map(|c| c.period), Some(new));
}

#[test]
fn test_cancel_stops_ticks() {
    let s = silent(Arc::new(SystemClock));
    let hits = counter(&s);

    s.set_reminder(Cadence::every(Duration::from_millis(20)))
        .unwrap();
    sleep(Duration::from_millis(120));

    assert!(s.cancel_reminder());
    assert!(!s.cancel_reminder());
    assert!(!s.is_enabled());
    assert_eq!(s.next_fire_time(), None);
    assert_eq!(s.run_tick(), None);

    let after_cancel = hits.load(Ordering::SeqCst);
    sleep(Duration::from_millis(120));
    assert_eq!(hits.load(Ordering::SeqCst), after_cancel);
}

#[test]
fn test_stop_removes_job_and_is_idempotent() {
    let s = silent(Arc::new(SystemClock));
    s.set_reminder(Cadence::from_minutes(30)).unwrap();
    assert!(s.is_running());

    s.stop();
    s.stop();
    assert!(!s.is_running());
    assert!(!s.is_enabled());

    let status = s.status();
    assert!(!status.running);
    assert!(!status.reminder_enabled);
    assert_eq!(status.next_reminder, None);

    // a stopped scheduler can be started again
    s.set_reminder(Cadence::from_minutes(5)).unwrap();
    assert!(s.is_running() && s.is_enabled());
}

#[test]
fn test_status_serializes_camel_case() {
    let s = silent(Arc::new(SystemClock));
    s.set_reminder(Cadence::from_minutes(15)).unwrap();

    let json = serde_json::to_value(s.status()).unwrap();
    assert_eq!(json["running"], true);
    assert_eq!(json["jobCount"], 1);
    assert_eq!(json["reminderEnabled"], true);
    assert!(json["nextReminder"].is_string());
}

#[test]
fn test_status_queries_do_not_wait_for_a_tick() {
    let recorder: Arc<dyn ReminderRecorder> = Arc::new(SlowRecorder(Duration::from_millis(800)));
    let s = ReminderScheduler::new(NotifierChain::new(), Arc::new(SystemClock), Some(recorder));

    s.set_reminder(Cadence::every(Duration::from_millis(50)))
        .unwrap();
    // first tick is now inside the recorder
    sleep(Duration::from_millis(150));

    let started = std::time::Instant::now();
    assert!(s.is_enabled());
    assert!(s.next_fire_time().is_some());
    assert!(s.cadence().is_some());
    assert!(s.status().reminder_enabled);
    assert!(started.elapsed() < Duration::from_millis(100));
}
