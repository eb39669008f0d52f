mod common;
use common::{at, day, setup_test_db, test_app};
use kegel_helper::db::daily::{add_completed, load_day};
use kegel_helper::db::pool::DbPool;
use kegel_helper::db::reminders::insert_reminder;
use kegel_helper::db::sessions::{latest_in_progress, load_session};
use kegel_helper::errors::{AppError, ErrorKind};
use kegel_helper::models::settings::{SettingsPatch, WorkingHoursPatch};
use kegel_helper::utils::clock::{FixedClock, ManualClock};
use std::sync::Arc;
use std::time::Duration;

// 2025-05-14 is a Wednesday
fn wednesday() -> chrono::NaiveDate {
    day(2025, 5, 14)
}

fn open(db_path: &str) -> DbPool {
    DbPool::new(db_path).expect("open db")
}

#[test]
fn test_start_requires_settings() {
    let db_path = setup_test_db("start_requires_settings");
    let clock = Arc::new(FixedClock(at(wednesday(), 10, 0, 0)));
    let app = test_app(&db_path, clock);

    let err = app.start_exercise().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "User settings do not exist");

    app.get_settings().unwrap();
    let started = app.start_exercise().unwrap();
    assert_eq!(started.planned_duration, 5);
    assert_eq!(started.repetitions, 10);
}

#[test]
fn test_complete_measures_actual_duration() {
    let db_path = setup_test_db("complete_measures_duration");
    let t0 = at(wednesday(), 10, 0, 0);
    let clock = Arc::new(ManualClock::new(t0));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();

    let started = app.start_exercise().unwrap();
    assert_eq!(started.start_time, t0);

    clock.advance(Duration::from_secs(7));
    let done = app.complete_exercise().unwrap();
    assert_eq!(done.exercise_id, started.exercise_id);
    assert_eq!(done.duration, 7.0);
    assert_eq!(done.today_count, 1);

    let pool = open(&db_path);
    let session = load_session(&pool.conn, started.exercise_id)
        .unwrap()
        .expect("session row");
    assert!(session.completed);
    assert!(!session.is_in_progress());
    assert_eq!(session.duration, Some(7.0));
    assert_eq!(session.end_time, Some(clock_now(&clock)));

    let agg = load_day(&pool.conn, wednesday()).unwrap().expect("aggregate");
    assert_eq!(agg.exercise_count, 1);
    assert_eq!(agg.total_duration, 7.0);
}

fn clock_now(clock: &ManualClock) -> chrono::DateTime<chrono::Local> {
    use kegel_helper::utils::clock::Clock;
    clock.now()
}

#[test]
fn test_two_sessions_same_day_count_two() {
    let db_path = setup_test_db("two_sessions_same_day");
    let clock = Arc::new(ManualClock::new(at(wednesday(), 9, 0, 0)));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();

    for secs in [4, 6] {
        app.start_exercise().unwrap();
        clock.advance(Duration::from_secs(secs));
        app.complete_exercise().unwrap();
        clock.advance(Duration::from_secs(60));
    }

    let pool = open(&db_path);
    let agg = load_day(&pool.conn, wednesday()).unwrap().expect("aggregate");
    assert_eq!(agg.exercise_count, 2);
    assert_eq!(agg.total_duration, 10.0);
    assert_eq!(app.stats().unwrap().today_count, 2);
}

#[test]
fn test_complete_without_session_is_not_found() {
    let db_path = setup_test_db("complete_without_session");
    let clock = Arc::new(FixedClock(at(wednesday(), 10, 0, 0)));
    let app = test_app(&db_path, clock);
    app.get_settings().unwrap();

    let err = app.complete_exercise().unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // a second completion of the same session finds nothing either
    app.start_exercise().unwrap();
    app.complete_exercise().unwrap();
    assert_eq!(app.complete_exercise().unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_current_session_is_most_recent() {
    let db_path = setup_test_db("current_is_most_recent");
    let clock = Arc::new(ManualClock::new(at(wednesday(), 10, 0, 0)));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();

    let first = app.start_exercise().unwrap();
    clock.advance(Duration::from_secs(30));
    let second = app.start_exercise().unwrap();

    let pool = open(&db_path);
    let current = latest_in_progress(&pool.conn).unwrap().expect("in progress");
    assert_eq!(current.id, second.exercise_id);

    clock.advance(Duration::from_secs(5));
    app.complete_exercise().unwrap();
    let current = latest_in_progress(&pool.conn).unwrap().expect("in progress");
    assert_eq!(current.id, first.exercise_id);
}

#[test]
fn test_streak_counts_back_from_today() {
    let db_path = setup_test_db("streak_counts_back");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 12, 0, 0))));
    app.get_settings().unwrap();

    assert_eq!(app.stats().unwrap().streak_days, 0);

    let pool = open(&db_path);
    for d in [day(2025, 5, 14), day(2025, 5, 13), day(2025, 5, 12), day(2025, 5, 10)] {
        add_completed(&pool.conn, d, 5.0).unwrap();
    }

    assert_eq!(app.stats().unwrap().streak_days, 3);
}

#[test]
fn test_streak_is_zero_without_today() {
    let db_path = setup_test_db("streak_zero_without_today");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 12, 0, 0))));
    app.get_settings().unwrap();

    let pool = open(&db_path);
    add_completed(&pool.conn, day(2025, 5, 13), 5.0).unwrap();
    add_completed(&pool.conn, day(2025, 5, 12), 5.0).unwrap();

    assert_eq!(app.stats().unwrap().streak_days, 0);
}

#[test]
fn test_week_month_total_buckets() {
    let db_path = setup_test_db("week_month_total");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 12, 0, 0))));
    app.get_settings().unwrap();

    let pool = open(&db_path);
    add_completed(&pool.conn, day(2025, 4, 30), 5.0).unwrap(); // last month
    add_completed(&pool.conn, day(2025, 5, 11), 5.0).unwrap(); // Sunday, previous week
    add_completed(&pool.conn, day(2025, 5, 12), 5.0).unwrap(); // Monday
    add_completed(&pool.conn, day(2025, 5, 14), 5.0).unwrap();
    add_completed(&pool.conn, day(2025, 5, 14), 6.0).unwrap();

    let s = app.stats().unwrap();
    assert_eq!(s.today_count, 2);
    assert_eq!(s.week_count, 3);
    assert_eq!(s.month_count, 4);
    assert_eq!(s.total_count, 5);
    assert_eq!(s.last_exercise_time, None);
}

#[test]
fn test_weekly_series_is_seven_zero_filled_days() {
    let db_path = setup_test_db("weekly_series");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 12, 0, 0))));
    app.get_settings().unwrap();

    let pool = open(&db_path);
    add_completed(&pool.conn, day(2025, 5, 12), 8.0).unwrap();

    let series = app.weekly_chart().unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].date, day(2025, 5, 8));
    assert_eq!(series[6].date, wednesday());
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));

    assert_eq!(series[4].date, day(2025, 5, 12));
    assert_eq!(series[4].count, 1);
    assert_eq!(series[4].duration, 8.0);
    assert_eq!(series[4].day_name, "Mon");

    let zero_days = series.iter().filter(|p| p.count == 0).count();
    assert_eq!(zero_days, 6);
}

#[test]
fn test_monthly_series_spans_month_to_date() {
    let db_path = setup_test_db("monthly_series");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 12, 0, 0))));
    app.get_settings().unwrap();

    let series = app.monthly_chart().unwrap();
    assert_eq!(series.len(), 14);
    assert_eq!(series[0].day, 1);
    assert_eq!(series[13].day, 14);
}

#[test]
fn test_performance_metrics() {
    let db_path = setup_test_db("performance_metrics");
    let clock = Arc::new(ManualClock::new(at(wednesday(), 9, 0, 0)));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();

    let empty = app.performance().unwrap();
    assert_eq!(empty.completion_rate, 0.0);
    assert_eq!(empty.total_exercises, 0);

    for secs in [4, 6] {
        app.start_exercise().unwrap();
        clock.advance(Duration::from_secs(secs));
        app.complete_exercise().unwrap();
    }
    app.start_exercise().unwrap();

    let m = app.performance().unwrap();
    assert_eq!(m.total_exercises, 3);
    assert_eq!(m.completed_exercises, 2);
    assert_eq!(m.average_duration, 5.0);
    assert_eq!(m.completion_rate, 66.67);
    assert_eq!(m.average_daily_this_week, 0.29);
}

#[test]
fn test_history_is_newest_first_and_limited() {
    let db_path = setup_test_db("history_newest_first");
    let clock = Arc::new(ManualClock::new(at(wednesday(), 9, 0, 0)));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(app.start_exercise().unwrap().exercise_id);
        clock.advance(Duration::from_secs(5));
        app.complete_exercise().unwrap();
        clock.advance(Duration::from_secs(60));
    }
    // in-progress sessions are not history
    app.start_exercise().unwrap();

    let history = app.history(2).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, ids[2]);
    assert_eq!(history[1].id, ids[1]);

    assert_eq!(app.history(50).unwrap().len(), 3);
    assert!(app.stats().unwrap().last_exercise_time.is_some());
}

#[test]
fn test_start_acknowledges_recent_reminder() {
    let db_path = setup_test_db("start_acknowledges_reminder");
    let now = at(wednesday(), 10, 0, 0);
    let app = test_app(&db_path, Arc::new(FixedClock(now)));
    app.get_settings().unwrap();

    let pool = open(&db_path);
    insert_reminder(&pool.conn, &(now - chrono::Duration::minutes(90))).unwrap();
    insert_reminder(&pool.conn, &(now - chrono::Duration::minutes(5))).unwrap();

    app.start_exercise().unwrap();

    let summary = app.reminder_summary().unwrap();
    assert_eq!(summary.fired_today, 2);
    assert_eq!(summary.responded_today, 1);
    assert_eq!(summary.response_rate, 50.0);
}

#[test]
fn test_update_settings_is_partial_and_validated() {
    let db_path = setup_test_db("update_settings_partial");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 10, 0, 0))));

    let updated = app
        .update_settings(&SettingsPatch {
            repetitions: Some(20),
            working_hours: Some(WorkingHoursPatch {
                enabled: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.repetitions, 20);
    assert_eq!(updated.reminder_interval, 30);
    assert!(!updated.working_hours.enabled);

    let err = app
        .update_settings(&SettingsPatch {
            reminder_interval: Some(121),
            repetitions: Some(25),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // nothing from the rejected patch was written
    assert_eq!(app.get_settings().unwrap(), updated);
}

#[test]
fn test_toggle_and_reschedule_reminder() {
    let db_path = setup_test_db("toggle_and_reschedule");
    let app = test_app(&db_path, Arc::new(FixedClock(at(wednesday(), 10, 0, 0))));

    let on = app.toggle_reminder().unwrap();
    assert!(on.enabled);
    assert!(on.next_reminder.is_some());
    assert_eq!(on.interval, 30);
    assert_eq!(
        app.scheduler().cadence().map(|c| c.period),
        Some(Duration::from_secs(30 * 60))
    );

    app.update_settings(&SettingsPatch {
        reminder_interval: Some(15),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        app.scheduler().cadence().map(|c| c.period),
        Some(Duration::from_secs(15 * 60))
    );
    assert_eq!(app.reminder_status().unwrap().interval, 15);

    let off = app.toggle_reminder().unwrap();
    assert!(!off.enabled);
    assert_eq!(off.next_reminder, None);

    // with the reminder off, a settings change installs nothing
    app.update_settings(&SettingsPatch {
        reminder_interval: Some(20),
        ..Default::default()
    })
    .unwrap();
    assert!(!app.scheduler().is_enabled());
}

#[test]
fn test_complete_rolls_back_when_aggregate_write_fails() {
    let db_path = setup_test_db("complete_rolls_back");
    let clock = Arc::new(ManualClock::new(at(wednesday(), 10, 0, 0)));
    let app = test_app(&db_path, clock.clone());
    app.get_settings().unwrap();
    let started = app.start_exercise().unwrap();

    {
        let pool = open(&db_path);
        pool.conn
            .execute_batch(
                "CREATE TRIGGER fail_daily BEFORE INSERT ON daily_stats
                 BEGIN SELECT RAISE(ABORT, 'boom'); END;",
            )
            .unwrap();
    }

    clock.advance(Duration::from_secs(5));
    let err = app.complete_exercise().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    let pool = open(&db_path);
    let pending = latest_in_progress(&pool.conn).unwrap().expect("still in progress");
    assert_eq!(pending.id, started.exercise_id);
    assert!(load_day(&pool.conn, wednesday()).unwrap().is_none());

    pool.conn.execute_batch("DROP TRIGGER fail_daily;").unwrap();
    let done = app.complete_exercise().unwrap();
    assert_eq!(done.exercise_id, started.exercise_id);
    assert_eq!(done.today_count, 1);
}
