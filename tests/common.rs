#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate};
use kegel_helper::api::App;
use kegel_helper::models::settings::Settings;
use kegel_helper::scheduler::{NotifierChain, ReminderScheduler};
use kegel_helper::utils::clock::{Clock, local_datetime};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub fn kh() -> Command {
    cargo_bin_cmd!("kegel-helper")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_kegel_helper.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB (schema + default settings) through the CLI
pub fn init_db(db_path: &str) {
    kh().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run one start/complete cycle through the CLI
pub fn exercise_once(db_path: &str) {
    kh().args(["--db", db_path, "start"]).assert().success();
    kh().args(["--db", db_path, "complete"]).assert().success();
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(date: NaiveDate, h: u32, m: u32, s: u32) -> DateTime<Local> {
    local_datetime(date.and_hms_opt(h, m, s).expect("valid time"))
}

/// An App on `db_path` with a silent scheduler and the given clock.
pub fn test_app(db_path: &str, clock: Arc<dyn Clock>) -> App {
    let scheduler = ReminderScheduler::new(NotifierChain::new(), clock.clone(), None);
    App::new(db_path, Settings::default(), clock, scheduler)
}
