pub mod daily;
pub mod db_utils;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod reminders;
pub mod sessions;
pub mod settings;
pub mod stats;
