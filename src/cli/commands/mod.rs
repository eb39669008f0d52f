pub mod complete;
pub mod config;
pub mod db;
pub mod export;
pub mod history;
pub mod init;
pub mod log;
pub mod run;
pub mod settings;
pub mod start;
pub mod stats;
