pub mod log;
pub mod session;
pub mod settings;
pub mod stats;
