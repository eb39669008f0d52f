pub mod daily;
pub mod reminder;
pub mod session;
pub mod settings;
