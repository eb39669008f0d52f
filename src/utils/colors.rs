/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Zero counts render grey, anything else green.
pub fn color_for_count(value: u32) -> &'static str {
    if value > 0 { GREEN } else { GREY }
}

/// Grey placeholder for a missing value.
///
/// `colorize_optional("")` → "<grey>--<reset>"
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}--{RESET}")
    } else {
        value.to_string()
    }
}

pub fn colorize_flag(enabled: bool) -> String {
    if enabled {
        format!("{GREEN}on{RESET}")
    } else {
        format!("{RED}off{RESET}")
    }
}
