//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Human readable seconds: `7.0` → "7.0s", `95.5` → "1m 35.5s".
pub fn secs2readable(secs: f64) -> String {
    let total = secs.max(0.0);
    let minutes = (total / 60.0).floor() as u64;
    let rest = total - (minutes as f64) * 60.0;

    if minutes == 0 {
        format!("{:.1}s", rest)
    } else {
        format!("{}m {:.1}s", minutes, rest)
    }
}

/// Percentage with two decimals, e.g. `66.67%`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}
