//! User settings: the singleton configuration record and its partial update.

use crate::errors::{AppError, AppResult};
use crate::utils::time::{minutes_since_midnight, parse_hhmm};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const REMINDER_INTERVAL_RANGE: RangeInclusive<u32> = 5..=120;
pub const EXERCISE_DURATION_RANGE: RangeInclusive<u32> = 3..=30;
pub const REPETITIONS_RANGE: RangeInclusive<u32> = 5..=50;
pub const THEME_MAX_LEN: usize = 20;

pub const DEFAULT_REMINDER_INTERVAL: u32 = 30;
pub const DEFAULT_EXERCISE_DURATION: u32 = 5;
pub const DEFAULT_REPETITIONS: u32 = 10;

/// Daily time-of-day window, compared in minutes since midnight (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub enabled: bool,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            enabled: true,
        }
    }
}

impl WorkingHours {
    pub fn contains(&self, at: NaiveTime) -> bool {
        let now = minutes_since_midnight(at);
        minutes_since_midnight(self.start) <= now && now <= minutes_since_midnight(self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub reminder_interval: u32,
    pub exercise_duration: u32,
    pub repetitions: u32,
    pub enable_sound: bool,
    pub enable_notifications: bool,
    pub theme: String,
    pub working_hours: WorkingHours,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
            exercise_duration: DEFAULT_EXERCISE_DURATION,
            repetitions: DEFAULT_REPETITIONS,
            enable_sound: true,
            enable_notifications: true,
            theme: "light".to_string(),
            working_hours: WorkingHours::default(),
        }
    }
}

fn check_range(name: &str, value: u32, range: &RangeInclusive<u32>) -> AppResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be between {} and {} (got {})",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

impl Settings {
    pub fn validate(&self) -> AppResult<()> {
        check_range(
            "Reminder interval (minutes)",
            self.reminder_interval,
            &REMINDER_INTERVAL_RANGE,
        )?;
        check_range(
            "Exercise duration (seconds)",
            self.exercise_duration,
            &EXERCISE_DURATION_RANGE,
        )?;
        check_range("Repetitions", self.repetitions, &REPETITIONS_RANGE)?;

        let theme_len = self.theme.trim().chars().count();
        if theme_len == 0 || theme_len > THEME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Theme must be 1 to {} characters",
                THEME_MAX_LEN
            )));
        }

        Ok(())
    }

    /// Merge a patch into a copy of these settings. The result is validated
    /// as a whole; `self` is left untouched on error.
    pub fn merged(&self, patch: &SettingsPatch) -> AppResult<Settings> {
        let mut next = self.clone();

        if let Some(v) = patch.reminder_interval {
            next.reminder_interval = v;
        }
        if let Some(v) = patch.exercise_duration {
            next.exercise_duration = v;
        }
        if let Some(v) = patch.repetitions {
            next.repetitions = v;
        }
        if let Some(v) = patch.enable_sound {
            next.enable_sound = v;
        }
        if let Some(v) = patch.enable_notifications {
            next.enable_notifications = v;
        }
        if let Some(v) = &patch.theme {
            next.theme = v.trim().to_string();
        }
        if let Some(wh) = &patch.working_hours {
            if let Some(start) = &wh.start {
                next.working_hours.start = parse_hhmm(start)?;
            }
            if let Some(end) = &wh.end {
                next.working_hours.end = parse_hhmm(end)?;
            }
            if let Some(enabled) = wh.enabled {
                next.working_hours.enabled = enabled;
            }
        }

        next.validate()?;
        Ok(next)
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub reminder_interval: Option<u32>,
    pub exercise_duration: Option<u32>,
    pub repetitions: Option<u32>,
    pub enable_sound: Option<bool>,
    pub enable_notifications: Option<bool>,
    pub theme: Option<String>,
    pub working_hours: Option<WorkingHoursPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHoursPatch {
    pub start: Option<String>,
    pub end: Option<String>,
    pub enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}
