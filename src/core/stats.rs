//! Read-only statistics over the daily aggregates and the session log.

use crate::db::{daily, reminders, sessions};
use crate::errors::AppResult;
use crate::models::daily::ChartPoint;
use crate::models::session::ExerciseSession;
use crate::utils::clock::{Clock, local_datetime};
use crate::utils::date::{DateRange, month_start, week_start};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub today_count: u32,
    pub week_count: u32,
    pub month_count: u32,
    pub total_count: u32,
    pub streak_days: u32,
    pub last_exercise_time: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub average_duration: f64,
    /// Percentage of started sessions that were completed (0-100).
    pub completion_rate: f64,
    pub average_daily_this_week: f64,
    pub total_exercises: u32,
    pub completed_exercises: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub fired_today: u32,
    pub responded_today: u32,
    /// Percentage of today's reminders followed by an exercise (0-100).
    pub response_rate: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub struct StatsService<'a> {
    conn: &'a Connection,
    today: NaiveDate,
}

impl<'a> StatsService<'a> {
    pub fn new(conn: &'a Connection, clock: &dyn Clock) -> Self {
        Self {
            conn,
            today: clock.today(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn today_count(&self) -> AppResult<u32> {
        Ok(daily::load_day(self.conn, self.today)?
            .map(|d| d.exercise_count)
            .unwrap_or(0))
    }

    /// Monday of the current week through today.
    pub fn week_count(&self) -> AppResult<u32> {
        daily::sum_counts(self.conn, Some(week_start(self.today)), Some(self.today))
    }

    /// First of the current month through today.
    pub fn month_count(&self) -> AppResult<u32> {
        daily::sum_counts(self.conn, Some(month_start(self.today)), Some(self.today))
    }

    pub fn total_count(&self) -> AppResult<u32> {
        daily::sum_counts(self.conn, None, None)
    }

    /// Consecutive active days walking back from today. A gap at today
    /// itself yields 0.
    pub fn streak_days(&self) -> AppResult<u32> {
        let active = daily::active_dates_desc(self.conn, self.today)?;

        let mut streak = 0u32;
        let mut expected = self.today;
        for date in active {
            if date != expected {
                break;
            }
            streak += 1;
            match expected.pred_opt() {
                Some(prev) => expected = prev,
                None => break,
            }
        }
        Ok(streak)
    }

    pub fn last_exercise_time(&self) -> AppResult<Option<DateTime<Local>>> {
        sessions::last_completed_end(self.conn)
    }

    pub fn comprehensive(&self) -> AppResult<StatsSummary> {
        Ok(StatsSummary {
            today_count: self.today_count()?,
            week_count: self.week_count()?,
            month_count: self.month_count()?,
            total_count: self.total_count()?,
            streak_days: self.streak_days()?,
            last_exercise_time: self.last_exercise_time()?,
        })
    }

    fn series(&self, window: DateRange) -> AppResult<Vec<ChartPoint>> {
        let days: Vec<NaiveDate> = window.collect();
        let (Some(first), Some(last)) = (days.first(), days.last()) else {
            return Ok(Vec::new());
        };

        let by_date: HashMap<NaiveDate, _> = daily::load_range(self.conn, *first, *last)?
            .into_iter()
            .map(|a| (a.date, a))
            .collect();

        Ok(days
            .into_iter()
            .map(|d| ChartPoint::new(d, by_date.get(&d)))
            .collect())
    }

    /// Exactly seven entries: the six days before today, then today.
    pub fn weekly_series(&self) -> AppResult<Vec<ChartPoint>> {
        self.series(DateRange::ending_at(self.today, 7))
    }

    /// First of the month through today.
    pub fn monthly_series(&self) -> AppResult<Vec<ChartPoint>> {
        self.series(DateRange::month_to_date(self.today))
    }

    pub fn history(&self, limit: u32) -> AppResult<Vec<ExerciseSession>> {
        sessions::completed_history(self.conn, limit)
    }

    pub fn performance_metrics(&self) -> AppResult<PerformanceMetrics> {
        let (total, completed, avg) = sessions::session_counters(self.conn)?;

        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let week = self.week_count()?;

        Ok(PerformanceMetrics {
            average_duration: round2(avg.unwrap_or(0.0)),
            completion_rate: round2(completion_rate),
            average_daily_this_week: round2(week as f64 / 7.0),
            total_exercises: total,
            completed_exercises: completed,
        })
    }

    pub fn reminder_summary(&self) -> AppResult<ReminderSummary> {
        let from = local_datetime(self.today.and_time(chrono::NaiveTime::MIN));
        let to = match self.today.succ_opt() {
            Some(next) => local_datetime(next.and_time(chrono::NaiveTime::MIN)),
            None => from + chrono::Duration::days(1),
        };

        let fired = reminders::load_between(self.conn, &from, &to)?;
        let responded = fired.iter().filter(|r| r.responded).count() as u32;
        let total = fired.len() as u32;

        Ok(ReminderSummary {
            fired_today: total,
            responded_today: responded,
            response_rate: if total > 0 {
                round2(responded as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        })
    }
}
