use crate::api::App;
use crate::cli::output::emit;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::stats::{PerformanceMetrics, ReminderSummary, StatsSummary};
use crate::errors::{AppError, AppResult};
use crate::models::daily::ChartPoint;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_count, colorize_optional};
use crate::utils::formatting::{bold, percent};
use crate::utils::secs2readable;
use crate::utils::table::{Column, Table};
use serde::Serialize;

/// Everything `stats` prints, in one JSON document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub summary: StatsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<Vec<ChartPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Vec<ChartPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderSummary>,
}

pub(crate) fn print_summary(s: &StatsSummary) {
    header("Statistics");
    let count = |v: u32| format!("{}{}{}", color_for_count(v), v, RESET);

    println!("Today        : {}", count(s.today_count));
    println!("This week    : {}", count(s.week_count));
    println!("This month   : {}", count(s.month_count));
    println!("Total        : {}", count(s.total_count));
    println!("Streak       : {} day(s)", count(s.streak_days));

    let last = s
        .last_exercise_time
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!("Last exercise: {}", colorize_optional(&last));
    println!();
}

fn print_chart(title: &str, points: &[ChartPoint]) {
    println!("{}", bold(title));

    let mut table = Table::new(vec![
        Column::new("DATE", 10),
        Column::new("DAY", 4),
        Column::new("COUNT", 5),
        Column::new("DURATION", 10),
    ]);
    for p in points {
        table.add_row(vec![
            p.date.to_string(),
            p.day_name.clone(),
            p.count.to_string(),
            secs2readable(p.duration),
        ]);
    }
    print!("{}", table.render());
    println!();
}

fn print_performance(m: &PerformanceMetrics) {
    println!("{}", bold("Performance"));
    println!("Average duration   : {}", secs2readable(m.average_duration));
    println!(
        "Completion rate    : {} ({}/{})",
        percent(m.completion_rate),
        m.completed_exercises,
        m.total_exercises
    );
    println!("Daily avg this week: {:.2}", m.average_daily_this_week);
    println!();
}

fn print_reminders(r: &ReminderSummary) {
    println!("{}", bold("Reminders today"));
    println!("Fired    : {}", r.fired_today);
    println!("Responded: {}", r.responded_today);
    println!("Response : {}", percent(r.response_rate));
    println!();
}

fn print_report(r: &StatsReport) {
    print_summary(&r.summary);
    if let Some(w) = &r.weekly {
        print_chart("Last 7 days", w);
    }
    if let Some(m) = &r.monthly {
        print_chart("This month", m);
    }
    if let Some(p) = &r.performance {
        print_performance(p);
    }
    if let Some(rem) = &r.reminders {
        print_reminders(rem);
    }
}

fn build_report(app: &App, week: bool, month: bool, performance: bool, reminders: bool) -> AppResult<StatsReport> {
    Ok(StatsReport {
        summary: app.stats()?,
        weekly: week.then(|| app.weekly_chart()).transpose()?,
        monthly: month.then(|| app.monthly_chart()).transpose()?,
        performance: performance.then(|| app.performance()).transpose()?,
        reminders: reminders.then(|| app.reminder_summary()).transpose()?,
    })
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Stats {
        week,
        month,
        performance,
        reminders,
    } = &cli.command
    else {
        return Err(AppError::Other("stats handler called for another command".into()));
    };

    let app = App::from_config(cfg);
    let report = build_report(&app, *week, *month, *performance, *reminders);
    emit(cli, report, None, print_report)
}
