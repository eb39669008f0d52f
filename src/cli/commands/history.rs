use crate::api::App;
use crate::cli::output::emit;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::stats::DEFAULT_HISTORY_LIMIT;
use crate::errors::AppResult;
use crate::models::session::ExerciseSession;
use crate::ui::messages::{header, warning};
use crate::utils::secs2readable;
use crate::utils::table::{Column, Table};

fn print_history(sessions: &[ExerciseSession]) {
    if sessions.is_empty() {
        warning("No completed sessions yet.");
        return;
    }

    header("History");

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("DATE", 10),
        Column::new("START", 8),
        Column::new("END", 8),
        Column::new("DURATION", 10),
        Column::new("PLAN", 5),
        Column::new("REPS", 4),
    ]);

    for s in sessions {
        table.add_row(vec![
            s.id.to_string(),
            s.start_time.format("%Y-%m-%d").to_string(),
            s.start_time.format("%H:%M:%S").to_string(),
            s.end_time
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "--".into()),
            secs2readable(s.duration.unwrap_or(0.0)),
            format!("{}s", s.planned_duration),
            s.repetitions.to_string(),
        ]);
    }

    print!("{}", table.render());
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let limit = match &cli.command {
        Commands::History { limit } => *limit,
        _ => DEFAULT_HISTORY_LIMIT,
    };

    let app = App::from_config(cfg);
    emit(cli, app.history(limit), None, |v| print_history(v))
}
