use crate::api::App;
use crate::cli::output::emit;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::session::StartedSession;
use crate::ui::messages::{info, success};

pub(crate) fn print_started(s: &StartedSession) {
    success(format!(
        "Exercise #{} started at {}",
        s.exercise_id,
        s.start_time.format("%H:%M:%S")
    ));
    info(format!(
        "Hold {}s, {} repetitions. Run `complete` when done.",
        s.planned_duration, s.repetitions
    ));
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let app = App::from_config(cfg);
    emit(cli, app.start_exercise(), Some("Exercise started"), print_started)
}
