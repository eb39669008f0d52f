use crate::api::App;
use crate::cli::output::emit;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::session::CompletedSession;
use crate::ui::messages::{info, success};
use crate::utils::secs2readable;

pub(crate) fn print_completed(c: &CompletedSession) {
    success(format!(
        "Exercise #{} completed in {}",
        c.exercise_id,
        secs2readable(c.duration)
    ));
    info(format!("Sessions today: {}", c.today_count));
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let app = App::from_config(cfg);
    emit(
        cli,
        app.complete_exercise(),
        Some("Exercise completed"),
        print_completed,
    )
}
