use crate::api::{App, ApiResponse, ReminderStatus};
use crate::cli::commands::complete::print_completed;
use crate::cli::commands::start::print_started;
use crate::cli::commands::stats::print_summary;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, header, info, warning};
use std::io::{self, BufRead, Write};
use tracing::debug;

const HELP: &str = "commands: status | toggle | start | complete | stats | quit";

fn print_status(s: &ReminderStatus) {
    if s.enabled {
        let next = s
            .next_reminder
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--".into());
        info(format!("Reminder on, every {} min, next at {}", s.interval, next));
    } else {
        info(format!("Reminder off (interval {} min)", s.interval));
    }
}

fn show<T>(resp: ApiResponse<T>, render: impl FnOnce(&T)) {
    match (resp.success, resp.data) {
        (true, Some(data)) => render(&data),
        _ => error(resp.message.unwrap_or_else(|| "Request failed".into())),
    }
}

fn prompt() {
    print!("> ");
    io::stdout().flush().ok();
}

/// Foreground loop: the reminder runs in the background while commands are
/// read line by line. EOF behaves like `quit`.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let app = App::from_config(cfg);

    app.scheduler().start()?;
    app.scheduler().add_notification_callback(|ctx| {
        debug!(at = %ctx.fired_at.to_rfc3339(), "reminder fired during interactive session");
        println!("(type `start` to begin the exercise)");
        Ok(())
    });

    header("Kegel Helper");
    info(format!("Database: {}", app.db_path()));
    show(App::respond(app.toggle_reminder()), print_status);
    info(HELP);

    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "status" => show(App::respond(app.reminder_status()), print_status),
            "toggle" => show(App::respond(app.toggle_reminder()), print_status),
            "start" => show(App::respond(app.start_exercise()), print_started),
            "complete" => show(App::respond(app.complete_exercise()), print_completed),
            "stats" => show(App::respond(app.stats()), print_summary),
            "quit" | "exit" => break,
            other => {
                warning(format!("Unknown command '{}'", other));
                info(HELP);
            }
        }
        prompt();
    }

    app.scheduler().stop();
    info("Reminder stopped. Bye!");
    Ok(())
}
