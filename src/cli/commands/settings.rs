use crate::api::App;
use crate::cli::output::emit;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::settings::{Settings, SettingsPatch, WorkingHoursPatch};
use crate::ui::messages::{header, success};
use crate::utils::colors::colorize_flag;
use crate::utils::formatting::pad_right;
use crate::utils::time::format_hhmm;

const LABEL_W: usize = 20;

fn patch_from(cmd: &Commands) -> SettingsPatch {
    let Commands::Settings {
        interval,
        duration,
        reps,
        sound,
        notifications,
        theme,
        work_start,
        work_end,
        working_hours,
    } = cmd
    else {
        return SettingsPatch::default();
    };

    let hours = WorkingHoursPatch {
        start: work_start.clone(),
        end: work_end.clone(),
        enabled: *working_hours,
    };

    SettingsPatch {
        reminder_interval: *interval,
        exercise_duration: *duration,
        repetitions: *reps,
        enable_sound: *sound,
        enable_notifications: *notifications,
        theme: theme.clone(),
        working_hours: (hours != WorkingHoursPatch::default()).then_some(hours),
    }
}

pub(crate) fn print_settings(s: &Settings) {
    header("Settings");
    let row = |label: &str, value: String| println!("{} {}", pad_right(label, LABEL_W), value);

    row("Reminder interval:", format!("{} min", s.reminder_interval));
    row("Exercise duration:", format!("{} s", s.exercise_duration));
    row("Repetitions:", s.repetitions.to_string());
    row("Sound:", colorize_flag(s.enable_sound));
    row("Notifications:", colorize_flag(s.enable_notifications));
    row("Theme:", s.theme.clone());
    row(
        "Working hours:",
        format!(
            "{}-{} ({})",
            format_hhmm(s.working_hours.start),
            format_hhmm(s.working_hours.end),
            colorize_flag(s.working_hours.enabled)
        ),
    );
    println!();
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let app = App::from_config(cfg);
    let patch = patch_from(&cli.command);

    if patch.is_empty() {
        return emit(cli, app.get_settings(), None, print_settings);
    }

    emit(
        cli,
        app.update_settings(&patch),
        Some("Settings updated"),
        |s| {
            print_settings(s);
            success("Settings updated");
        },
    )
}
