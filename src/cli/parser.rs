use crate::core::stats::DEFAULT_HISTORY_LIMIT;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for Kegel Helper
/// Exercise reminders, session log and statistics on SQLite
#[derive(Parser)]
#[command(
    name = "kegel-helper",
    version = env!("CARGO_PKG_VERSION"),
    about = "A pelvic-floor exercise reminder: periodic nudges, session log and streak statistics using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print the JSON response envelope instead of human output
    #[arg(global = true, long = "json")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Show the settings, or update them when any option is given
    Settings {
        #[arg(long = "interval", help = "Reminder interval in minutes (5-120)")]
        interval: Option<u32>,

        #[arg(long = "duration", help = "Exercise duration in seconds (3-30)")]
        duration: Option<u32>,

        #[arg(long = "reps", help = "Repetitions per session (5-50)")]
        reps: Option<u32>,

        #[arg(long = "sound", value_name = "BOOL", help = "Enable reminder sound")]
        sound: Option<bool>,

        #[arg(
            long = "notifications",
            value_name = "BOOL",
            help = "Enable desktop notifications"
        )]
        notifications: Option<bool>,

        #[arg(long = "theme", help = "UI theme tag (1-20 chars)")]
        theme: Option<String>,

        #[arg(long = "work-start", value_name = "HH:MM", help = "Working hours start")]
        work_start: Option<String>,

        #[arg(long = "work-end", value_name = "HH:MM", help = "Working hours end")]
        work_end: Option<String>,

        #[arg(
            long = "working-hours",
            value_name = "BOOL",
            help = "Only remind inside working hours"
        )]
        working_hours: Option<bool>,
    },

    /// Start an exercise session
    Start,

    /// Complete the exercise session in progress
    Complete,

    /// Show exercise statistics
    Stats {
        #[arg(long = "week", help = "Add the last 7 days chart")]
        week: bool,

        #[arg(long = "month", help = "Add the month-to-date chart")]
        month: bool,

        #[arg(long = "performance", help = "Add performance metrics")]
        performance: bool,

        #[arg(long = "reminders", help = "Add today's reminder summary")]
        reminders: bool,
    },

    /// List completed sessions, newest first
    History {
        #[arg(long, short, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Export the completed-session history
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the reminder loop and read commands from stdin
    Run,
}
