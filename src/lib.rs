//! Kegel Helper library root.
//! Exposes the CLI parser, the high-level run() function, the API facade and
//! the internal modules.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Settings { .. } => cli::commands::settings::handle(cli, cfg),
        Commands::Start => cli::commands::start::handle(cli, cfg),
        Commands::Complete => cli::commands::complete::handle(cli, cfg),
        Commands::Stats { .. } => cli::commands::stats::handle(cli, cfg),
        Commands::History { .. } => cli::commands::history::handle(cli, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Run => cli::commands::run::handle(cfg),
    }
}

/// Install the stderr diagnostics subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // a second install (e.g. from tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }

    init_tracing(&cfg.log_level);

    dispatch(&cli, &cfg)
}
