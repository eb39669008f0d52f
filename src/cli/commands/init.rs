use crate::config::Config;
use crate::core::settings::SettingsLogic;
use crate::db::log;
use crate::errors::AppResult;

use crate::cli::parser::Cli;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::ui::messages::warning;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the SQLite database (prod or test mode)
///  - all pending DB migrations
///  - the default settings row
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing Kegel Helper…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let pool = DbPool::new(&db_path)?;
    init_db(&pool.conn)?;

    let settings = SettingsLogic::get_or_create(&pool.conn, &cfg.default_settings())?;

    println!("✅ Database initialized at {}", &db_path);
    println!(
        "⏰ Reminder every {} minutes, {}s x {} reps",
        settings.reminder_interval, settings.exercise_duration, settings.repetitions
    );

    // internal log is never fatal
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 Kegel Helper initialization completed!");
    Ok(())
}
