use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing timereg…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path);

    let conn = Connection::open(&db_path)?;
    init_db(&conn)?;

    println!("✅ Database initialized at {}", db_path);

    // the audit line is not worth failing init for
    if let Err(e) = ttlog(
        &conn,
        None,
        "init",
        "",
        &format!("Database initialized at {}", db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 timereg initialization completed!");
    Ok(())
}
