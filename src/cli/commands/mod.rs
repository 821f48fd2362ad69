pub mod clock;
pub mod config;
pub mod db;
pub mod init;
pub mod location;
pub mod log;
pub mod overtime;
pub mod registration;
pub mod schedule;
pub mod settings;
pub mod user;

use crate::auth::AuthContext;
use crate::config::Config;
use crate::core::user::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::ui::messages::warning;
use serde::Serialize;
use std::io::{self, Write};

/// Open the configured database and resolve who is acting.
pub(crate) fn session(cfg: &Config) -> AppResult<(DbPool, AuthContext)> {
    let mut pool = DbPool::new(&cfg.database)?;
    let ctx = AuthContext::resolve(&mut pool, cfg.current_user.as_deref())?;
    Ok((pool, ctx))
}

/// `--user <personal id>` → user id.
pub(crate) fn target_user(pool: &mut DbPool, personal_id: Option<&String>) -> AppResult<Option<i64>> {
    personal_id
        .map(|pid| UserLogic::resolve_id(pool, pid))
        .transpose()
}

pub(crate) fn coordinates(lat: &Option<f64>, lon: &Option<f64>) -> AppResult<Option<Coordinates>> {
    Coordinates::from_pair(*lat, *lon)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
