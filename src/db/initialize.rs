use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Initialize the database.
/// Schema creation and upgrades both go through the migration list.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn).map_err(|e| AppError::Migration(e.to_string()))?;
    Ok(())
}
