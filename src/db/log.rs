use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an audit line into the `log` table.
/// `actor` is the id of the user who triggered the operation (None for system work).
pub fn ttlog(
    conn: &Connection,
    actor: Option<i64>,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, actor, operation, target, message)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    stmt.execute(params![now, actor, operation, target, message])?;

    Ok(())
}
