use super::{date_to_db, parse_db_date, parse_db_enum, parse_db_time, time_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Recurrence, Schedule};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_schedule(row: &Row) -> Result<Schedule> {
    let date_str: String = row.get("date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: String = row.get("end_time")?;
    let recurrence_str: Option<String> = row.get("recurrence")?;

    let recurrence = match recurrence_str {
        Some(s) => Some(parse_db_enum(
            &s,
            Recurrence::from_db_str,
            AppError::InvalidRecurrence,
        )?),
        None => None,
    };

    Ok(Schedule {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date: parse_db_date(&date_str)?,
        start_time: parse_db_time(&start_str)?,
        end_time: parse_db_time(&end_str)?,
        total_hours: row.get("total_hours")?,
        location_id: row.get("location_id")?,
        recurrence,
    })
}

/// Insert a schedule and return its id. `total_hours` must already be computed.
pub fn insert_schedule(conn: &Connection, s: &Schedule) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO schedules
            (user_id, date, start_time, end_time, total_hours, location_id, recurrence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            s.user_id,
            date_to_db(&s.date),
            time_to_db(&s.start_time),
            time_to_db(&s.end_time),
            s.total_hours,
            s.location_id,
            s.recurrence.map(|r| r.to_db_str()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_schedule(conn: &Connection, s: &Schedule) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE schedules
         SET user_id = ?1, date = ?2, start_time = ?3, end_time = ?4, total_hours = ?5,
             location_id = ?6, recurrence = ?7
         WHERE id = ?8",
        params![
            s.user_id,
            date_to_db(&s.date),
            time_to_db(&s.start_time),
            time_to_db(&s.end_time),
            s.total_hours,
            s.location_id,
            s.recurrence.map(|r| r.to_db_str()),
            s.id
        ],
    )?)
}

pub fn get_schedule(conn: &Connection, id: i64) -> AppResult<Option<Schedule>> {
    let s = conn
        .query_row("SELECT * FROM schedules WHERE id = ?1", [id], map_schedule)
        .optional()?;
    Ok(s)
}

/// Schedules in `[from, to]`, optionally for a single user, in calendar order.
pub fn list_schedules(
    conn: &Connection,
    user_id: Option<i64>,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<Schedule>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM schedules
         WHERE (?1 IS NULL OR user_id = ?1) AND date >= ?2 AND date <= ?3
         ORDER BY date ASC, start_time ASC",
    )?;
    let rows = stmt.query_map(
        params![user_id, date_to_db(from), date_to_db(to)],
        map_schedule,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_schedule(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM schedules WHERE id = ?1", [id])?)
}
