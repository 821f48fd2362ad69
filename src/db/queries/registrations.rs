use super::{date_to_db, parse_db_date, parse_db_enum, parse_db_time, time_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::registration::TimeRegistration;
use crate::models::status::RegistrationStatus;
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use serde::Serialize;

/// Filters for listing registrations. Empty filter = everything.
#[derive(Debug, Default, Clone)]
pub struct RegistrationFilter {
    pub user_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<RegistrationStatus>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Registration joined with its owner, for the supervisor overview.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRow {
    #[serde(flatten)]
    pub registration: TimeRegistration,
    pub user_name: String,
    pub personal_id: String,
}

fn coordinates_at(row: &Row, lat: &str, lon: &str) -> Result<Option<Coordinates>> {
    let latitude: Option<f64> = row.get(lat)?;
    let longitude: Option<f64> = row.get(lon)?;
    // Rows with half a pair are treated as "no position" instead of failing the whole query
    Ok(Coordinates::from_pair(latitude, longitude).ok().flatten())
}

pub fn map_registration(row: &Row) -> Result<TimeRegistration> {
    let date_str: String = row.get("date")?;
    let in_str: String = row.get("clock_in")?;
    let out_str: Option<String> = row.get("clock_out")?;
    let status_str: String = row.get("status")?;

    let clock_out = match out_str {
        Some(s) => Some(parse_db_time(&s)?),
        None => None,
    };

    Ok(TimeRegistration {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date: parse_db_date(&date_str)?,
        clock_in: parse_db_time(&in_str)?,
        clock_out,
        total_hours: row.get("total_hours")?,
        start: coordinates_at(row, "latitude", "longitude")?,
        end: coordinates_at(row, "latitude_end", "longitude_end")?,
        notes: row.get("notes")?,
        status: parse_db_enum(
            &status_str,
            RegistrationStatus::from_db_str,
            AppError::InvalidStatus,
        )?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn collect(rows: impl Iterator<Item = Result<TimeRegistration>>) -> AppResult<Vec<TimeRegistration>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a registration and return its new id.
pub fn insert_registration(conn: &Connection, reg: &TimeRegistration) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_registrations
            (user_id, date, clock_in, clock_out, total_hours,
             latitude, longitude, latitude_end, longitude_end,
             notes, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            reg.user_id,
            date_to_db(&reg.date),
            time_to_db(&reg.clock_in),
            reg.clock_out.as_ref().map(time_to_db),
            reg.total_hours,
            reg.start.map(|c| c.latitude),
            reg.start.map(|c| c.longitude),
            reg.end.map(|c| c.latitude),
            reg.end.map(|c| c.longitude),
            reg.notes,
            reg.status.to_db_str(),
            reg.created_at,
            reg.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a registration (all fields except id and created_at).
/// `updated_at` is refreshed here.
pub fn update_registration(conn: &Connection, reg: &TimeRegistration) -> AppResult<()> {
    conn.execute(
        "UPDATE time_registrations
         SET user_id = ?1, date = ?2, clock_in = ?3, clock_out = ?4,
             total_hours = ?5, latitude = ?6, longitude = ?7,
             latitude_end = ?8, longitude_end = ?9, notes = ?10,
             status = ?11, updated_at = ?12
         WHERE id = ?13",
        params![
            reg.user_id,
            date_to_db(&reg.date),
            time_to_db(&reg.clock_in),
            reg.clock_out.as_ref().map(time_to_db),
            reg.total_hours,
            reg.start.map(|c| c.latitude),
            reg.start.map(|c| c.longitude),
            reg.end.map(|c| c.latitude),
            reg.end.map(|c| c.longitude),
            reg.notes,
            reg.status.to_db_str(),
            Local::now().to_rfc3339(),
            reg.id,
        ],
    )?;
    Ok(())
}

pub fn get_registration(conn: &Connection, id: i64) -> AppResult<Option<TimeRegistration>> {
    let reg = conn
        .query_row(
            "SELECT * FROM time_registrations WHERE id = ?1",
            [id],
            map_registration,
        )
        .optional()?;
    Ok(reg)
}

/// Sibling set handed to the overlap validator: every registration of
/// `user_id` on `date`, ordered by clock-in.
pub fn load_registrations_for_day(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Vec<TimeRegistration>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM time_registrations
         WHERE user_id = ?1 AND date = ?2
         ORDER BY clock_in ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![user_id, date_to_db(date)], map_registration)?;
    collect(rows)
}

/// The registration the user is currently clocked in on, if any.
pub fn find_open_registration(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<TimeRegistration>> {
    let reg = conn
        .query_row(
            "SELECT * FROM time_registrations
             WHERE user_id = ?1 AND date = ?2 AND clock_out IS NULL
             ORDER BY clock_in ASC
             LIMIT 1",
            params![user_id, date_to_db(date)],
            map_registration,
        )
        .optional()?;
    Ok(reg)
}

pub fn set_status(conn: &Connection, id: i64, status: RegistrationStatus) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE time_registrations SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), Local::now().to_rfc3339(), id],
    )?)
}

pub fn delete_registration(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM time_registrations WHERE id = ?1", [id])?)
}

fn sql_int(n: usize) -> AppResult<i64> {
    i64::try_from(n).map_err(|_| AppError::Other(format!("{} is too large for a query bound", n)))
}

// Generic helper: WHERE clause + positional params for a filter
fn build_filtered_query(
    base_query: &str,
    filter: &RegistrationFilter,
) -> AppResult<(String, Vec<Value>)> {
    let mut query = base_query.to_string();
    let mut conditions = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(uid) = filter.user_id {
        conditions.push("r.user_id = ?");
        params.push(Value::Integer(uid));
    }
    if let Some(from) = filter.from {
        conditions.push("r.date >= ?");
        params.push(Value::Text(date_to_db(&from)));
    }
    if let Some(to) = filter.to {
        conditions.push("r.date <= ?");
        params.push(Value::Text(date_to_db(&to)));
    }
    if let Some(status) = filter.status {
        conditions.push("r.status = ?");
        params.push(Value::Text(status.to_db_str().to_string()));
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    query.push_str(" ORDER BY r.date DESC, r.clock_in DESC, r.id DESC");

    if let Some(limit) = filter.limit {
        query.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(sql_int(limit)?));
        params.push(Value::Integer(sql_int(filter.offset)?));
    }

    Ok((query, params))
}

/// Registrations matching `filter`, newest first.
pub fn list_registrations(
    conn: &Connection,
    filter: &RegistrationFilter,
) -> AppResult<Vec<TimeRegistration>> {
    let (sql, values) = build_filtered_query("SELECT r.* FROM time_registrations r", filter)?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_registration)?;
    collect(rows)
}

/// Same as `list_registrations` but joined with the owner's name.
pub fn list_team_registrations(
    conn: &Connection,
    filter: &RegistrationFilter,
) -> AppResult<Vec<TeamRow>> {
    let (sql, values) = build_filtered_query(
        "SELECT r.*, u.name AS user_name, u.personal_id AS user_personal_id
         FROM time_registrations r
         JOIN users u ON u.id = r.user_id",
        filter,
    )?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(TeamRow {
            registration: map_registration(row)?,
            user_name: row.get("user_name")?,
            personal_id: row.get("user_personal_id")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_registrations(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM time_registrations", [], |row| row.get(0))?)
}
