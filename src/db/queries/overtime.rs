use super::parse_db_enum;
use crate::errors::{AppError, AppResult};
use crate::models::overtime::{OvertimeRule, OvertimeType};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_overtime_rule(row: &Row) -> Result<OvertimeRule> {
    let kind_str: String = row.get("type")?;
    let kind = parse_db_enum(&kind_str, OvertimeType::from_db_str, AppError::InvalidOvertimeType)?;

    Ok(OvertimeRule {
        id: row.get("id")?,
        name: row.get("name")?,
        kind,
        multiplier: row.get("multiplier")?,
        description: row.get("description")?,
        is_active: row.get("is_active")?,
    })
}

pub fn insert_overtime_rule(conn: &Connection, rule: &OvertimeRule) -> AppResult<i64> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO overtime_rules
            (name, type, multiplier, description, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            rule.name,
            rule.kind.to_db_str(),
            rule.multiplier,
            rule.description,
            rule.is_active,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_overtime_rule(conn: &Connection, rule: &OvertimeRule) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE overtime_rules
         SET name = ?1, type = ?2, multiplier = ?3, description = ?4, is_active = ?5,
             updated_at = ?6
         WHERE id = ?7",
        params![
            rule.name,
            rule.kind.to_db_str(),
            rule.multiplier,
            rule.description,
            rule.is_active,
            Local::now().to_rfc3339(),
            rule.id
        ],
    )?)
}

pub fn get_overtime_rule(conn: &Connection, id: i64) -> AppResult<Option<OvertimeRule>> {
    let rule = conn
        .query_row(
            "SELECT * FROM overtime_rules WHERE id = ?1",
            [id],
            map_overtime_rule,
        )
        .optional()?;
    Ok(rule)
}

/// Rules ordered by name. `None` filters are ignored.
pub fn list_overtime_rules(
    conn: &Connection,
    active: Option<bool>,
    kind: Option<OvertimeType>,
) -> AppResult<Vec<OvertimeRule>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM overtime_rules
         WHERE (?1 IS NULL OR is_active = ?1) AND (?2 IS NULL OR type = ?2)
         ORDER BY name ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![active, kind.map(|k| k.to_db_str())],
        map_overtime_rule,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_overtime_rule(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM overtime_rules WHERE id = ?1", [id])?)
}
