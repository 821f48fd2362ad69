use super::parse_db_enum;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_user(row: &Row) -> Result<User> {
    let role_str: String = row.get("role")?;
    let role = parse_db_enum(&role_str, Role::from_db_str, AppError::InvalidRole)?;

    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        personal_id: row.get("personal_id")?,
        role,
        created_at: row.get("created_at")?,
    })
}

pub fn count_users(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
}

/// Insert a new user and return it with its id.
pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    personal_id: &str,
    role: Role,
) -> AppResult<User> {
    let created_at = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (name, email, personal_id, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, personal_id, role.to_db_str(), created_at],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        personal_id: personal_id.to_string(),
        role,
        created_at,
    })
}

pub fn find_user_by_personal_id(conn: &Connection, personal_id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT * FROM users WHERE personal_id = ?1",
            [personal_id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// All users ordered by name, optionally restricted to one role.
pub fn list_users(conn: &Connection, role: Option<Role>) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM users
         WHERE (?1 IS NULL OR role = ?1)
         ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([role.map(|r| r.to_db_str())], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_user(conn: &Connection, user: &User) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
        params![user.name, user.email, user.id],
    )?)
}

pub fn email_taken(conn: &Connection, email: &str, except_id: i64) -> AppResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND id <> ?2",
            params![email, except_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn update_role(conn: &Connection, id: i64, role: Role) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE users SET role = ?1 WHERE id = ?2",
        params![role.to_db_str(), id],
    )?)
}

pub fn delete_user(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?)
}
