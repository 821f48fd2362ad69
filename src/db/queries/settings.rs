use super::parse_db_enum;
use crate::errors::{AppError, AppResult};
use crate::models::settings::{DefaultView, TimeFormat, UserSettings};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_settings(row: &Row) -> Result<UserSettings> {
    let view_str: String = row.get("default_view")?;
    let format_str: String = row.get("time_format")?;

    Ok(UserSettings {
        user_id: row.get("user_id")?,
        enable_notifications: row.get("enable_notifications")?,
        auto_clock_out: row.get("auto_clock_out")?,
        default_view: parse_db_enum(&view_str, DefaultView::from_db_str, AppError::InvalidSetting)?,
        time_format: parse_db_enum(&format_str, TimeFormat::from_db_str, AppError::InvalidSetting)?,
    })
}

pub fn get_settings(conn: &Connection, user_id: i64) -> AppResult<Option<UserSettings>> {
    let s = conn
        .query_row(
            "SELECT * FROM user_settings WHERE user_id = ?1",
            [user_id],
            map_settings,
        )
        .optional()?;
    Ok(s)
}

/// Insert or replace the row of `s.user_id`.
pub fn save_settings(conn: &Connection, s: &UserSettings) -> AppResult<usize> {
    Ok(conn.execute(
        "INSERT INTO user_settings
            (user_id, enable_notifications, auto_clock_out, default_view, time_format)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
            enable_notifications = excluded.enable_notifications,
            auto_clock_out       = excluded.auto_clock_out,
            default_view         = excluded.default_view,
            time_format          = excluded.time_format",
        params![
            s.user_id,
            s.enable_notifications,
            s.auto_clock_out,
            s.default_view.to_db_str(),
            s.time_format.to_db_str()
        ],
    )?)
}
