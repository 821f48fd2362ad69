//! Time utilities: parsing HH:MM[:SS], parsing "now" overrides.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

pub fn parse_required_time(input: &str) -> AppResult<NaiveTime> {
    parse_time(input).ok_or_else(|| AppError::InvalidTime(input.to_string()))
}

/// Current local wall-clock time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let n = Local::now().naive_local();
    n.with_nanosecond(0).unwrap_or(n)
}

/// `--at "YYYY-MM-DD HH:MM"` override, or the real clock.
pub fn resolve_now(at: Option<&String>) -> AppResult<NaiveDateTime> {
    match at {
        Some(s) => NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M"))
            .map_err(|_| AppError::InvalidTime(s.to_string())),
        None => Ok(now()),
    }
}
