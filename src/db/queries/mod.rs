//! Typed SQL access, one file per table.

pub mod locations;
pub mod overtime;
pub mod registrations;
pub mod schedules;
pub mod settings;
pub mod users;

use crate::errors::AppError;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M:%S";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn date_to_db(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn time_to_db(t: &NaiveTime) -> String {
    t.format(TIME_FMT).to_string()
}

pub(crate) fn parse_db_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|_| conversion_error(0, AppError::InvalidDate(s.to_string())))
}

/// Accepts `HH:MM:SS` (current format) and `HH:MM` (hand-edited rows).
pub(crate) fn parse_db_time(s: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| conversion_error(0, AppError::InvalidTime(s.to_string())))
}

pub(crate) fn parse_db_enum<T>(
    s: &str,
    parse: impl Fn(&str) -> Option<T>,
    err: impl Fn(String) -> AppError,
) -> rusqlite::Result<T> {
    parse(s).ok_or_else(|| conversion_error(0, err(s.to_string())))
}
