//! Unified application error type.
//! Every module (db, core, cli, utils) returns AppError so that the command
//! handlers can propagate with `?` and main() only has one thing to print.

use crate::models::registration::TimeRegistration;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid registration status: {0}")]
    InvalidStatus(String),

    #[error("Invalid recurrence pattern: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid overtime rule type: {0} (weekday_evening, weekend, holiday or night_shift)")]
    InvalidOvertimeType(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid search radius: {0} km (allowed range 0.1 - 50)")]
    InvalidRadius(f64),

    // ---------------------------
    // Time registration rules
    // ---------------------------
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Time registration overlaps with existing registration #{} ({})", .0.id, .0.describe())]
    Overlap(Box<TimeRegistration>),

    #[error("You are already clocked in since {0}")]
    AlreadyClockedIn(String),

    #[error("No active clock-in found for {0}")]
    NoActiveClockIn(String),

    #[error("Registration #{0} is still open and cannot be reviewed")]
    OpenRegistration(i64),

    // ---------------------------
    // Authorization / lookup
    // ---------------------------
    #[error("No acting user: pass --as <personal_id> or set current_user in the config")]
    NotAuthenticated,

    #[error("Unauthorized: {0}")]
    Forbidden(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("{0} not found")]
    NotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
