/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::status::RegistrationStatus;

/// pending → yellow, approved → green, rejected → red
pub fn color_for_status(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Pending => YELLOW,
        RegistrationStatus::Approved => GREEN,
        RegistrationStatus::Rejected => RED,
    }
}

/// GREY for an open clock-out, RESET otherwise.
pub fn color_for_optional_field<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() && v.as_ref() != "--:--" => RESET,
        _ => GREY,
    }
}
