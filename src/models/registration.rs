use super::{coordinates::Coordinates, status::RegistrationStatus};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

/// A worked interval for one user on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct TimeRegistration {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,                   // ⇔ time_registrations.date ("YYYY-MM-DD")
    pub clock_in: NaiveTime,               // ⇔ time_registrations.clock_in ("HH:MM:SS")
    pub clock_out: Option<NaiveTime>,      // NULL while the user is on the clock
    pub total_hours: Option<f64>,          // derived, never set by hand
    pub start: Option<Coordinates>,        // ⇔ latitude / longitude
    pub end: Option<Coordinates>,          // ⇔ latitude_end / longitude_end
    pub notes: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl TimeRegistration {
    /// Builder for a registration that has not been persisted yet (`id = 0`).
    pub fn new(
        user_id: i64,
        date: NaiveDate,
        clock_in: NaiveTime,
        clock_out: Option<NaiveTime>,
    ) -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            id: 0,
            user_id,
            date,
            clock_in,
            clock_out,
            total_hours: None,
            start: None,
            end: None,
            notes: None,
            status: RegistrationStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn clock_in_str(&self) -> String {
        self.clock_in.format("%H:%M").to_string()
    }

    pub fn clock_out_str(&self) -> String {
        self.clock_out
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }

    /// Short human description, e.g. `2025-03-10 09:00-12:00`.
    pub fn describe(&self) -> String {
        format!(
            "{} {}-{}",
            self.date_str(),
            self.clock_in_str(),
            self.clock_out_str()
        )
    }
}
