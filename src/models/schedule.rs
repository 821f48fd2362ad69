use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }
}

/// Planned shift for a user.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: f64,
    pub location_id: Option<i64>,
    pub recurrence: Option<Recurrence>, // None = one-off shift
}

impl Schedule {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}
