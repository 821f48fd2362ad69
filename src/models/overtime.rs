use serde::Serialize;

/// When an overtime multiplier applies.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeType {
    WeekdayEvening,
    Weekend,
    Holiday,
    NightShift,
}

impl OvertimeType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OvertimeType::WeekdayEvening => "weekday_evening",
            OvertimeType::Weekend => "weekend",
            OvertimeType::Holiday => "holiday",
            OvertimeType::NightShift => "night_shift",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "weekday_evening" => Some(OvertimeType::WeekdayEvening),
            "weekend" => Some(OvertimeType::Weekend),
            "holiday" => Some(OvertimeType::Holiday),
            "night_shift" => Some(OvertimeType::NightShift),
            _ => None,
        }
    }

    /// CLI input: case-insensitive, `-` accepted for `_`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase().replace('-', "_"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OvertimeRule {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OvertimeType,
    pub multiplier: f64,
    pub description: Option<String>,
    pub is_active: bool,
}
