use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultView {
    #[default]
    Dashboard,
    TimeRegistrations,
    Reports,
}

impl DefaultView {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DefaultView::Dashboard => "dashboard",
            DefaultView::TimeRegistrations => "time-registrations",
            DefaultView::Reports => "reports",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "dashboard" => Some(DefaultView::Dashboard),
            "time-registrations" => Some(DefaultView::TimeRegistrations),
            "reports" => Some(DefaultView::Reports),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    H12,
    #[default]
    #[serde(rename = "24h")]
    H24,
}

impl TimeFormat {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TimeFormat::H12 => "12h",
            TimeFormat::H24 => "24h",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "12h" => Some(TimeFormat::H12),
            "24h" => Some(TimeFormat::H24),
            _ => None,
        }
    }

    /// chrono pattern for clock times shown to the user.
    pub fn clock_pattern(&self) -> &'static str {
        match self {
            TimeFormat::H12 => "%I:%M %p",
            TimeFormat::H24 => "%H:%M",
        }
    }
}

/// Per-user preferences. A user without a stored row gets the defaults.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSettings {
    pub user_id: i64,
    pub enable_notifications: bool,
    pub auto_clock_out: bool,
    pub default_view: DefaultView,
    pub time_format: TimeFormat,
}

impl UserSettings {
    pub fn defaults_for(user_id: i64) -> Self {
        Self {
            user_id,
            enable_notifications: true,
            auto_clock_out: false,
            default_view: DefaultView::default(),
            time_format: TimeFormat::default(),
        }
    }
}
