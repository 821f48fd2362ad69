use serde::Serialize;

/// Review state of a time registration.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RegistrationStatus::Pending),
            "approved" => Some(RegistrationStatus::Approved),
            "rejected" => Some(RegistrationStatus::Rejected),
            _ => None,
        }
    }

    /// Helper: accept CLI input in any case
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RegistrationStatus::Pending)
    }
}
