//! Config file upkeep: report and fill in fields added by newer releases.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

const KNOWN_FIELDS: &[&str] = &[
    "database",
    "current_user",
    "recent_limit",
    "per_page",
    "admin_range_days",
    "nearby_radius_km",
];

/// Keys known to this release that are absent from the file at `path`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value =
        serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

    let map = yaml
        .as_mapping()
        .ok_or_else(|| AppError::Config("configuration root is not a mapping".into()))?;

    Ok(KNOWN_FIELDS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect())
}

/// Rewrite the file with every missing field set to its default.
/// Returns true when the file changed.
pub fn migrate_config(path: &Path) -> AppResult<bool> {
    let missing = missing_fields(path)?;
    if missing.is_empty() {
        info("Configuration is up to date.");
        return Ok(false);
    }

    // serde defaults fill the gaps, save() writes them back
    let cfg = Config::load_from(path)?;
    cfg.save(path)?;

    success(format!("Added missing fields: {}", missing.join(", ")));
    Ok(true)
}
