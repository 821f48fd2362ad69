//! Formatting utilities used for CLI outputs.

/// Minutes → `8h 5m`, the compact form used by `status`.
pub fn elapsed_label(mins: i64) -> String {
    format!("{}h {}m", mins / 60, mins % 60)
}

pub fn hours_label(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{:.2}", h),
        None => "--".to_string(),
    }
}
