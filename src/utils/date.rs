use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_optional_date(input: Option<&String>) -> AppResult<Option<NaiveDate>> {
    match input {
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(None),
    }
}

/// Monday..Sunday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Inclusive iterator over `[from, to]`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}

/// Accepts `mon`, `monday`, `Mon`, ... and also ISO numbers 1 (Mon) .. 7 (Sun).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "1" => Some(Weekday::Mon),
        "2" => Some(Weekday::Tue),
        "3" => Some(Weekday::Wed),
        "4" => Some(Weekday::Thu),
        "5" => Some(Weekday::Fri),
        "6" => Some(Weekday::Sat),
        "7" => Some(Weekday::Sun),
        _ => s.parse::<Weekday>().ok(),
    }
}

/// Comma separated list of weekdays, e.g. `mon,wed,fri`.
pub fn parse_weekdays(list: &str) -> AppResult<Vec<Weekday>> {
    let mut out = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let wd = parse_weekday(part)
            .ok_or_else(|| AppError::InvalidDate(format!("Invalid weekday '{}'", part.trim())))?;
        if !out.contains(&wd) {
            out.push(wd);
        }
    }
    if out.is_empty() {
        return Err(AppError::InvalidDate("No weekday given".into()));
    }
    Ok(out)
}
