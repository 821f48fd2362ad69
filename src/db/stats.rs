use crate::db::pool::DbPool;
use crate::db::queries::registrations::count_registrations;
use crate::db::queries::users::count_users;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTERS
    //
    let users = count_users(&pool.conn)?;
    let registrations = count_registrations(&pool.conn)?;
    let open: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM time_registrations WHERE clock_out IS NULL",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, users, RESET);
    println!(
        "{}• Registrations:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, registrations, RESET, open
    );

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM time_registrations ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM time_registrations ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE REGISTRATIONS/DAY
    //
    if let (Some(f), Some(l)) = (first_date, last_date)
        && let (Ok(d1), Ok(d2)) = (
            NaiveDate::parse_from_str(&f, "%Y-%m-%d"),
            NaiveDate::parse_from_str(&l, "%Y-%m-%d"),
        )
    {
        let days = (d2 - d1).num_days().max(1);
        let avg = registrations as f64 / days as f64;
        println!("{}• Average registrations/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
