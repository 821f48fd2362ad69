use super::{ask_confirmation, coordinates, print_json, session, target_user};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::registration::{ListQuery, NewRegistration, RegistrationLogic, RegistrationPatch};
use crate::db::queries::registrations::TeamRow;
use crate::errors::{AppError, AppResult};
use crate::models::registration::TimeRegistration;
use crate::models::status::RegistrationStatus;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_optional_field, color_for_status};
use crate::utils::date::{self, parse_optional_date};
use crate::utils::formatting::hours_label;
use crate::utils::table::{Column, Table};
use crate::utils::time::{parse_optional_time, parse_required_time};

fn parse_status(s: &str) -> AppResult<RegistrationStatus> {
    RegistrationStatus::from_code(s).ok_or_else(|| AppError::InvalidStatus(s.to_string()))
}

fn registration_row(r: &TimeRegistration) -> Vec<String> {
    vec![
        r.id.to_string(),
        r.date_str(),
        r.clock_in_str(),
        r.clock_out_str(),
        hours_label(r.total_hours),
        r.status.to_db_str().to_string(),
        r.notes.clone().unwrap_or_default(),
    ]
}

fn registration_columns() -> Vec<Column> {
    vec![
        Column::new("ID", 5),
        Column::new("DATE", 10),
        Column::new("IN", 5),
        Column::new("OUT", 5),
        Column::new("HOURS", 6),
        Column::new("STATUS", 8),
        Column::new("NOTES", 30),
    ]
}

fn print_registrations(regs: &[TimeRegistration]) {
    let mut table = Table::new(registration_columns());
    for r in regs {
        table.add_row(registration_row(r));
    }
    print!("{}", table.render());
}

fn print_team(rows: &[TeamRow]) {
    let mut columns = vec![Column::new("USER", 20), Column::new("PID", 10)];
    columns.extend(registration_columns());

    let mut table = Table::new(columns);
    for row in rows {
        let mut cells = vec![row.user_name.clone(), row.personal_id.clone()];
        cells.extend(registration_row(&row.registration));
        table.add_row(cells);
    }
    print!("{}", table.render());
}

fn print_details(r: &TimeRegistration) {
    let out = r.clock_out_str();
    println!("📋 Registration #{}", r.id);
    println!("   User     : {}", r.user_id);
    println!("   Date     : {}", r.date_str());
    println!("   In       : {}", r.clock_in_str());
    println!(
        "   Out      : {}{}{}",
        color_for_optional_field(Some(&out)),
        out,
        RESET
    );
    println!("   Hours    : {}", hours_label(r.total_hours));
    println!(
        "   Status   : {}{}{}",
        color_for_status(r.status),
        r.status.to_db_str(),
        RESET
    );
    if let Some(c) = r.start {
        println!("   Start at : {:.6}, {:.6}", c.latitude, c.longitude);
    }
    if let Some(c) = r.end {
        println!("   End at   : {:.6}, {:.6}", c.latitude, c.longitude);
    }
    if let Some(n) = &r.notes {
        println!("   Notes    : {}", n);
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Add {
            date: date_str,
            clock_in,
            clock_out,
            user,
            notes,
            lat,
            lon,
        } => {
            let d = date::parse_date(date_str)
                .ok_or_else(|| AppError::InvalidDate(date_str.to_string()))?;
            let clock_in = parse_required_time(clock_in)?;
            let clock_out = parse_optional_time(clock_out.as_ref())?;
            let start = coordinates(lat, lon)?;

            let (mut pool, ctx) = session(cfg)?;
            let user_id = target_user(&mut pool, user.as_ref())?;

            let reg = RegistrationLogic::store(
                &mut pool,
                &ctx,
                NewRegistration {
                    user_id,
                    date: d,
                    clock_in,
                    clock_out,
                    notes: notes.clone(),
                    start,
                },
            )?;

            success(format!("Registration #{} saved: {}", reg.id, reg.describe()));
        }

        Commands::Edit {
            id,
            date: date_str,
            clock_in,
            clock_out,
            notes,
            status,
        } => {
            let patch = RegistrationPatch {
                date: parse_optional_date(date_str.as_ref())?,
                clock_in: parse_optional_time(clock_in.as_ref())?,
                clock_out: parse_optional_time(clock_out.as_ref())?,
                notes: notes.clone(),
                status: status.as_deref().map(parse_status).transpose()?,
            };

            let (mut pool, ctx) = session(cfg)?;
            let reg = RegistrationLogic::update(&mut pool, &ctx, *id, patch)?;
            success(format!("Registration #{} updated: {}", reg.id, reg.describe()));
        }

        Commands::Show { id, json } => {
            let (mut pool, ctx) = session(cfg)?;
            let reg = RegistrationLogic::show(&mut pool, &ctx, *id)?;
            if *json {
                return print_json(&reg);
            }
            print_details(&reg);
        }

        Commands::List {
            user,
            date: day,
            from,
            to,
            status,
            page,
            per_page,
            json,
        } => {
            let (mut pool, ctx) = session(cfg)?;

            let (from, to) = match parse_optional_date(day.as_ref())? {
                Some(d) => (Some(d), Some(d)),
                None => (
                    parse_optional_date(from.as_ref())?,
                    parse_optional_date(to.as_ref())?,
                ),
            };

            let query = ListQuery {
                user_id: target_user(&mut pool, user.as_ref())?,
                from,
                to,
                status: status.as_deref().map(parse_status).transpose()?,
                page: *page,
                per_page: per_page.unwrap_or(cfg.per_page),
            };

            let regs = RegistrationLogic::list(&mut pool, &ctx, &query)?;
            if *json {
                return print_json(&regs);
            }
            if regs.is_empty() {
                info("No registrations found.");
                return Ok(());
            }
            print_registrations(&regs);
            println!("Page {} ({} rows)", query.page.max(1), regs.len());
        }

        Commands::Team { from, to, json } => {
            let (mut pool, ctx) = session(cfg)?;
            let rows = RegistrationLogic::team(
                &mut pool,
                &ctx,
                parse_optional_date(from.as_ref())?,
                parse_optional_date(to.as_ref())?,
                date::today(),
                cfg.admin_range_days,
            )?;

            if *json {
                return print_json(&rows);
            }
            if rows.is_empty() {
                info("No registrations in this range.");
                return Ok(());
            }
            print_team(&rows);
        }

        Commands::Recent { limit, json } => {
            let (mut pool, ctx) = session(cfg)?;
            let regs = RegistrationLogic::recent(&mut pool, &ctx, limit.unwrap_or(cfg.recent_limit))?;

            if *json {
                return print_json(&regs);
            }
            if regs.is_empty() {
                info("No registrations yet.");
                return Ok(());
            }
            print_registrations(&regs);
        }

        Commands::Approve { id } => {
            let (mut pool, ctx) = session(cfg)?;
            let reg = RegistrationLogic::review(&mut pool, &ctx, *id, RegistrationStatus::Approved)?;
            success(format!("Registration #{} approved ({})", reg.id, reg.describe()));
        }

        Commands::Reject { id } => {
            let (mut pool, ctx) = session(cfg)?;
            let reg = RegistrationLogic::review(&mut pool, &ctx, *id, RegistrationStatus::Rejected)?;
            success(format!("Registration #{} rejected ({})", reg.id, reg.describe()));
        }

        Commands::Del { id, yes } => {
            if !*yes
                && !ask_confirmation(&format!(
                    "Delete registration #{}? This action is irreversible.",
                    id
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let (mut pool, ctx) = session(cfg)?;
            let reg = RegistrationLogic::delete(&mut pool, &ctx, *id)?;
            success(format!("Registration #{} deleted ({})", reg.id, reg.describe()));
        }

        _ => {}
    }

    Ok(())
}
