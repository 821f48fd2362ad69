use super::{print_json, session, target_user};
use crate::cli::parser::{Commands, ScheduleAction};
use crate::config::Config;
use crate::core::schedule::{SchedulePatch, ScheduleLogic, plan_schedule, plan_weekly};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Recurrence, Schedule};
use crate::ui::messages::{header, info, success};
use crate::utils::date::{self, parse_optional_date, parse_weekdays, week_bounds};
use crate::utils::table::{Column, Table};
use crate::utils::time::{parse_optional_time, parse_required_time};

fn required_date(s: &str) -> AppResult<chrono::NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

fn parse_recurrence(input: Option<&String>) -> AppResult<Option<Recurrence>> {
    input
        .map(|r| {
            Recurrence::from_db_str(&r.trim().to_lowercase())
                .ok_or_else(|| AppError::InvalidRecurrence(r.to_string()))
        })
        .transpose()
}

fn print_schedules(schedules: &[Schedule]) {
    if schedules.is_empty() {
        info("No shifts planned.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("USER", 5),
        Column::new("DATE", 10),
        Column::new("DAY", 3),
        Column::new("START", 5),
        Column::new("END", 5),
        Column::new("HOURS", 6),
        Column::new("LOC", 4),
        Column::new("REPEAT", 8),
    ]);

    for s in schedules {
        table.add_row(vec![
            s.id.to_string(),
            s.user_id.to_string(),
            s.date.to_string(),
            s.date.format("%a").to_string(),
            s.start_time.format("%H:%M").to_string(),
            s.end_time.format("%H:%M").to_string(),
            format!("{:.2}", s.total_hours),
            s.location_id.map(|l| l.to_string()).unwrap_or_default(),
            match s.recurrence {
                Some(r) if s.is_recurring() => r.to_db_str().to_string(),
                _ => "once".to_string(),
            },
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Schedule { action } = cmd else {
        return Ok(());
    };

    match action {
        ScheduleAction::Add {
            user,
            date: date_str,
            start,
            end,
            location,
            recurrence,
        } => {
            let d = required_date(date_str)?;
            let start = parse_required_time(start)?;
            let end = parse_required_time(end)?;
            let recurrence = parse_recurrence(recurrence.as_ref())?;

            let (mut pool, ctx) = session(cfg)?;
            let user_id = target_user(&mut pool, user.as_ref())?.unwrap_or(ctx.user_id);

            let planned = plan_schedule(user_id, d, start, end, *location, recurrence)?;
            let s = ScheduleLogic::add(&mut pool, &ctx, planned)?;
            success(format!(
                "Shift #{} planned on {} {}-{} ({:.2} h)",
                s.id,
                s.date,
                s.start_time.format("%H:%M"),
                s.end_time.format("%H:%M"),
                s.total_hours
            ));
        }

        ScheduleAction::List {
            user,
            from,
            to,
            json,
        } => {
            let (monday, sunday) = week_bounds(date::today());
            let from = parse_optional_date(from.as_ref())?.unwrap_or(monday);
            let to = parse_optional_date(to.as_ref())?.unwrap_or(sunday);

            let (mut pool, ctx) = session(cfg)?;
            let user_id = target_user(&mut pool, user.as_ref())?;
            let schedules = ScheduleLogic::list(&mut pool, &ctx, user_id, from, to)?;

            if *json {
                return print_json(&schedules);
            }
            print_schedules(&schedules);
        }

        ScheduleAction::Week { at, json } => {
            let today = parse_optional_date(at.as_ref())?.unwrap_or_else(date::today);
            let (mut pool, ctx) = session(cfg)?;
            let schedules = ScheduleLogic::current_week(&mut pool, &ctx, today)?;

            if *json {
                return print_json(&schedules);
            }
            let (monday, sunday) = week_bounds(today);
            header(format!("Week {} - {}", monday, sunday));
            print_schedules(&schedules);
        }

        ScheduleAction::Edit {
            id,
            user,
            date: date_str,
            start,
            end,
            location,
            recurrence,
        } => {
            let mut patch = SchedulePatch {
                date: parse_optional_date(date_str.as_ref())?,
                start_time: parse_optional_time(start.as_ref())?,
                end_time: parse_optional_time(end.as_ref())?,
                location_id: *location,
                recurrence: parse_recurrence(recurrence.as_ref())?,
                ..Default::default()
            };

            let (mut pool, ctx) = session(cfg)?;
            patch.user_id = target_user(&mut pool, user.as_ref())?;

            let s = ScheduleLogic::update(&mut pool, &ctx, *id, patch)?;
            success(format!(
                "Shift #{} now on {} {}-{} ({:.2} h)",
                s.id,
                s.date,
                s.start_time.format("%H:%M"),
                s.end_time.format("%H:%M"),
                s.total_hours
            ));
        }

        ScheduleAction::Del { id } => {
            let (mut pool, ctx) = session(cfg)?;
            let s = ScheduleLogic::delete(&mut pool, &ctx, *id)?;
            success(format!("Shift #{} on {} deleted", s.id, s.date));
        }

        ScheduleAction::Generate {
            user,
            from,
            to,
            days,
            start,
            end,
            location,
        } => {
            let from = required_date(from)?;
            let to = required_date(to)?;
            let weekdays = parse_weekdays(days)?;
            let start = parse_required_time(start)?;
            let end = parse_required_time(end)?;

            let (mut pool, ctx) = session(cfg)?;
            let user_id = target_user(&mut pool, user.as_ref())?.unwrap_or(ctx.user_id);

            let planned = plan_weekly(user_id, from, to, &weekdays, start, end, *location)?;
            if planned.is_empty() {
                info("No matching days in the given range.");
                return Ok(());
            }

            let saved = ScheduleLogic::add_many(&mut pool, &ctx, planned)?;
            success(format!(
                "{} weekly shifts planned between {} and {}",
                saved.len(),
                from,
                to
            ));
        }
    }

    Ok(())
}
