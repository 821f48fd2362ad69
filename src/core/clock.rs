use crate::auth::{Action, AuthContext, Resource, ensure};
use crate::core::validator::{Candidate, compute_duration, find_overlap, total_hours};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::registrations::{
    find_open_registration, insert_registration, load_registrations_for_day, update_registration,
};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::registration::TimeRegistration;
use crate::utils::formatting::elapsed_label;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Clock-in / clock-out flow for the acting user.
pub struct ClockLogic;

/// Snapshot returned by `status`.
#[derive(Debug, Clone, Serialize)]
pub struct ClockStatus {
    pub clocked_in: bool,
    pub clock_in_time: Option<String>,
    pub elapsed: Option<String>,
    pub registration: Option<TimeRegistration>,
}

impl ClockLogic {
    /// Open a new registration at `now`.
    pub fn clock_in(
        pool: &mut DbPool,
        ctx: &AuthContext,
        now: NaiveDateTime,
        coordinates: Option<Coordinates>,
    ) -> AppResult<TimeRegistration> {
        ensure(ctx, Action::ClockIn, Resource::Owned(ctx.user_id))?;

        let date = now.date();
        let time = now.time();

        if let Some(active) = find_open_registration(&pool.conn, ctx.user_id, &date)? {
            return Err(AppError::AlreadyClockedIn(active.clock_in_str()));
        }

        // The clock-in instant must not fall inside an already closed registration
        let siblings = load_registrations_for_day(&pool.conn, ctx.user_id, &date)?;
        if let Some(conflict) = find_overlap(&siblings, &Candidate::open(time), None) {
            return Err(AppError::Overlap(Box::new(conflict.clone())));
        }

        let mut reg = TimeRegistration::new(ctx.user_id, date, time, None);
        reg.start = coordinates;
        reg.id = insert_registration(&pool.conn, &reg)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "clock_in",
            &format!("#{}", reg.id),
            &format!("Clocked in on {} at {}", reg.date_str(), reg.clock_in_str()),
        )?;

        Ok(reg)
    }

    /// Close today's open registration at `now` and store its duration.
    pub fn clock_out(
        pool: &mut DbPool,
        ctx: &AuthContext,
        now: NaiveDateTime,
        coordinates: Option<Coordinates>,
    ) -> AppResult<TimeRegistration> {
        ensure(ctx, Action::ClockIn, Resource::Owned(ctx.user_id))?;

        let date = now.date();
        let time = now.time();

        let mut reg = find_open_registration(&pool.conn, ctx.user_id, &date)?
            .ok_or_else(|| AppError::NoActiveClockIn(date.to_string()))?;

        if time < reg.clock_in {
            return Err(AppError::InvalidInterval(format!(
                "clock-out {} is before clock-in {}",
                time.format("%H:%M"),
                reg.clock_in_str()
            )));
        }

        let siblings = load_registrations_for_day(&pool.conn, ctx.user_id, &date)?;
        if let Some(conflict) =
            find_overlap(&siblings, &Candidate::closed(reg.clock_in, time), Some(reg.id))
        {
            return Err(AppError::Overlap(Box::new(conflict.clone())));
        }

        reg.clock_out = Some(time);
        reg.end = coordinates;
        reg.total_hours = total_hours(reg.clock_in, reg.clock_out);
        update_registration(&pool.conn, &reg)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "clock_out",
            &format!("#{}", reg.id),
            &format!(
                "Clocked out on {} at {} ({} h)",
                reg.date_str(),
                reg.clock_out_str(),
                reg.total_hours.unwrap_or_default()
            ),
        )?;

        Ok(reg)
    }

    /// Is the user on the clock today, and for how long.
    pub fn status(pool: &mut DbPool, ctx: &AuthContext, now: NaiveDateTime) -> AppResult<ClockStatus> {
        let active = find_open_registration(&pool.conn, ctx.user_id, &now.date())?;

        let status = match active {
            Some(reg) => ClockStatus {
                clocked_in: true,
                clock_in_time: Some(reg.clock_in.format("%H:%M:%S").to_string()),
                elapsed: (now.time() >= reg.clock_in)
                    .then(|| compute_duration(reg.clock_in, Some(now.time())))
                    .flatten()
                    .map(elapsed_label),
                registration: Some(reg),
            },
            None => ClockStatus {
                clocked_in: false,
                clock_in_time: None,
                elapsed: None,
                registration: None,
            },
        };

        Ok(status)
    }
}
