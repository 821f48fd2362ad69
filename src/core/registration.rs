use crate::auth::{Action, AuthContext, Resource, can, ensure};
use crate::core::validator::{Candidate, find_overlap, total_hours};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::registrations::{
    RegistrationFilter, TeamRow, delete_registration, get_registration, insert_registration,
    list_registrations, list_team_registrations, load_registrations_for_day, set_status,
    update_registration,
};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::registration::TimeRegistration;
use crate::models::status::RegistrationStatus;
use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::Connection;

/// Input of `store`. `user_id = None` means "for myself".
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub user_id: Option<i64>,
    pub date: NaiveDate,
    pub clock_in: NaiveTime,
    pub clock_out: Option<NaiveTime>,
    pub notes: Option<String>,
    pub start: Option<Coordinates>,
}

/// Fields of an edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct RegistrationPatch {
    pub date: Option<NaiveDate>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub notes: Option<String>,
    pub status: Option<RegistrationStatus>,
}

impl RegistrationPatch {
    fn touches_interval(&self) -> bool {
        self.date.is_some() || self.clock_in.is_some() || self.clock_out.is_some()
    }
}

/// Listing parameters. `page` is 1-based.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub user_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<RegistrationStatus>,
    pub page: usize,
    pub per_page: usize,
}

pub struct RegistrationLogic;

/// Clock-out must come after clock-in on the same date.
fn check_order(clock_in: NaiveTime, clock_out: Option<NaiveTime>) -> AppResult<()> {
    if let Some(out) = clock_out
        && out <= clock_in
    {
        return Err(AppError::InvalidInterval(format!(
            "clock-out {} must be later than clock-in {}",
            out.format("%H:%M"),
            clock_in.format("%H:%M")
        )));
    }
    Ok(())
}

/// Fetch the `(user, date)` siblings and run the overlap check.
fn ensure_no_overlap(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
    candidate: &Candidate,
    exclude_id: Option<i64>,
) -> AppResult<()> {
    let siblings = load_registrations_for_day(conn, user_id, date)?;
    match find_overlap(&siblings, candidate, exclude_id) {
        Some(conflict) => Err(AppError::Overlap(Box::new(conflict.clone()))),
        None => Ok(()),
    }
}

/// Only closed registrations can be approved.
fn check_reviewable(reg: &TimeRegistration, status: RegistrationStatus) -> AppResult<()> {
    if reg.is_open() && status == RegistrationStatus::Approved {
        return Err(AppError::OpenRegistration(reg.id));
    }
    Ok(())
}

fn load(conn: &Connection, id: i64) -> AppResult<TimeRegistration> {
    get_registration(conn, id)?.ok_or_else(|| AppError::NotFound(format!("Registration #{}", id)))
}

impl RegistrationLogic {
    /// Record a registration entered by hand (manual entry or on behalf of someone).
    pub fn store(
        pool: &mut DbPool,
        ctx: &AuthContext,
        new: NewRegistration,
    ) -> AppResult<TimeRegistration> {
        let user_id = new.user_id.unwrap_or(ctx.user_id);
        ensure(ctx, Action::CreateRegistration, Resource::Owned(user_id))?;

        check_order(new.clock_in, new.clock_out)?;

        let candidate = Candidate::new(new.clock_in, new.clock_out);
        ensure_no_overlap(&pool.conn, user_id, &new.date, &candidate, None)?;

        let mut reg = TimeRegistration::new(user_id, new.date, new.clock_in, new.clock_out);
        reg.notes = new.notes;
        reg.start = new.start;
        // derived before persisting
        reg.total_hours = total_hours(reg.clock_in, reg.clock_out);
        reg.id = insert_registration(&pool.conn, &reg)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "add",
            &format!("#{}", reg.id),
            &format!("Registration for user {}: {}", user_id, reg.describe()),
        )?;

        Ok(reg)
    }

    /// Edit a registration. Time changes are re-validated against the
    /// other registrations of the same user on the (possibly new) date.
    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        id: i64,
        patch: RegistrationPatch,
    ) -> AppResult<TimeRegistration> {
        let mut reg = load(&pool.conn, id)?;
        ensure(ctx, Action::UpdateRegistration, Resource::Owned(reg.user_id))?;

        let supervisor = can(ctx, Action::ReviewRegistration, Resource::Owned(reg.user_id));

        if patch.status.is_some() && !supervisor {
            return Err(AppError::Forbidden("only managers can change the status".into()));
        }
        if !supervisor && !reg.status.is_pending() {
            return Err(AppError::Forbidden(format!(
                "registration #{} is already {} and can only be corrected by a manager",
                reg.id,
                reg.status.to_db_str()
            )));
        }

        if patch.touches_interval() {
            let date = patch.date.unwrap_or(reg.date);
            let clock_in = patch.clock_in.unwrap_or(reg.clock_in);
            let clock_out = patch.clock_out.or(reg.clock_out);

            check_order(clock_in, clock_out)?;
            ensure_no_overlap(
                &pool.conn,
                reg.user_id,
                &date,
                &Candidate::new(clock_in, clock_out),
                Some(reg.id),
            )?;

            reg.date = date;
            reg.clock_in = clock_in;
            reg.clock_out = clock_out;
            reg.total_hours = total_hours(clock_in, clock_out);
        }

        if let Some(notes) = patch.notes {
            reg.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        }
        if let Some(status) = patch.status {
            check_reviewable(&reg, status)?;
            reg.status = status;
        }

        update_registration(&pool.conn, &reg)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "edit",
            &format!("#{}", reg.id),
            &format!("Registration updated: {}", reg.describe()),
        )?;

        Ok(reg)
    }

    pub fn show(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<TimeRegistration> {
        let reg = load(&pool.conn, id)?;
        ensure(ctx, Action::ViewRegistration, Resource::Owned(reg.user_id))?;
        Ok(reg)
    }

    /// Approve or reject a closed registration.
    pub fn review(
        pool: &mut DbPool,
        ctx: &AuthContext,
        id: i64,
        status: RegistrationStatus,
    ) -> AppResult<TimeRegistration> {
        let mut reg = load(&pool.conn, id)?;
        ensure(ctx, Action::ReviewRegistration, Resource::Owned(reg.user_id))?;

        check_reviewable(&reg, status)?;

        set_status(&pool.conn, reg.id, status)?;
        reg.status = status;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            status.to_db_str(),
            &format!("#{}", reg.id),
            &format!("Registration {} marked {}", reg.describe(), status.to_db_str()),
        )?;

        Ok(reg)
    }

    pub fn delete(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<TimeRegistration> {
        let reg = load(&pool.conn, id)?;
        ensure(ctx, Action::DeleteRegistration, Resource::Owned(reg.user_id))?;

        delete_registration(&pool.conn, reg.id)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "del",
            &format!("#{}", reg.id),
            &format!("Registration deleted: {}", reg.describe()),
        )?;

        Ok(reg)
    }

    /// Paginated listing, newest first. Employees only ever see their own rows.
    pub fn list(
        pool: &mut DbPool,
        ctx: &AuthContext,
        query: &ListQuery,
    ) -> AppResult<Vec<TimeRegistration>> {
        let user_id = match query.user_id {
            Some(uid) => {
                ensure(ctx, Action::ViewRegistration, Resource::Owned(uid))?;
                Some(uid)
            }
            None if can(ctx, Action::ViewTeam, Resource::Global) => None,
            None => Some(ctx.user_id),
        };

        let per_page = query.per_page.max(1);
        let offset = query
            .page
            .saturating_sub(1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::Other(format!("page {} is out of range", query.page)))?;
        let filter = RegistrationFilter {
            user_id,
            from: query.from,
            to: query.to,
            status: query.status,
            limit: Some(per_page),
            offset,
        };

        list_registrations(&pool.conn, &filter)
    }

    /// The acting user's last `limit` registrations.
    pub fn recent(
        pool: &mut DbPool,
        ctx: &AuthContext,
        limit: usize,
    ) -> AppResult<Vec<TimeRegistration>> {
        let filter = RegistrationFilter {
            user_id: Some(ctx.user_id),
            limit: Some(limit),
            ..Default::default()
        };
        list_registrations(&pool.conn, &filter)
    }

    /// Supervisor overview across all users. Without an explicit start it
    /// covers the last `range_days` days, `to` included.
    pub fn team(
        pool: &mut DbPool,
        ctx: &AuthContext,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
        range_days: i64,
    ) -> AppResult<Vec<TeamRow>> {
        ensure(ctx, Action::ViewTeam, Resource::Global)?;

        if range_days < 1 {
            return Err(AppError::InvalidDate(format!(
                "range of {} days is empty",
                range_days
            )));
        }
        let to = to.unwrap_or(today);
        let from = from.unwrap_or(to - Duration::days(range_days - 1));
        if from > to {
            return Err(AppError::InvalidDate(format!(
                "range start {} is after range end {}",
                from, to
            )));
        }

        let filter = RegistrationFilter {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        };
        list_team_registrations(&pool.conn, &filter)
    }
}
