use crate::auth::{Action, AuthContext, Resource, can, ensure};
use crate::core::validator::{compute_duration, minutes_to_hours};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::locations::get_location;
use crate::db::queries::schedules::{
    delete_schedule, get_schedule, insert_schedule, list_schedules, update_schedule,
};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Recurrence, Schedule};
use crate::utils::date::{days_between, week_bounds};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

pub struct ScheduleLogic;

/// Fields of a shift edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location_id: Option<i64>,
    pub recurrence: Option<Recurrence>,
}

/// Build an unsaved schedule with `total_hours` already filled in.
pub fn plan_schedule(
    user_id: i64,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    location_id: Option<i64>,
    recurrence: Option<Recurrence>,
) -> AppResult<Schedule> {
    if end_time <= start_time {
        return Err(AppError::InvalidInterval(format!(
            "shift end {} must be later than start {}",
            end_time.format("%H:%M"),
            start_time.format("%H:%M")
        )));
    }

    let minutes = compute_duration(start_time, Some(end_time)).unwrap_or_default();

    Ok(Schedule {
        id: 0,
        user_id,
        date,
        start_time,
        end_time,
        total_hours: minutes_to_hours(minutes),
        location_id,
        recurrence,
    })
}

/// One weekly schedule for every day in `[from, to]` whose weekday is listed.
pub fn plan_weekly(
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
    weekdays: &[Weekday],
    start_time: NaiveTime,
    end_time: NaiveTime,
    location_id: Option<i64>,
) -> AppResult<Vec<Schedule>> {
    if to <= from {
        return Err(AppError::InvalidDate(format!(
            "end date {} must be after start date {}",
            to, from
        )));
    }

    days_between(from, to)
        .filter(|d| weekdays.contains(&d.weekday()))
        .map(|d| {
            plan_schedule(
                user_id,
                d,
                start_time,
                end_time,
                location_id,
                Some(Recurrence::Weekly),
            )
        })
        .collect()
}

fn ensure_location(pool: &DbPool, location_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = location_id
        && get_location(&pool.conn, id)?.is_none()
    {
        return Err(AppError::NotFound(format!("Location #{}", id)));
    }
    Ok(())
}

impl ScheduleLogic {
    pub fn add(pool: &mut DbPool, ctx: &AuthContext, planned: Schedule) -> AppResult<Schedule> {
        ensure(ctx, Action::ManageSchedules, Resource::Owned(planned.user_id))?;
        ensure_location(pool, planned.location_id)?;

        let mut schedule = planned;
        schedule.id = insert_schedule(&pool.conn, &schedule)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "schedule_add",
            &format!("#{}", schedule.id),
            &format!(
                "Shift for user {} on {} ({} h)",
                schedule.user_id, schedule.date, schedule.total_hours
            ),
        )?;

        Ok(schedule)
    }

    /// Insert every planned schedule in one transaction.
    pub fn add_many(
        pool: &mut DbPool,
        ctx: &AuthContext,
        planned: Vec<Schedule>,
    ) -> AppResult<Vec<Schedule>> {
        for s in &planned {
            ensure(ctx, Action::ManageSchedules, Resource::Owned(s.user_id))?;
            ensure_location(pool, s.location_id)?;
        }

        let tx = pool.conn.transaction()?;
        let mut saved = Vec::with_capacity(planned.len());
        for mut s in planned {
            s.id = insert_schedule(&tx, &s)?;
            saved.push(s);
        }
        tx.commit()?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "schedule_generate",
            "",
            &format!("{} schedules created", saved.len()),
        )?;

        Ok(saved)
    }

    /// Schedules in `[from, to]`. `user_id = None` lists the acting user,
    /// or every user when the actor supervises.
    pub fn list(
        pool: &mut DbPool,
        ctx: &AuthContext,
        user_id: Option<i64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Schedule>> {
        let target = match user_id {
            Some(uid) => {
                ensure(ctx, Action::ViewSchedule, Resource::Owned(uid))?;
                Some(uid)
            }
            None if can(ctx, Action::ViewTeam, Resource::Global) => None,
            None => Some(ctx.user_id),
        };

        list_schedules(&pool.conn, target, &from, &to)
    }

    /// The acting user's own shifts from Monday to Sunday of `today`'s week.
    pub fn current_week(
        pool: &mut DbPool,
        ctx: &AuthContext,
        today: NaiveDate,
    ) -> AppResult<Vec<Schedule>> {
        let (monday, sunday) = week_bounds(today);
        list_schedules(&pool.conn, Some(ctx.user_id), &monday, &sunday)
    }

    /// Edit a shift. The merged shift goes through `plan_schedule` again, so
    /// the time order is re-checked and `total_hours` recomputed.
    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        id: i64,
        patch: SchedulePatch,
    ) -> AppResult<Schedule> {
        let current = get_schedule(&pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("Schedule #{}", id)))?;
        ensure(ctx, Action::ManageSchedules, Resource::Owned(current.user_id))?;

        let user_id = patch.user_id.unwrap_or(current.user_id);
        if user_id != current.user_id {
            ensure(ctx, Action::ManageSchedules, Resource::Owned(user_id))?;
        }

        let mut schedule = plan_schedule(
            user_id,
            patch.date.unwrap_or(current.date),
            patch.start_time.unwrap_or(current.start_time),
            patch.end_time.unwrap_or(current.end_time),
            patch.location_id.or(current.location_id),
            patch.recurrence.or(current.recurrence),
        )?;
        schedule.id = current.id;
        ensure_location(pool, schedule.location_id)?;

        update_schedule(&pool.conn, &schedule)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "schedule_edit",
            &format!("#{}", id),
            &format!(
                "Shift for user {} on {} ({} h)",
                schedule.user_id, schedule.date, schedule.total_hours
            ),
        )?;

        Ok(schedule)
    }

    pub fn delete(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<Schedule> {
        let schedule = get_schedule(&pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("Schedule #{}", id)))?;
        ensure(ctx, Action::ManageSchedules, Resource::Owned(schedule.user_id))?;

        delete_schedule(&pool.conn, id)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "schedule_del",
            &format!("#{}", id),
            &format!("Shift on {} deleted", schedule.date),
        )?;

        Ok(schedule)
    }
}
