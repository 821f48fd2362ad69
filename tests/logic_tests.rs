mod common;
use common::{add_user, d, memory_pool, t};

use chrono::{NaiveDateTime, Weekday};
use timereg::core::clock::ClockLogic;
use timereg::core::location::LocationLogic;
use timereg::core::registration::{ListQuery, NewRegistration, RegistrationLogic, RegistrationPatch};
use timereg::config::Config;
use timereg::core::overtime::{NewOvertimeRule, OvertimeLogic, OvertimeRulePatch};
use timereg::core::schedule::{SchedulePatch, ScheduleLogic, plan_schedule, plan_weekly};
use timereg::core::settings::{SettingsLogic, SettingsPatch};
use timereg::core::user::UserLogic;
use timereg::errors::AppError;
use timereg::models::coordinates::Coordinates;
use timereg::models::overtime::OvertimeType;
use timereg::models::schedule::Recurrence;
use timereg::models::settings::{DefaultView, TimeFormat, UserSettings};
use timereg::models::role::Role;
use timereg::models::status::RegistrationStatus;
use timereg::utils::date::{parse_weekdays, week_bounds};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid datetime")
}

fn manual(date: &str, clock_in: &str, clock_out: Option<&str>) -> NewRegistration {
    NewRegistration {
        user_id: None,
        date: d(date),
        clock_in: t(clock_in),
        clock_out: clock_out.map(t),
        notes: None,
        start: None,
    }
}

#[test]
fn clock_in_then_out_computes_hours() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let opened = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), None).unwrap();
    assert!(opened.is_open());
    assert_eq!(opened.status, RegistrationStatus::Pending);

    let status = ClockLogic::status(&mut pool, &emp, at("2025-03-10 11:30")).unwrap();
    assert!(status.clocked_in);
    assert_eq!(status.elapsed.as_deref(), Some("2h 30m"));

    let closed = ClockLogic::clock_out(&mut pool, &emp, at("2025-03-10 17:00"), None).unwrap();
    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.clock_out, Some(t("17:00")));
    assert_eq!(closed.total_hours, Some(8.0));

    let status = ClockLogic::status(&mut pool, &emp, at("2025-03-10 17:05")).unwrap();
    assert!(!status.clocked_in);
}

#[test]
fn status_before_the_clock_in_time_has_no_elapsed() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), None).unwrap();

    let status = ClockLogic::status(&mut pool, &emp, at("2025-03-10 08:00")).unwrap();
    assert!(status.clocked_in);
    assert_eq!(status.elapsed, None);

    let status = ClockLogic::status(&mut pool, &emp, at("2025-03-10 09:00")).unwrap();
    assert_eq!(status.elapsed.as_deref(), Some("0h 0m"));
}

#[test]
fn double_clock_in_is_rejected() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), None).unwrap();
    let err = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 10:00"), None).unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn(_)));
}

#[test]
fn clock_out_without_clock_in_is_rejected() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let err = ClockLogic::clock_out(&mut pool, &emp, at("2025-03-10 17:00"), None).unwrap_err();
    assert!(matches!(err, AppError::NoActiveClockIn(_)));
}

#[test]
fn clock_in_inside_a_closed_registration_is_rejected() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let first = RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "08:00", Some("12:00")))
        .unwrap();
    let err = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 11:00"), None).unwrap_err();
    match err {
        AppError::Overlap(conflict) => assert_eq!(conflict.id, first.id),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn clock_in_keeps_given_coordinates() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let pos = Coordinates::new(45.4642, 9.19).unwrap();

    let reg = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), Some(pos)).unwrap();
    let stored = RegistrationLogic::show(&mut pool, &emp, reg.id).unwrap();
    assert_eq!(stored.start, Some(pos));
    assert_eq!(stored.end, None);
}

#[test]
fn store_rejects_reversed_interval_and_overlap() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let err = RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "17:00", Some("09:00")))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInterval(_)));

    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "09:00", Some("12:00"))).unwrap();
    let err = RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "12:00", Some("13:00")))
        .unwrap_err();
    assert!(matches!(err, AppError::Overlap(_)));

    // another day is a different partition
    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-11", "09:00", Some("12:00"))).unwrap();
}

#[test]
fn users_do_not_conflict_with_each_other() {
    let mut pool = memory_pool();
    let a = add_user(&pool, "a", Role::Employee);
    let b = add_user(&pool, "b", Role::Employee);

    RegistrationLogic::store(&mut pool, &a, manual("2025-03-10", "09:00", Some("17:00"))).unwrap();
    RegistrationLogic::store(&mut pool, &b, manual("2025-03-10", "09:00", Some("17:00"))).unwrap();
}

#[test]
fn edit_revalidates_against_siblings_but_not_itself() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let morning =
        RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "09:00", Some("12:00"))).unwrap();
    let afternoon =
        RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "13:00", Some("17:00"))).unwrap();

    // shrinking inside its own range is fine
    let edited = RegistrationLogic::update(
        &mut pool,
        &emp,
        morning.id,
        RegistrationPatch {
            clock_out: Some(t("11:00")),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(edited.total_hours, Some(2.0));

    // stretching into the afternoon is not
    let err = RegistrationLogic::update(
        &mut pool,
        &emp,
        morning.id,
        RegistrationPatch {
            clock_out: Some(t("14:00")),
            ..Default::default()
        },
    )
    .unwrap_err();
    match err {
        AppError::Overlap(conflict) => assert_eq!(conflict.id, afternoon.id),
        other => panic!("unexpected error: {other}"),
    }

    // moving it to another day clears the conflict
    let moved = RegistrationLogic::update(
        &mut pool,
        &emp,
        morning.id,
        RegistrationPatch {
            date: Some(d("2025-03-11")),
            clock_out: Some(t("14:00")),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(moved.date, d("2025-03-11"));
    assert_eq!(moved.total_hours, Some(5.0));
}

#[test]
fn employees_cannot_review_or_touch_others() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let other = add_user(&pool, "other", Role::Employee);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    let reg =
        RegistrationLogic::store(&mut pool, &emp, manual("2025-03-10", "09:00", Some("17:00"))).unwrap();

    let err = RegistrationLogic::review(&mut pool, &emp, reg.id, RegistrationStatus::Approved).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = RegistrationLogic::show(&mut pool, &other, reg.id).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let approved =
        RegistrationLogic::review(&mut pool, &mgr, reg.id, RegistrationStatus::Approved).unwrap();
    assert_eq!(approved.status, RegistrationStatus::Approved);

    // once approved the owner cannot change it anymore
    let err = RegistrationLogic::update(
        &mut pool,
        &emp,
        reg.id,
        RegistrationPatch {
            notes: Some("late".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn open_registrations_cannot_be_approved() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    let open = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), None).unwrap();
    let err = RegistrationLogic::review(&mut pool, &mgr, open.id, RegistrationStatus::Approved).unwrap_err();
    assert!(matches!(err, AppError::OpenRegistration(id) if id == open.id));

    let rejected =
        RegistrationLogic::review(&mut pool, &mgr, open.id, RegistrationStatus::Rejected).unwrap();
    assert_eq!(rejected.status, RegistrationStatus::Rejected);
}

#[test]
fn editing_the_status_cannot_approve_an_open_registration() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    let open = ClockLogic::clock_in(&mut pool, &emp, at("2025-03-10 09:00"), None).unwrap();
    let err = RegistrationLogic::update(
        &mut pool,
        &mgr,
        open.id,
        RegistrationPatch {
            status: Some(RegistrationStatus::Approved),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::OpenRegistration(id) if id == open.id));
    let stored = RegistrationLogic::show(&mut pool, &mgr, open.id).unwrap();
    assert_eq!(stored.status, RegistrationStatus::Pending);

    // closing it in the same edit makes it approvable
    let approved = RegistrationLogic::update(
        &mut pool,
        &mgr,
        open.id,
        RegistrationPatch {
            clock_out: Some(t("12:00")),
            status: Some(RegistrationStatus::Approved),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(approved.status, RegistrationStatus::Approved);
    assert_eq!(approved.total_hours, Some(3.0));
}

#[test]
fn list_is_scoped_and_paginated() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let other = add_user(&pool, "other", Role::Employee);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    for day in 1..=5 {
        let date = format!("2025-03-0{}", day);
        RegistrationLogic::store(&mut pool, &emp, manual(&date, "09:00", Some("17:00"))).unwrap();
    }
    RegistrationLogic::store(&mut pool, &other, manual("2025-03-01", "09:00", Some("17:00"))).unwrap();

    let mine = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: 1,
            per_page: 15,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(mine.len(), 5);
    assert!(mine.iter().all(|r| r.user_id == emp.user_id));
    assert_eq!(mine[0].date, d("2025-03-05"));

    let page2 = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: 2,
            per_page: 2,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        page2.iter().map(|r| r.date).collect::<Vec<_>>(),
        vec![d("2025-03-03"), d("2025-03-02")]
    );

    let everyone = RegistrationLogic::list(
        &mut pool,
        &mgr,
        &ListQuery {
            page: 1,
            per_page: 15,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(everyone.len(), 6);

    let err = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            user_id: Some(other.user_id),
            page: 1,
            per_page: 15,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let recent = RegistrationLogic::recent(&mut pool, &emp, 3).unwrap();
    assert_eq!(recent.len(), 3);
}

#[test]
fn page_zero_is_the_first_page_and_huge_pages_fail() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    for day in 1..=3 {
        let date = format!("2025-03-0{}", day);
        RegistrationLogic::store(&mut pool, &emp, manual(&date, "09:00", Some("17:00"))).unwrap();
    }

    let first = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: 0,
            per_page: 2,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        first.iter().map(|r| r.date).collect::<Vec<_>>(),
        vec![d("2025-03-03"), d("2025-03-02")]
    );

    let past_the_end = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: 3,
            per_page: 2,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(past_the_end.is_empty());

    let err = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: usize::MAX,
            per_page: 2,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));

    let err = RegistrationLogic::list(
        &mut pool,
        &emp,
        &ListQuery {
            page: 1,
            per_page: usize::MAX,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));
}

#[test]
fn team_defaults_to_the_last_days() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-01", "09:00", Some("17:00"))).unwrap();
    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-03", "09:00", Some("17:00"))).unwrap();
    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-04", "09:00", Some("17:00"))).unwrap();
    RegistrationLogic::store(&mut pool, &emp, manual("2025-03-09", "09:00", Some("17:00"))).unwrap();

    // 7 days ending on the 10th: the 4th through the 10th
    let rows = RegistrationLogic::team(&mut pool, &mgr, None, None, d("2025-03-10"), 7).unwrap();
    assert_eq!(
        rows.iter().map(|r| r.registration.date).collect::<Vec<_>>(),
        vec![d("2025-03-09"), d("2025-03-04")]
    );
    assert!(rows.iter().all(|r| r.personal_id == "emp"));

    let today_only = RegistrationLogic::team(&mut pool, &mgr, None, None, d("2025-03-09"), 1).unwrap();
    assert_eq!(today_only.len(), 1);

    for range_days in [0, -3] {
        let err = RegistrationLogic::team(&mut pool, &mgr, None, None, d("2025-03-10"), range_days)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    let err = RegistrationLogic::team(&mut pool, &emp, None, None, d("2025-03-10"), 7).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn second_open_registration_is_blocked_by_the_schema() {
    let pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);

    let insert = |clock_in: &str| {
        pool.conn.execute(
            "INSERT INTO time_registrations (user_id, date, clock_in, status, created_at, updated_at)
             VALUES (?1, '2025-03-10', ?2, 'pending', 'now', 'now')",
            rusqlite::params![emp.user_id, clock_in],
        )
    };

    assert!(insert("09:00:00").is_ok());
    assert!(insert("10:00:00").is_err());
}

#[test]
fn first_user_is_bootstrapped_as_admin() {
    let mut pool = memory_pool();

    let first = UserLogic::add(&mut pool, None, "Ada", "ada@example.com", "ada", Role::Employee).unwrap();
    assert_eq!(first.role, Role::Admin);

    let err = UserLogic::add(&mut pool, None, "Bob", "bob@example.com", "bob", Role::Employee).unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));

    let admin = timereg::auth::AuthContext::for_user(&first);
    let bob = UserLogic::add(&mut pool, Some(&admin), "Bob", "bob@example.com", "bob", Role::Employee)
        .unwrap();
    assert_eq!(bob.role, Role::Employee);

    let err = UserLogic::delete(&mut pool, &admin, "ada").unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn nearby_filters_by_radius_and_sorts_by_distance() {
    let mut pool = memory_pool();
    let admin = add_user(&pool, "adm", Role::Admin);

    let duomo = Coordinates::new(45.4642, 9.1900).unwrap();
    let castello = Coordinates::new(45.4705, 9.1795).unwrap();
    let bergamo = Coordinates::new(45.6983, 9.6773).unwrap();

    LocationLogic::add(&mut pool, &admin, "Castello", None, Some(castello)).unwrap();
    LocationLogic::add(&mut pool, &admin, "Bergamo", None, Some(bergamo)).unwrap();
    LocationLogic::add(&mut pool, &admin, "Duomo", Some("Piazza del Duomo"), Some(duomo)).unwrap();
    LocationLogic::add(&mut pool, &admin, "Nowhere", None, None).unwrap();

    let found = LocationLogic::nearby(&mut pool, duomo, 5.0).unwrap();
    let names: Vec<&str> = found.iter().map(|n| n.location.name.as_str()).collect();
    assert_eq!(names, vec!["Duomo", "Castello"]);
    assert!(found[0].distance_km < 0.001);

    let wide = LocationLogic::nearby(&mut pool, duomo, 50.0).unwrap();
    assert_eq!(wide.len(), 3);

    assert!(matches!(
        LocationLogic::nearby(&mut pool, duomo, 0.05),
        Err(AppError::InvalidRadius(_))
    ));
    assert!(matches!(
        LocationLogic::nearby(&mut pool, duomo, 51.0),
        Err(AppError::InvalidRadius(_))
    ));
}

#[test]
fn managers_cannot_delete_locations() {
    let mut pool = memory_pool();
    let mgr = add_user(&pool, "mgr", Role::Manager);
    let admin = add_user(&pool, "adm", Role::Admin);

    let loc = LocationLogic::add(&mut pool, &mgr, "Office", None, None).unwrap();
    assert!(matches!(
        LocationLogic::delete(&mut pool, &mgr, loc.id),
        Err(AppError::Forbidden(_))
    ));
    LocationLogic::delete(&mut pool, &admin, loc.id).unwrap();
    assert!(LocationLogic::list(&mut pool).unwrap().is_empty());
}

#[test]
fn location_names_cannot_be_blanked() {
    let mut pool = memory_pool();
    let mgr = add_user(&pool, "mgr", Role::Manager);

    let loc = LocationLogic::add(&mut pool, &mgr, "Office", Some("Via Roma 1"), None).unwrap();
    for blank in ["", "   "] {
        let err = LocationLogic::update(&mut pool, &mgr, loc.id, Some(blank), None, None).unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
    }
    assert_eq!(LocationLogic::list(&mut pool).unwrap()[0].name, "Office");

    let renamed =
        LocationLogic::update(&mut pool, &mgr, loc.id, Some("  Head office "), None, None).unwrap();
    assert_eq!(renamed.name, "Head office");
    assert_eq!(renamed.address.as_deref(), Some("Via Roma 1"));
}

#[test]
fn coordinates_are_validated() {
    assert!(Coordinates::new(91.0, 0.0).is_err());
    assert!(Coordinates::new(0.0, -181.0).is_err());
    assert!(Coordinates::from_pair(Some(45.0), None).is_err());
    assert_eq!(Coordinates::from_pair(None, None).unwrap(), None);
}

#[test]
fn plan_schedule_computes_hours_before_saving() {
    let s = plan_schedule(1, d("2025-03-10"), t("09:00"), t("13:30"), None, None).unwrap();
    assert_eq!(s.id, 0);
    assert_eq!(s.total_hours, 4.5);

    assert!(matches!(
        plan_schedule(1, d("2025-03-10"), t("13:00"), t("09:00"), None, None),
        Err(AppError::InvalidInterval(_))
    ));
}

#[test]
fn plan_weekly_picks_matching_days() {
    // 2025-03-03 is a Monday
    let days = parse_weekdays("mon,wed,fri").unwrap();
    let planned = plan_weekly(1, d("2025-03-03"), d("2025-03-16"), &days, t("09:00"), t("17:00"), None)
        .unwrap();

    let dates: Vec<_> = planned.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![
            d("2025-03-03"),
            d("2025-03-05"),
            d("2025-03-07"),
            d("2025-03-10"),
            d("2025-03-12"),
            d("2025-03-14"),
        ]
    );
    assert!(planned.iter().all(|s| s.is_recurring() && s.total_hours == 8.0));

    assert!(plan_weekly(1, d("2025-03-10"), d("2025-03-10"), &[Weekday::Mon], t("09:00"), t("17:00"), None).is_err());
}

#[test]
fn weekday_parsing() {
    assert_eq!(parse_weekdays("1,7").unwrap(), vec![Weekday::Mon, Weekday::Sun]);
    assert_eq!(parse_weekdays("Tue,tuesday").unwrap(), vec![Weekday::Tue]);
    assert!(parse_weekdays("funday").is_err());
    assert!(parse_weekdays("").is_err());
}

#[test]
fn schedules_for_the_current_week() {
    let mut pool = memory_pool();
    let mgr = add_user(&pool, "mgr", Role::Manager);
    let emp = add_user(&pool, "emp", Role::Employee);

    let planned = plan_weekly(
        emp.user_id,
        d("2025-03-03"),
        d("2025-03-16"),
        &[Weekday::Tue, Weekday::Thu],
        t("08:00"),
        t("12:00"),
        None,
    )
    .unwrap();
    assert!(matches!(
        ScheduleLogic::add_many(&mut pool, &emp, planned.clone()),
        Err(AppError::Forbidden(_))
    ));
    let saved = ScheduleLogic::add_many(&mut pool, &mgr, planned).unwrap();
    assert_eq!(saved.len(), 4);

    let (monday, sunday) = week_bounds(d("2025-03-13"));
    assert_eq!((monday, sunday), (d("2025-03-10"), d("2025-03-16")));

    let week = ScheduleLogic::current_week(&mut pool, &emp, d("2025-03-13")).unwrap();
    let dates: Vec<_> = week.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![d("2025-03-11"), d("2025-03-13")]);

    let err = ScheduleLogic::list(&mut pool, &emp, Some(mgr.user_id), monday, sunday).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn editing_a_shift_recomputes_its_hours() {
    let mut pool = memory_pool();
    let mgr = add_user(&pool, "mgr", Role::Manager);
    let emp = add_user(&pool, "emp", Role::Employee);
    let other = add_user(&pool, "other", Role::Employee);

    let planned = plan_schedule(emp.user_id, d("2025-03-10"), t("09:00"), t("17:00"), None, None).unwrap();
    let shift = ScheduleLogic::add(&mut pool, &mgr, planned).unwrap();
    assert_eq!(shift.total_hours, 8.0);

    let moved = ScheduleLogic::update(
        &mut pool,
        &mgr,
        shift.id,
        SchedulePatch {
            user_id: Some(other.user_id),
            end_time: Some(t("12:30")),
            recurrence: Some(Recurrence::Weekly),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(moved.id, shift.id);
    assert_eq!(moved.user_id, other.user_id);
    assert_eq!(moved.start_time, t("09:00"));
    assert_eq!(moved.total_hours, 3.5);
    assert!(moved.is_recurring());

    let stored = ScheduleLogic::list(&mut pool, &mgr, Some(other.user_id), d("2025-03-10"), d("2025-03-10")).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_hours, 3.5);

    let err = ScheduleLogic::update(
        &mut pool,
        &mgr,
        shift.id,
        SchedulePatch {
            start_time: Some(t("13:00")),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidInterval(_)));

    let err = ScheduleLogic::update(
        &mut pool,
        &mgr,
        shift.id,
        SchedulePatch {
            location_id: Some(999),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = ScheduleLogic::update(&mut pool, &other, shift.id, SchedulePatch::default()).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn profiles_are_edited_by_their_owner_or_an_admin() {
    let mut pool = memory_pool();
    let admin = add_user(&pool, "adm", Role::Admin);
    let mgr = add_user(&pool, "mgr", Role::Manager);
    let emp = add_user(&pool, "emp", Role::Employee);

    let me = UserLogic::update(&mut pool, &emp, "emp", Some(" Erin "), Some("erin@example.com")).unwrap();
    assert_eq!(me.name, "Erin");
    assert_eq!(me.email, "erin@example.com");
    assert_eq!(me.role, Role::Employee);

    assert!(matches!(
        UserLogic::update(&mut pool, &emp, "mgr", Some("Boss"), None),
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        UserLogic::update(&mut pool, &mgr, "emp", Some("Someone"), None),
        Err(AppError::Forbidden(_))
    ));

    let renamed = UserLogic::update(&mut pool, &admin, "mgr", Some("Mario"), None).unwrap();
    assert_eq!(renamed.name, "Mario");
    assert_eq!(renamed.email, "mgr@example.com");

    assert!(matches!(
        UserLogic::update(&mut pool, &emp, "emp", None, Some("mgr@example.com")),
        Err(AppError::Other(_))
    ));
    assert!(matches!(
        UserLogic::update(&mut pool, &emp, "emp", None, Some("not-an-address")),
        Err(AppError::Other(_))
    ));
    assert!(matches!(
        UserLogic::update(&mut pool, &emp, "emp", Some("  "), None),
        Err(AppError::Other(_))
    ));
    // keeping one's own address is not a clash
    UserLogic::update(&mut pool, &emp, "emp", None, Some("erin@example.com")).unwrap();
}

fn weekend_rule() -> NewOvertimeRule {
    NewOvertimeRule {
        name: "Weekend".into(),
        kind: OvertimeType::Weekend,
        multiplier: 2.0,
        description: Some("Saturday and Sunday".into()),
        is_active: true,
    }
}

#[test]
fn overtime_rules_are_managed_by_admins() {
    let mut pool = memory_pool();
    let admin = add_user(&pool, "adm", Role::Admin);
    let mgr = add_user(&pool, "mgr", Role::Manager);

    assert!(matches!(
        OvertimeLogic::add(&mut pool, &mgr, weekend_rule()),
        Err(AppError::Forbidden(_))
    ));

    let weekend = OvertimeLogic::add(&mut pool, &admin, weekend_rule()).unwrap();
    let night = OvertimeLogic::add(
        &mut pool,
        &admin,
        NewOvertimeRule {
            name: "Night Shift".into(),
            kind: OvertimeType::NightShift,
            multiplier: 1.75,
            description: None,
            is_active: false,
        },
    )
    .unwrap();

    let all = OvertimeLogic::list(&mut pool, &admin, None, None).unwrap();
    assert_eq!(
        all.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Night Shift", "Weekend"]
    );
    let nights = OvertimeLogic::list(&mut pool, &admin, None, Some(OvertimeType::NightShift)).unwrap();
    assert_eq!(nights.len(), 1);
    assert_eq!(nights[0].id, night.id);

    let active = OvertimeLogic::active(&mut pool).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, weekend.id);

    let enabled = OvertimeLogic::update(
        &mut pool,
        &admin,
        night.id,
        OvertimeRulePatch {
            is_active: Some(true),
            multiplier: Some(1.8),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(enabled.is_active);
    assert_eq!(OvertimeLogic::show(&mut pool, &admin, night.id).unwrap().multiplier, 1.8);
    assert_eq!(OvertimeLogic::active(&mut pool).unwrap().len(), 2);

    assert!(matches!(
        OvertimeLogic::show(&mut pool, &mgr, night.id),
        Err(AppError::Forbidden(_))
    ));

    OvertimeLogic::delete(&mut pool, &admin, weekend.id).unwrap();
    assert!(matches!(
        OvertimeLogic::show(&mut pool, &admin, weekend.id),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn overtime_multiplier_and_name_are_validated() {
    let mut pool = memory_pool();
    let admin = add_user(&pool, "adm", Role::Admin);

    for multiplier in [0.5, f64::NAN] {
        let err = OvertimeLogic::add(
            &mut pool,
            &admin,
            NewOvertimeRule {
                multiplier,
                ..weekend_rule()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
    }

    let err = OvertimeLogic::add(
        &mut pool,
        &admin,
        NewOvertimeRule {
            name: " ".into(),
            ..weekend_rule()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));

    let rule = OvertimeLogic::add(&mut pool, &admin, weekend_rule()).unwrap();
    let err = OvertimeLogic::update(
        &mut pool,
        &admin,
        rule.id,
        OvertimeRulePatch {
            multiplier: Some(0.9),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));
    assert_eq!(OvertimeLogic::show(&mut pool, &admin, rule.id).unwrap().multiplier, 2.0);

    assert_eq!(OvertimeType::from_code("Night-Shift"), Some(OvertimeType::NightShift));
    assert_eq!(OvertimeType::from_code("overnight"), None);
}

#[test]
fn settings_start_from_defaults_and_stay_personal() {
    let mut pool = memory_pool();
    let emp = add_user(&pool, "emp", Role::Employee);
    let other = add_user(&pool, "other", Role::Employee);

    let initial = SettingsLogic::get(&mut pool, &emp).unwrap();
    assert_eq!(initial, UserSettings::defaults_for(emp.user_id));
    assert!(initial.enable_notifications);
    assert_eq!(initial.time_format, TimeFormat::H24);

    let changed = SettingsLogic::update(
        &mut pool,
        &emp,
        SettingsPatch {
            auto_clock_out: Some(true),
            default_view: Some(DefaultView::Reports),
            time_format: Some(TimeFormat::H12),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(changed.auto_clock_out);
    assert!(changed.enable_notifications);
    assert_eq!(SettingsLogic::get(&mut pool, &emp).unwrap(), changed);

    let theirs = SettingsLogic::get(&mut pool, &other).unwrap();
    assert_eq!(theirs.default_view, DefaultView::Dashboard);
    assert_eq!(TimeFormat::H12.clock_pattern(), "%I:%M %p");
}

#[test]
fn config_rejects_an_empty_team_range() {
    let dir = std::env::temp_dir();
    let path = dir.join("timereg_config_range_test.conf");

    std::fs::write(&path, "database: /tmp/x.sqlite\nadmin_range_days: 0\n").unwrap();
    assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));

    std::fs::write(&path, "database: /tmp/x.sqlite\nadmin_range_days: 3\n").unwrap();
    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.admin_range_days, 3);
    assert_eq!(cfg.per_page, 15);

    std::fs::remove_file(&path).ok();
}
