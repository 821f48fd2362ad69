//! Overlap detection and duration arithmetic for time registrations.
//!
//! Everything in here is a pure function over its inputs: the caller
//! fetches the sibling registrations for one `(user_id, date)` and decides
//! what to do with a conflict.

use crate::models::registration::TimeRegistration;
use chrono::NaiveTime;

/// The interval under test. `clock_out = None` means an open interval
/// (a clock-in that has not been closed yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub clock_in: NaiveTime,
    pub clock_out: Option<NaiveTime>,
}

impl Candidate {
    pub fn new(clock_in: NaiveTime, clock_out: Option<NaiveTime>) -> Self {
        Self {
            clock_in,
            clock_out,
        }
    }

    pub fn open(clock_in: NaiveTime) -> Self {
        Self::new(clock_in, None)
    }

    pub fn closed(clock_in: NaiveTime, clock_out: NaiveTime) -> Self {
        Self::new(clock_in, Some(clock_out))
    }
}

/// `t` lies inside `existing`, boundaries included.
/// An open existing registration has no known end and reaches to the end of the day.
fn within(existing: &TimeRegistration, t: NaiveTime) -> bool {
    existing.clock_in <= t && existing.clock_out.is_none_or(|out| t <= out)
}

/// Return the first registration in `existing` that conflicts with `candidate`,
/// skipping the one whose id equals `exclude_id`.
///
/// Open candidate: any other open registration conflicts, otherwise one whose
/// range contains the candidate's clock-in.
///
/// Closed candidate, per registration in slice order:
/// 1. candidate starts inside it,
/// 2. candidate ends inside it,
/// 3. candidate fully contains it.
pub fn find_overlap<'a>(
    existing: &'a [TimeRegistration],
    candidate: &Candidate,
    exclude_id: Option<i64>,
) -> Option<&'a TimeRegistration> {
    let siblings = || {
        existing
            .iter()
            .filter(move |reg| exclude_id != Some(reg.id))
    };

    match candidate.clock_out {
        None => siblings()
            .find(|reg| reg.is_open())
            .or_else(|| siblings().find(|reg| within(reg, candidate.clock_in))),
        Some(cand_out) => siblings().find(|reg| {
            let starts_inside = within(reg, candidate.clock_in);
            let ends_inside = within(reg, cand_out);
            let contains = reg
                .clock_out
                .is_some_and(|out| candidate.clock_in <= reg.clock_in && out <= cand_out);

            starts_inside || ends_inside || contains
        }),
    }
}

/// Elapsed minutes between clock-in and clock-out, always non-negative.
/// `None` while the interval is still open.
pub fn compute_duration(clock_in: NaiveTime, clock_out: Option<NaiveTime>) -> Option<i64> {
    let out = clock_out?;
    Some((out - clock_in).num_minutes().abs())
}

/// Minutes → hours, rounded to 2 decimals (half away from zero).
pub fn minutes_to_hours(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

/// Shortcut used before persisting: total hours for a (possibly open) interval.
pub fn total_hours(clock_in: NaiveTime, clock_out: Option<NaiveTime>) -> Option<f64> {
    compute_duration(clock_in, clock_out).map(minutes_to_hours)
}
