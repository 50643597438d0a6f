use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use derive_more::Display;

use crate::config::AttendancePolicy;
use crate::model::schedule::WorkSchedule;

/// An overtime submission as received from the employee: a date plus two
/// times of day. `end_time <= start_time` means the window runs into the
/// next calendar day.
#[derive(Debug, Clone, Copy)]
pub struct OvertimeSubmission {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Typed rejection reasons for an overtime submission. Each renders the
/// exact message surfaced to the caller.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum SubmitError {
    #[display(fmt = "Overtime cannot be requested for a past date")]
    DateInPast,
    #[display(fmt = "Overtime request cannot be made more than {} days in advance", _0)]
    TooFarAhead(i64),
    #[display(fmt = "Minimum overtime duration is {} minutes", _0)]
    TooShort(i64),
    #[display(fmt = "Maximum overtime duration is {} minutes", _0)]
    TooLong(i64),
    #[display(fmt = "Overtime can only start after work hours ({})", _0)]
    StartsDuringWorkHours(NaiveTime),
}

/// Validate a submission against the pure business rules and return the
/// cross-midnight-adjusted duration in minutes.
///
/// The two storage-backed rules — no open grant for the same day, and an
/// active assigned approver — are checked by the handler inside its
/// transaction, not here.
pub fn validate_submission(
    submission: &OvertimeSubmission,
    schedule: Option<&WorkSchedule>,
    today: NaiveDate,
    policy: &AttendancePolicy,
) -> Result<i64, SubmitError> {
    if submission.date < today {
        return Err(SubmitError::DateInPast);
    }
    if submission.date > today + Duration::days(policy.max_advance_days) {
        return Err(SubmitError::TooFarAhead(policy.max_advance_days));
    }

    let duration = window_minutes(submission);
    if duration < policy.min_overtime_minutes {
        return Err(SubmitError::TooShort(policy.min_overtime_minutes));
    }
    if duration > policy.max_overtime_minutes {
        return Err(SubmitError::TooLong(policy.max_overtime_minutes));
    }

    if let Some(schedule) = schedule {
        // Overtime must not overlap regular hours. Pre-dawn starts are the
        // tail of a cross-day window and exempt from this check.
        if submission.start_time < schedule.end_time && submission.start_time.hour() >= 6 {
            return Err(SubmitError::StartsDuringWorkHours(schedule.end_time));
        }
    }

    Ok(duration)
}

/// Requested window length in minutes, treating `end <= start` as next-day.
pub fn window_minutes(submission: &OvertimeSubmission) -> i64 {
    let start = submission.date.and_time(submission.start_time);
    let mut end = submission.date.and_time(submission.end_time);
    if end <= start {
        end += Duration::days(1);
    }
    (end - start).num_minutes().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn submission(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> OvertimeSubmission {
        OvertimeSubmission {
            date,
            start_time: start,
            end_time: end,
        }
    }

    fn policy() -> AttendancePolicy {
        AttendancePolicy::default()
    }

    #[test]
    fn accepts_a_plain_evening_window() {
        let s = submission(today(), t(17, 0), t(19, 0));
        let schedule = WorkSchedule::test_default();
        assert_eq!(
            validate_submission(&s, Some(&schedule), today(), &policy()),
            Ok(120)
        );
    }

    #[test]
    fn rejects_past_dates() {
        let s = submission(today() - Duration::days(1), t(17, 0), t(19, 0));
        assert_eq!(
            validate_submission(&s, None, today(), &policy()),
            Err(SubmitError::DateInPast)
        );
    }

    #[test]
    fn rejects_dates_beyond_the_advance_window() {
        let s = submission(today() + Duration::days(8), t(17, 0), t(19, 0));
        assert_eq!(
            validate_submission(&s, None, today(), &policy()),
            Err(SubmitError::TooFarAhead(7))
        );
        // Exactly seven days ahead is still allowed.
        let s = submission(today() + Duration::days(7), t(17, 0), t(19, 0));
        assert!(validate_submission(&s, None, today(), &policy()).is_ok());
    }

    #[test]
    fn rejects_twenty_minute_requests_as_too_short() {
        let s = submission(today(), t(17, 0), t(17, 20));
        assert_eq!(
            validate_submission(&s, None, today(), &policy()),
            Err(SubmitError::TooShort(30))
        );
    }

    #[test]
    fn rejects_five_hour_requests_as_too_long() {
        let s = submission(today(), t(17, 0), t(22, 0));
        assert_eq!(
            validate_submission(&s, None, today(), &policy()),
            Err(SubmitError::TooLong(240))
        );
    }

    #[test]
    fn end_at_or_before_start_spans_midnight() {
        // 23:00 -> 01:00 is two hours, not negative.
        let s = submission(today(), t(23, 0), t(1, 0));
        assert_eq!(window_minutes(&s), 120);
        // Equal times read as a full day and fail the max check.
        let s = submission(today(), t(20, 0), t(20, 0));
        assert_eq!(
            validate_submission(&s, None, today(), &policy()),
            Err(SubmitError::TooLong(240))
        );
    }

    #[test]
    fn rejects_starts_inside_regular_hours() {
        let schedule = WorkSchedule::test_default(); // ends 17:00
        let s = submission(today(), t(15, 0), t(17, 0));
        assert_eq!(
            validate_submission(&s, Some(&schedule), today(), &policy()),
            Err(SubmitError::StartsDuringWorkHours(t(17, 0)))
        );
    }

    #[test]
    fn pre_dawn_starts_are_exempt_from_the_work_hours_check() {
        // 01:00 is before the 17:00 schedule end numerically, but belongs to
        // a cross-day window.
        let schedule = WorkSchedule::test_default();
        let s = submission(today(), t(1, 0), t(3, 0));
        assert_eq!(
            validate_submission(&s, Some(&schedule), today(), &policy()),
            Ok(120)
        );
    }

    #[test]
    fn renders_exact_reason_strings() {
        assert_eq!(
            SubmitError::TooShort(30).to_string(),
            "Minimum overtime duration is 30 minutes"
        );
        assert_eq!(
            SubmitError::TooLong(240).to_string(),
            "Maximum overtime duration is 240 minutes"
        );
    }
}
