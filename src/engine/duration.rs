use chrono::{Duration, NaiveDate, NaiveTime};

use crate::config::AttendancePolicy;
use crate::model::overtime::OvertimeRequest;
use crate::model::schedule::WorkSchedule;

/// Outcome of a clock-out computation, in whole minutes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work_minutes: i64,
    /// Overtime actually credited: capped by the approved grant, zero when
    /// no grant exists.
    pub overtime_minutes: i64,
    /// Overtime worked but not credited — beyond the grant, or beyond the
    /// grace period when there is no grant. Reported, never paid.
    pub excess_minutes: i64,
}

/// Derive work and overtime minutes for one attendance day.
///
/// Pure over its inputs: the caller supplies the attendance date, both
/// clock times, the schedule, any approved overtime grant and the policy.
/// A clock-out at or before the clock-in is treated as next-day — that is
/// the single cross-midnight normalization point, applied before any diff.
pub fn compute(
    date: NaiveDate,
    clock_in: Option<NaiveTime>,
    clock_out: Option<NaiveTime>,
    schedule: Option<&WorkSchedule>,
    approved: Option<&OvertimeRequest>,
    policy: &AttendancePolicy,
) -> Durations {
    let (Some(clock_in), Some(clock_out)) = (clock_in, clock_out) else {
        return Durations::default();
    };

    let started = date.and_time(clock_in);
    let mut ended = date.and_time(clock_out);
    if ended <= started {
        ended += Duration::days(1);
    }

    let mut result = Durations {
        work_minutes: (ended - started).num_minutes().abs(),
        ..Durations::default()
    };

    let Some(schedule) = schedule else {
        return result;
    };

    let scheduled_end = date.and_time(schedule.end_time);
    if ended <= scheduled_end {
        return result;
    }
    let raw_overtime = (ended - scheduled_end).num_minutes();

    match approved {
        Some(grant) => {
            let cap = i64::from(grant.duration);
            result.overtime_minutes = raw_overtime.min(cap);
            if raw_overtime > cap {
                result.excess_minutes = raw_overtime - cap;
                tracing::warn!(
                    raw_overtime,
                    approved = cap,
                    excess = result.excess_minutes,
                    "clock-out exceeds approved overtime; excess not credited"
                );
            }
        }
        None => {
            // No grant: nothing is credited. Past the grace period the
            // uncovered minutes become reportable.
            if raw_overtime > policy.grace_minutes {
                result.excess_minutes = raw_overtime - policy.grace_minutes;
                tracing::info!(
                    raw_overtime,
                    grace = policy.grace_minutes,
                    "overtime worked without approval; not credited"
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overtime::OvertimeRequest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn office_hours() -> WorkSchedule {
        // 08:00 - 17:00, Mon-Fri
        WorkSchedule::test_default()
    }

    fn grant(minutes: i32) -> OvertimeRequest {
        OvertimeRequest::test_approved(date(), t(17, 0), minutes)
    }

    fn policy() -> AttendancePolicy {
        AttendancePolicy::default()
    }

    #[test]
    fn missing_either_clock_yields_zeroes() {
        let p = policy();
        assert_eq!(
            compute(date(), None, Some(t(17, 0)), None, None, &p),
            Durations::default()
        );
        assert_eq!(
            compute(date(), Some(t(8, 0)), None, None, None, &p),
            Durations::default()
        );
    }

    #[test]
    fn plain_day_without_schedule() {
        let r = compute(date(), Some(t(9, 0)), Some(t(17, 30)), None, None, &policy());
        assert_eq!(r.work_minutes, 510);
        assert_eq!(r.overtime_minutes, 0);
    }

    #[test]
    fn cross_midnight_clock_out_lands_next_day() {
        // 23:50 in, 00:20 out -> 30 minutes.
        let r = compute(date(), Some(t(23, 50)), Some(t(0, 20)), None, None, &policy());
        assert_eq!(r.work_minutes, 30);
    }

    #[test]
    fn clock_out_equal_to_clock_in_is_a_full_day() {
        let r = compute(date(), Some(t(8, 0)), Some(t(8, 0)), None, None, &policy());
        assert_eq!(r.work_minutes, 24 * 60);
    }

    #[test]
    fn late_leave_without_grant_credits_nothing() {
        // 08:10 -> 19:30 against an 08:00-17:00 schedule: 690 worked minutes,
        // 150 raw overtime, none credited, 135 reportable past the grace.
        let schedule = office_hours();
        let r = compute(
            date(),
            Some(t(8, 10)),
            Some(t(19, 30)),
            Some(&schedule),
            None,
            &policy(),
        );
        assert_eq!(r.work_minutes, 690);
        assert_eq!(r.overtime_minutes, 0);
        assert_eq!(r.excess_minutes, 150 - 15);
    }

    #[test]
    fn leave_within_grace_reports_nothing() {
        let schedule = office_hours();
        let r = compute(
            date(),
            Some(t(8, 0)),
            Some(t(17, 10)),
            Some(&schedule),
            None,
            &policy(),
        );
        assert_eq!(r.overtime_minutes, 0);
        assert_eq!(r.excess_minutes, 0);
    }

    #[test]
    fn approved_grant_caps_the_credit() {
        // 120-minute grant, 150 raw overtime -> 120 credited, 30 excess.
        let schedule = office_hours();
        let g = grant(120);
        let r = compute(
            date(),
            Some(t(8, 10)),
            Some(t(19, 30)),
            Some(&schedule),
            Some(&g),
            &policy(),
        );
        assert_eq!(r.work_minutes, 690);
        assert_eq!(r.overtime_minutes, 120);
        assert_eq!(r.excess_minutes, 30);
    }

    #[test]
    fn credit_never_exceeds_the_grant_no_matter_how_late() {
        let schedule = office_hours();
        let g = grant(120);
        for out in [t(19, 0), t(21, 0), t(23, 59)] {
            let r = compute(
                date(),
                Some(t(8, 0)),
                Some(out),
                Some(&schedule),
                Some(&g),
                &policy(),
            );
            assert!(r.overtime_minutes <= 120, "out = {out}, got {r:?}");
        }
    }

    #[test]
    fn grant_pays_actual_time_when_under_the_cap() {
        let schedule = office_hours();
        let g = grant(120);
        let r = compute(
            date(),
            Some(t(8, 0)),
            Some(t(18, 0)),
            Some(&schedule),
            Some(&g),
            &policy(),
        );
        assert_eq!(r.overtime_minutes, 60);
        assert_eq!(r.excess_minutes, 0);
    }

    #[test]
    fn leaving_before_scheduled_end_is_never_overtime() {
        let schedule = office_hours();
        let g = grant(120);
        let r = compute(
            date(),
            Some(t(8, 0)),
            Some(t(16, 0)),
            Some(&schedule),
            Some(&g),
            &policy(),
        );
        assert_eq!(r.work_minutes, 480);
        assert_eq!(r.overtime_minutes, 0);
    }

    #[test]
    fn work_minutes_are_never_negative() {
        for (cin, cout) in [(t(22, 0), t(6, 0)), (t(17, 0), t(9, 0)), (t(0, 0), t(0, 0))] {
            let r = compute(date(), Some(cin), Some(cout), None, None, &policy());
            assert!(r.work_minutes >= 0, "in={cin} out={cout}");
        }
    }
}
