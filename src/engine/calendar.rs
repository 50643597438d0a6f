use chrono::{Datelike, NaiveDate};

use crate::model::schedule::WorkSchedule;

/// ISO weekday number for a date: 1 = Monday .. 7 = Sunday.
///
/// Work-day sets are stored with this convention, so a calendar Sunday (0 in
/// some conventions) always lands on 7 here.
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// True iff `date` falls on one of the schedule's configured work days.
pub fn is_scheduled_work_day(schedule: &WorkSchedule, date: NaiveDate) -> bool {
    schedule.is_work_day(iso_weekday(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schedule::WorkSchedule;

    fn schedule_with_days(days: &str) -> WorkSchedule {
        WorkSchedule {
            work_days: days.to_string(),
            ..WorkSchedule::test_default()
        }
    }

    #[test]
    fn monday_is_one_sunday_is_seven() {
        // 2025-08-25 is a Monday, 2025-08-31 a Sunday.
        assert_eq!(iso_weekday(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()), 1);
        assert_eq!(iso_weekday(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()), 7);
    }

    #[test]
    fn weekday_membership_drives_the_answer() {
        let schedule = schedule_with_days("[1,2,3,4,5]");
        let monday = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 8, 30).unwrap();
        assert!(is_scheduled_work_day(&schedule, monday));
        assert!(!is_scheduled_work_day(&schedule, saturday));
    }

    #[test]
    fn malformed_work_days_never_match() {
        for bad in ["", "not json", "{\"a\":1}", "[\"mon\"]"] {
            let schedule = schedule_with_days(bad);
            let monday = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
            assert!(!is_scheduled_work_day(&schedule, monday), "days = {bad:?}");
        }
    }
}
