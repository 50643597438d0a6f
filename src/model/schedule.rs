use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, MySql};
use utoipa::ToSchema;

/// Per-employee (or shared) work schedule policy.
///
/// `work_days` is stored as a JSON array of ISO weekday numbers
/// (1 = Monday .. 7 = Sunday), e.g. `[1,2,3,4,5]`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkSchedule {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Office Hours")]
    pub name: String,
    #[schema(example = "08:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = "[1,2,3,4,5]")]
    pub work_days: String,
    #[schema(example = 8)]
    pub total_hours: i32,
    /// Paid break minutes inside the scheduled day.
    #[schema(example = 60)]
    pub break_duration: i32,
    pub is_flexible: bool,
    pub flexible_minutes: i32,
    pub is_active: bool,
}

impl WorkSchedule {
    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<WorkSchedule>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, WorkSchedule>(
            "SELECT id, name, start_time, end_time, work_days, total_hours, \
                    break_duration, is_flexible, flexible_minutes, is_active \
             FROM work_schedules WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// Parsed work-day set. Malformed or empty stored data reads as no work
    /// days at all rather than an error.
    pub fn work_day_numbers(&self) -> Vec<u8> {
        serde_json::from_str(&self.work_days).unwrap_or_default()
    }

    /// True iff the ISO weekday (1 = Monday .. 7 = Sunday) is a work day.
    pub fn is_work_day(&self, iso_weekday: u32) -> bool {
        self.work_day_numbers()
            .iter()
            .any(|d| u32::from(*d) == iso_weekday)
    }

    #[cfg(test)]
    pub fn test_default() -> WorkSchedule {
        WorkSchedule {
            id: 1,
            name: "Office Hours".to_string(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            work_days: "[1,2,3,4,5]".to_string(),
            total_hours: 8,
            break_duration: 60,
            is_flexible: false,
            flexible_minutes: 0,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekdays_in_the_set_are_work_days() {
        let s = WorkSchedule::test_default();
        assert!(s.is_work_day(1));
        assert!(s.is_work_day(5));
        assert!(!s.is_work_day(6));
        assert!(!s.is_work_day(7));
    }

    #[test]
    fn malformed_work_days_parse_to_empty() {
        let mut s = WorkSchedule::test_default();
        s.work_days = "definitely not json".to_string();
        assert!(s.work_day_numbers().is_empty());
        assert!(!s.is_work_day(1));
    }

    #[test]
    fn out_of_range_entries_simply_never_match() {
        let mut s = WorkSchedule::test_default();
        s.work_days = "[0, 8, 250]".to_string();
        for day in 1..=7 {
            assert!(!s.is_work_day(day));
        }
    }
}
