use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, MySql};
use utoipa::ToSchema;

/// Daily attendance state. A record starts as `Present` (or `Late`) at
/// clock-in; `Absent`, `Holiday` and `Leave` are written by back-office
/// processes outside this service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Holiday,
    Leave,
}

/// One row per (employee, date); the unique index on that pair serializes
/// concurrent clock-ins.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub office_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "08:02:11", value_type = Option<String>)]
    pub clock_in: Option<NaiveTime>,
    #[schema(example = "17:31:40", value_type = Option<String>)]
    pub clock_out: Option<NaiveTime>,
    pub clock_in_lat: Option<f64>,
    pub clock_in_lng: Option<f64>,
    pub clock_out_lat: Option<f64>,
    pub clock_out_lng: Option<f64>,
    pub clock_in_address: Option<String>,
    pub clock_out_address: Option<String>,
    /// Work duration in minutes, set once at clock-out.
    #[schema(example = 540)]
    pub work_duration: Option<i32>,
    /// Credited overtime in minutes, set together with `work_duration`.
    #[schema(example = 0)]
    pub overtime_duration: Option<i32>,
    #[schema(example = "present")]
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

const COLUMNS: &str = "id, employee_id, office_id, date, clock_in, clock_out, \
     clock_in_lat, clock_in_lng, clock_out_lat, clock_out_lng, \
     clock_in_address, clock_out_address, work_duration, overtime_duration, \
     status, notes";

impl Attendance {
    /// Today's record for an employee, if any.
    pub async fn find_for_day<'e, E>(
        exec: E,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {COLUMNS} FROM attendances WHERE employee_id = ? AND date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(exec)
        .await
    }

    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<Attendance>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Attendance>(&format!("SELECT {COLUMNS} FROM attendances WHERE id = ?"))
            .bind(id)
            .fetch_optional(exec)
            .await
    }
}
