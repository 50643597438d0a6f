use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, MySql};
use utoipa::ToSchema;

use crate::model::Approvable;

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
pub enum OvertimeStatus {
    Pending,
    Approved,
    Rejected,
}

/// One overtime grant request per (employee, date). At most one pending or
/// approved row may exist for that pair at a time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OvertimeRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "17:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "19:00:00", value_type = String)]
    pub end_time: NaiveTime,
    /// Requested minutes, cross-midnight adjusted at submission.
    #[schema(example = 120)]
    pub duration: i32,
    pub reason: String,
    #[schema(example = "pending")]
    pub status: OvertimeStatus,
    /// Approver this request is addressed to.
    pub approved_by: Option<u64>,
    #[schema(value_type = Option<String>)]
    pub approved_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<NaiveDateTime>,
}

const COLUMNS: &str = "id, employee_id, date, start_time, end_time, duration, reason, \
     status, approved_by, approved_at, rejection_reason, created_at";

impl OvertimeRequest {
    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<OvertimeRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, OvertimeRequest>(&format!(
            "SELECT {COLUMNS} FROM overtime_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// The approved grant for an employee+date, if any.
    pub async fn find_approved<'e, E>(
        exec: E,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<OvertimeRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        Self::find_with_status(exec, employee_id, date, OvertimeStatus::Approved).await
    }

    pub async fn find_pending<'e, E>(
        exec: E,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<OvertimeRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        Self::find_with_status(exec, employee_id, date, OvertimeStatus::Pending).await
    }

    async fn find_with_status<'e, E>(
        exec: E,
        employee_id: u64,
        date: NaiveDate,
        status: OvertimeStatus,
    ) -> Result<Option<OvertimeRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, OvertimeRequest>(&format!(
            "SELECT {COLUMNS} FROM overtime_requests \
             WHERE employee_id = ? AND date = ? AND status = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .bind(status)
        .fetch_optional(exec)
        .await
    }

    /// True iff a pending or approved request already exists for the day.
    /// Gates new submissions: one open request per (employee, date).
    pub async fn has_open_request<'e, E>(
        exec: E,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM overtime_requests \
             WHERE employee_id = ? AND date = ? AND status IN ('pending', 'approved'))",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(exec)
        .await?;

        Ok(exists != 0)
    }

    #[cfg(test)]
    pub fn test_pending(date: NaiveDate, approver_id: u64) -> OvertimeRequest {
        OvertimeRequest {
            id: 1,
            employee_id: 1000,
            date,
            start_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            duration: 120,
            reason: "Quarter-end closing".to_string(),
            status: OvertimeStatus::Pending,
            approved_by: Some(approver_id),
            approved_at: None,
            rejection_reason: None,
            created_at: None,
        }
    }

    #[cfg(test)]
    pub fn test_approved(date: NaiveDate, start: NaiveTime, minutes: i32) -> OvertimeRequest {
        let mut req = Self::test_pending(date, 42);
        req.start_time = start;
        req.end_time = start
            .overflowing_add_signed(chrono::Duration::minutes(i64::from(minutes)))
            .0;
        req.duration = minutes;
        req.status = OvertimeStatus::Approved;
        req
    }
}

impl Approvable for OvertimeRequest {
    fn is_pending(&self) -> bool {
        self.status == OvertimeStatus::Pending
    }

    fn assigned_approver(&self) -> Option<u64> {
        self.approved_by
    }

    fn approve(&mut self, approver_id: u64, at: NaiveDateTime) {
        self.status = OvertimeStatus::Approved;
        self.approved_by = Some(approver_id);
        self.approved_at = Some(at);
    }

    fn reject(&mut self, approver_id: u64, reason: String, at: NaiveDateTime) {
        self.status = OvertimeStatus::Rejected;
        self.approved_by = Some(approver_id);
        self.approved_at = Some(at);
        self.rejection_reason = Some(reason);
    }
}
