use chrono::NaiveDateTime;
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
pub enum VisitStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

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
pub enum VisitType {
    ClientVisit,
    SiteInspection,
    Meeting,
    Delivery,
    Other,
}

/// A field visit. Starting one doubles as the day's clock-in; ending it
/// clocks the linked attendance record out.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Visit {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    /// Attendance record created or reused by starting this visit.
    pub attendance_id: Option<u64>,
    #[schema(example = "client_visit")]
    pub visit_type: VisitType,
    #[schema(example = "Quarterly account review")]
    pub purpose: String,
    #[schema(example = "Acme HQ")]
    pub location_name: String,
    pub client_name: Option<String>,
    #[schema(value_type = String, example = "2026-01-01T09:00:00")]
    pub planned_start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2026-01-01T12:00:00")]
    pub planned_end_time: NaiveDateTime,
    #[schema(value_type = Option<String>)]
    pub actual_start_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub actual_end_time: Option<NaiveDateTime>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    #[schema(example = "pending")]
    pub status: VisitStatus,
    /// Approver this visit is addressed to, snapshot at submission.
    pub approved_by: Option<u64>,
    #[schema(value_type = Option<String>)]
    pub approved_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<NaiveDateTime>,
}

const COLUMNS: &str = "id, employee_id, attendance_id, visit_type, purpose, location_name, \
     client_name, planned_start_time, planned_end_time, actual_start_time, \
     actual_end_time, start_lat, start_lng, end_lat, end_lng, start_address, \
     end_address, status, approved_by, approved_at, notes, rejection_reason, \
     created_at";

impl Visit {
    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<Visit>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Visit>(&format!("SELECT {COLUMNS} FROM visits WHERE id = ?"))
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// A visit owned by the given employee, or None.
    pub async fn find_owned<'e, E>(
        exec: E,
        id: u64,
        employee_id: u64,
    ) -> Result<Option<Visit>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Visit>(&format!(
            "SELECT {COLUMNS} FROM visits WHERE id = ? AND employee_id = ?"
        ))
        .bind(id)
        .bind(employee_id)
        .fetch_optional(exec)
        .await
    }

    /// Approved and not yet started.
    pub fn can_start(&self) -> bool {
        self.status == VisitStatus::Approved && self.actual_start_time.is_none()
    }

    /// In progress with a recorded start and no end yet.
    pub fn can_end(&self) -> bool {
        self.status == VisitStatus::InProgress
            && self.actual_start_time.is_some()
            && self.actual_end_time.is_none()
    }

    #[cfg(test)]
    pub fn test_pending(approver_id: u64) -> Visit {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 8, 25)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Visit {
            id: 1,
            employee_id: 1000,
            attendance_id: None,
            visit_type: VisitType::ClientVisit,
            purpose: "Quarterly account review".to_string(),
            location_name: "Acme HQ".to_string(),
            client_name: Some("Acme".to_string()),
            planned_start_time: start,
            planned_end_time: start + chrono::Duration::hours(3),
            actual_start_time: None,
            actual_end_time: None,
            start_lat: None,
            start_lng: None,
            end_lat: None,
            end_lng: None,
            start_address: None,
            end_address: None,
            status: VisitStatus::Pending,
            approved_by: Some(approver_id),
            approved_at: None,
            notes: None,
            rejection_reason: None,
            created_at: None,
        }
    }
}

impl Approvable for Visit {
    fn is_pending(&self) -> bool {
        self.status == VisitStatus::Pending
    }

    fn assigned_approver(&self) -> Option<u64> {
        self.approved_by
    }

    fn approve(&mut self, approver_id: u64, at: NaiveDateTime) {
        self.status = VisitStatus::Approved;
        self.approved_by = Some(approver_id);
        self.approved_at = Some(at);
    }

    fn reject(&mut self, approver_id: u64, reason: String, at: NaiveDateTime) {
        self.status = VisitStatus::Rejected;
        self.approved_by = Some(approver_id);
        self.approved_at = Some(at);
        self.rejection_reason = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 25)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn pending_visits_cannot_start_or_end() {
        let v = Visit::test_pending(42);
        assert!(!v.can_start());
        assert!(!v.can_end());
    }

    #[test]
    fn start_requires_approval_and_no_prior_start() {
        let mut v = Visit::test_pending(42);
        v.approve(42, now());
        assert!(v.can_start());

        v.status = VisitStatus::InProgress;
        v.actual_start_time = Some(now());
        assert!(!v.can_start());
        assert!(v.can_end());
    }

    #[test]
    fn completed_visits_are_terminal() {
        let mut v = Visit::test_pending(42);
        v.status = VisitStatus::Completed;
        v.actual_start_time = Some(now());
        v.actual_end_time = Some(now());
        assert!(!v.can_start());
        assert!(!v.can_end());
    }
}
