use crate::api::attendance::{
    ActivityFilter, ActivityLogRow, ClockRequest, HistoryFilter, HistoryResponse,
};
use crate::api::overtime::{OvertimeFilter, RejectOvertime, SubmitOvertime};
use crate::api::visit::{RejectVisit, RequestVisit, VisitCheckpoint, VisitFilter};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::overtime::{OvertimeRequest, OvertimeStatus};
use crate::model::visit::{Visit, VisitStatus, VisitType};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presence API",
        version = "1.0.0",
        description = r#"
## Employee Presence & Overtime Tracking

This API powers a mobile-first **attendance tracking** backend for field and office staff.

### 🔹 Key Features
- **Attendance**
  - Geofenced clock-in / clock-out, one record per employee per day
  - Daily status, monthly history, and an activity feed
- **Overtime**
  - Pre-approved overtime requests with a manager approval workflow
  - Clock-out credits overtime only up to the approved grant
- **Visits**
  - Field visit requests; starting a visit doubles as the day's clock-in

### 🔐 Security
All endpoints are protected using **JWT Bearer authentication**.
Approval endpoints additionally require a reviewing role and the matching
assigned approver.

### 📦 Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::api::attendance::clock_in_out,
        crate::api::attendance::attendance_status,
        crate::api::attendance::attendance_history,
        crate::api::attendance::activity_logs,

        crate::api::overtime::list_my_overtime,
        crate::api::overtime::submit_overtime,
        crate::api::overtime::get_overtime,
        crate::api::overtime::cancel_overtime,
        crate::api::overtime::pending_approvals,
        crate::api::overtime::approve_overtime,
        crate::api::overtime::reject_overtime,

        crate::api::visit::request_visit,
        crate::api::visit::list_my_visits,
        crate::api::visit::visit_approvals,
        crate::api::visit::approve_visit,
        crate::api::visit::reject_visit,
        crate::api::visit::start_visit,
        crate::api::visit::end_visit
    ),
    components(
        schemas(
            ClockRequest,
            HistoryFilter,
            HistoryResponse,
            ActivityFilter,
            ActivityLogRow,
            Attendance,
            AttendanceStatus,
            Employee,
            SubmitOvertime,
            OvertimeFilter,
            RejectOvertime,
            OvertimeRequest,
            OvertimeStatus,
            RequestVisit,
            VisitFilter,
            VisitCheckpoint,
            RejectVisit,
            Visit,
            VisitStatus,
            VisitType
        )
    ),
    tags(
        (name = "Attendance", description = "Clock-in/out and attendance history APIs"),
        (name = "Overtime", description = "Overtime request and approval APIs"),
        (name = "Visit", description = "Field visit tracking and approval APIs"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by every protected path.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
