use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::{format_minutes, storage_error, validate_location};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::duration;
use crate::model::Approvable;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::overtime::OvertimeRequest;
use crate::model::schedule::WorkSchedule;
use crate::model::visit::{Visit, VisitStatus, VisitType};
use crate::utils::activity_log::{self, ActivityEntry};

#[derive(Deserialize, ToSchema)]
pub struct RequestVisit {
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
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    /// today, week or month (default month)
    #[schema(example = "month")]
    pub period: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct VisitCheckpoint {
    #[schema(example = -6.2088)]
    pub latitude: f64,
    #[schema(example = 106.8456)]
    pub longitude: f64,
    #[schema(example = "Acme HQ lobby, Jakarta")]
    pub location_address: String,
    /// End-of-visit notes, appended to the visit record.
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectVisit {
    #[schema(example = "Client postponed the meeting")]
    pub reason: String,
}

fn reject_msg(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "status": false,
        "message": message
    }))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "status": false,
        "message": message
    }))
}

/// Lower bound for a period filter, anchored at `today`.
fn period_start(period: Option<&str>, today: NaiveDate) -> NaiveDate {
    match period {
        Some("today") => today,
        Some("week") => today - Duration::days(6),
        _ => today.with_day(1).unwrap_or(today),
    }
}

/// Submit a field visit for approval.
#[utoipa::path(
    post,
    path = "/api/visit",
    request_body = RequestVisit,
    responses(
        (status = 200, description = "Visit request submitted", body = Object, example = json!({
            "status": true,
            "message": "Visit request submitted successfully"
        })),
        (status = 400, description = "Invalid plan or no approver assigned"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn request_visit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<RequestVisit>,
) -> actix_web::Result<impl Responder> {
    if payload.purpose.trim().is_empty() || payload.purpose.len() > 500 {
        return Ok(reject_msg("purpose must be 1-500 characters".to_string()));
    }
    if payload.location_name.trim().is_empty() || payload.location_name.len() > 255 {
        return Ok(reject_msg(
            "location_name must be 1-255 characters".to_string(),
        ));
    }

    let now = Local::now().naive_local();
    if payload.planned_start_time.date() < now.date() {
        return Ok(reject_msg(
            "planned_start_time must not be in the past".to_string(),
        ));
    }
    if payload.planned_end_time <= payload.planned_start_time {
        return Ok(reject_msg(
            "planned_end_time must be after planned_start_time".to_string(),
        ));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin visit transaction"))?;

    let employee = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let Some(approver_id) = employee.approver_id else {
        return Ok(reject_msg(
            "No approver assigned to your account".to_string(),
        ));
    };

    let inserted = sqlx::query(
        "INSERT INTO visits \
            (employee_id, visit_type, purpose, location_name, client_name, \
             planned_start_time, planned_end_time, notes, status, approved_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(employee.id)
    .bind(payload.visit_type)
    .bind(&payload.purpose)
    .bind(&payload.location_name)
    .bind(&payload.client_name)
    .bind(payload.planned_start_time)
    .bind(payload.planned_end_time)
    .bind(&payload.notes)
    .bind(VisitStatus::Pending)
    .bind(approver_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "insert visit"))?;
    let visit_id = inserted.last_insert_id();

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit visit request"))?;

    activity_log::record(
        &pool,
        ActivityEntry {
            employee_id: employee.id,
            company_id: employee.company_id,
            activity_type: "visit_requested",
            title: "Visit Request Created",
            description: format!("Visit request created: {}", payload.purpose),
            activity_time: now,
            latitude: None,
            longitude: None,
            location_address: None,
            metadata: serde_json::json!({
                "visit_id": visit_id,
                "visit_type": payload.visit_type,
                "location": payload.location_name,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": "Visit request submitted successfully",
        "data": {
            "visit_id": visit_id,
            "status": VisitStatus::Pending,
            "visit_type": payload.visit_type,
            "purpose": payload.purpose,
            "location_name": payload.location_name,
            "planned_start_time": payload.planned_start_time,
            "planned_end_time": payload.planned_end_time,
        }
    })))
}

/// List the calling employee's own visits.
#[utoipa::path(
    get,
    path = "/api/visit",
    params(VisitFilter),
    responses(
        (status = 200, description = "Visits", body = [Visit]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn list_my_visits(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<VisitFilter>,
) -> actix_web::Result<impl Responder> {
    let employee = match Employee::find_for_user(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let since = period_start(query.period.as_deref(), Local::now().date_naive());

    let mut sql = String::from(
        "SELECT id, employee_id, attendance_id, visit_type, purpose, location_name, \
                client_name, planned_start_time, planned_end_time, actual_start_time, \
                actual_end_time, start_lat, start_lng, end_lat, end_lng, start_address, \
                end_address, status, approved_by, approved_at, notes, rejection_reason, \
                created_at \
         FROM visits WHERE employee_id = ? AND planned_start_time >= ?",
    );
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY planned_start_time DESC LIMIT 20");

    let mut q = sqlx::query_as::<_, Visit>(&sql)
        .bind(employee.id)
        .bind(since.and_time(chrono::NaiveTime::MIN));
    if let Some(status) = query.status {
        q = q.bind(status);
    }

    let visits = q
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| storage_error(e, "fetch visits"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": visits
    })))
}

/// Visits addressed to the calling approver, pending by default.
#[utoipa::path(
    get,
    path = "/api/visit/approvals",
    params(VisitFilter),
    responses(
        (status = 200, description = "Visits awaiting this approver", body = [Visit]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a reviewing role"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn visit_approvals(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<VisitFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let approver = match Employee::find_for_user(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load approver"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let status = query.status.unwrap_or(VisitStatus::Pending);
    let since = period_start(query.period.as_deref(), Local::now().date_naive());

    let visits = sqlx::query_as::<_, Visit>(
        "SELECT id, employee_id, attendance_id, visit_type, purpose, location_name, \
                client_name, planned_start_time, planned_end_time, actual_start_time, \
                actual_end_time, start_lat, start_lng, end_lat, end_lng, start_address, \
                end_address, status, approved_by, approved_at, notes, rejection_reason, \
                created_at \
         FROM visits \
         WHERE approved_by = ? AND status = ? AND planned_start_time >= ? \
         ORDER BY created_at DESC LIMIT 20",
    )
    .bind(approver.id)
    .bind(status)
    .bind(since.and_time(chrono::NaiveTime::MIN))
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| storage_error(e, "fetch visit approvals"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": visits,
        "total": visits.len()
    })))
}

async fn decide_visit(
    auth: AuthUser,
    pool: &MySqlPool,
    visit_id: u64,
    rejection_reason: Option<String>,
) -> actix_web::Result<HttpResponse> {
    auth.require_reviewer()?;

    let now = Local::now().naive_local();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin visit decision"))?;

    let approver = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load approver"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let Some(mut visit) = Visit::find_by_id(&mut *tx, visit_id)
        .await
        .map_err(|e| storage_error(e, "fetch visit"))?
    else {
        return Ok(not_found("Visit not found"));
    };

    if !visit.is_pending() {
        return Ok(reject_msg("Visit is no longer pending approval".to_string()));
    }
    if !visit.can_be_decided_by(approver.id) {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "status": false,
            "message": "You are not authorized to approve this visit"
        })));
    }

    let (activity_type, title, verdict) = match &rejection_reason {
        None => {
            visit.approve(approver.id, now);
            ("visit_approved", "Visit Approved", "approved")
        }
        Some(reason) => {
            visit.reject(approver.id, reason.clone(), now);
            ("visit_rejected", "Visit Rejected", "rejected")
        }
    };

    sqlx::query(
        "UPDATE visits SET status = ?, approved_at = ?, rejection_reason = ? WHERE id = ?",
    )
    .bind(visit.status)
    .bind(visit.approved_at)
    .bind(&visit.rejection_reason)
    .bind(visit.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "persist visit decision"))?;

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit visit decision"))?;

    activity_log::record(
        pool,
        ActivityEntry {
            employee_id: visit.employee_id,
            company_id: approver.company_id,
            activity_type,
            title,
            description: format!("Visit {} by {}: {}", verdict, approver.name, visit.purpose),
            activity_time: now,
            latitude: None,
            longitude: None,
            location_address: None,
            metadata: serde_json::json!({
                "visit_id": visit.id,
                "visit_type": visit.visit_type,
                "rejection_reason": visit.rejection_reason,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": format!("Visit {verdict} successfully"),
        "data": {
            "visit_id": visit.id,
            "status": visit.status,
            "approved_by": approver.name,
            "approved_at": visit.approved_at,
        }
    })))
}

/// Approve a pending visit; only its assigned approver may do this.
#[utoipa::path(
    put,
    path = "/api/visit/{id}/approve",
    params(("id" = u64, Path, description = "Visit id")),
    responses(
        (status = 200, description = "Visit approved"),
        (status = 400, description = "Visit is no longer pending"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the assigned approver"),
        (status = 404, description = "Visit not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn approve_visit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide_visit(auth, pool.get_ref(), path.into_inner(), None).await
}

/// Reject a pending visit with a reason.
#[utoipa::path(
    put,
    path = "/api/visit/{id}/reject",
    params(("id" = u64, Path, description = "Visit id")),
    request_body = RejectVisit,
    responses(
        (status = 200, description = "Visit rejected"),
        (status = 400, description = "Visit is no longer pending or missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the assigned approver"),
        (status = 404, description = "Visit not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn reject_visit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RejectVisit>,
) -> actix_web::Result<impl Responder> {
    if payload.reason.trim().is_empty() || payload.reason.len() > 500 {
        return Ok(reject_msg("A rejection reason is required".to_string()));
    }
    decide_visit(
        auth,
        pool.get_ref(),
        path.into_inner(),
        Some(payload.reason.clone()),
    )
    .await
}

/// Start an approved visit. Doubles as the day's clock-in: the office
/// geofence and holiday gates do not apply to field work.
#[utoipa::path(
    post,
    path = "/api/visit/{id}/start",
    params(("id" = u64, Path, description = "Visit id")),
    request_body = VisitCheckpoint,
    responses(
        (status = 200, description = "Visit started, attendance opened"),
        (status = 400, description = "Visit not startable or already clocked in"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Visit not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn start_visit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<VisitCheckpoint>,
) -> actix_web::Result<impl Responder> {
    if let Err(msg) = validate_location(
        payload.latitude,
        payload.longitude,
        &payload.location_address,
    ) {
        return Ok(reject_msg(msg.to_string()));
    }

    let now = Local::now().naive_local();
    let today = now.date();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin visit start"))?;

    let employee = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let Some(visit) = Visit::find_owned(&mut *tx, path.into_inner(), employee.id)
        .await
        .map_err(|e| storage_error(e, "fetch visit"))?
    else {
        return Ok(not_found("Visit not found"));
    };

    if !visit.can_start() {
        return Ok(reject_msg(format!(
            "Visit cannot be started. Status: {}",
            visit.status
        )));
    }

    let attendance = Attendance::find_for_day(&mut *tx, employee.id, today)
        .await
        .map_err(|e| storage_error(e, "load attendance"))?;

    if let Some(a) = &attendance {
        if a.clock_in.is_some() {
            return Ok(reject_msg("You have already clocked in today".to_string()));
        }
    }

    let attendance_id = match attendance {
        Some(a) => {
            sqlx::query(
                "UPDATE attendances SET clock_in = ?, clock_in_lat = ?, clock_in_lng = ?, \
                        clock_in_address = ?, status = ? \
                 WHERE id = ?",
            )
            .bind(now.time())
            .bind(payload.latitude)
            .bind(payload.longitude)
            .bind(&payload.location_address)
            .bind(AttendanceStatus::Present)
            .bind(a.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "reopen attendance"))?;
            a.id
        }
        None => {
            let inserted = sqlx::query(
                "INSERT INTO attendances \
                    (employee_id, office_id, date, clock_in, clock_in_lat, clock_in_lng, \
                     clock_in_address, status) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(employee.id)
            .bind(employee.office_id)
            .bind(today)
            .bind(now.time())
            .bind(payload.latitude)
            .bind(payload.longitude)
            .bind(&payload.location_address)
            .bind(AttendanceStatus::Present)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "open attendance"))?;
            inserted.last_insert_id()
        }
    };

    sqlx::query(
        "UPDATE visits SET attendance_id = ?, actual_start_time = ?, start_lat = ?, \
                start_lng = ?, start_address = ?, status = ? \
         WHERE id = ?",
    )
    .bind(attendance_id)
    .bind(now)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(&payload.location_address)
    .bind(VisitStatus::InProgress)
    .bind(visit.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "mark visit in progress"))?;

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit visit start"))?;

    activity_log::record(
        &pool,
        ActivityEntry {
            employee_id: employee.id,
            company_id: employee.company_id,
            activity_type: "visit_started",
            title: "Visit Started",
            description: format!("Visit started: {}", visit.purpose),
            activity_time: now,
            latitude: Some(payload.latitude),
            longitude: Some(payload.longitude),
            location_address: Some(payload.location_address.clone()),
            metadata: serde_json::json!({
                "visit_id": visit.id,
                "attendance_id": attendance_id,
                "visit_type": visit.visit_type,
                "location": visit.location_name,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": "Visit started successfully (Clock In)",
        "action": "visit_start",
        "data": {
            "visit_id": visit.id,
            "attendance_id": attendance_id,
            "start_time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "location": payload.location_address,
            "purpose": visit.purpose,
        }
    })))
}

/// End an in-progress visit. Clocks the linked attendance record out and
/// settles the day's durations.
#[utoipa::path(
    post,
    path = "/api/visit/{id}/end",
    params(("id" = u64, Path, description = "Visit id")),
    request_body = VisitCheckpoint,
    responses(
        (status = 200, description = "Visit completed, attendance closed"),
        (status = 400, description = "Visit not endable"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Visit or linked attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Visit"
)]
pub async fn end_visit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<VisitCheckpoint>,
) -> actix_web::Result<impl Responder> {
    if let Err(msg) = validate_location(
        payload.latitude,
        payload.longitude,
        &payload.location_address,
    ) {
        return Ok(reject_msg(msg.to_string()));
    }

    let now = Local::now().naive_local();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin visit end"))?;

    let employee = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let Some(visit) = Visit::find_owned(&mut *tx, path.into_inner(), employee.id)
        .await
        .map_err(|e| storage_error(e, "fetch visit"))?
    else {
        return Ok(not_found("Visit not found"));
    };

    if !visit.can_end() {
        return Ok(reject_msg(format!(
            "Visit cannot be ended. Current status: {}",
            visit.status
        )));
    }

    let attendance = match visit.attendance_id {
        Some(id) => Attendance::find_by_id(&mut *tx, id)
            .await
            .map_err(|e| storage_error(e, "load attendance"))?,
        None => None,
    };
    let Some(attendance) = attendance else {
        return Ok(not_found("Attendance record not found"));
    };

    let schedule = match employee.work_schedule_id {
        Some(id) => WorkSchedule::find_by_id(&mut *tx, id)
            .await
            .map_err(|e| storage_error(e, "load schedule"))?,
        None => None,
    };
    let grant = OvertimeRequest::find_approved(&mut *tx, employee.id, attendance.date)
        .await
        .map_err(|e| storage_error(e, "load overtime grant"))?;

    let durations = duration::compute(
        attendance.date,
        attendance.clock_in,
        Some(now.time()),
        schedule.as_ref(),
        grant.as_ref(),
        &config.policy,
    );

    sqlx::query(
        "UPDATE attendances SET clock_out = ?, clock_out_lat = ?, clock_out_lng = ?, \
                clock_out_address = ?, work_duration = ?, overtime_duration = ? \
         WHERE id = ?",
    )
    .bind(now.time())
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(&payload.location_address)
    .bind(durations.work_minutes)
    .bind(durations.overtime_minutes)
    .bind(attendance.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "close attendance"))?;

    let notes = match &payload.notes {
        Some(end_notes) => Some(format!(
            "{}\n\nEnd Notes: {}",
            visit.notes.as_deref().unwrap_or_default(),
            end_notes
        )),
        None => visit.notes.clone(),
    };

    sqlx::query(
        "UPDATE visits SET actual_end_time = ?, end_lat = ?, end_lng = ?, \
                end_address = ?, status = ?, notes = ? \
         WHERE id = ?",
    )
    .bind(now)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(&payload.location_address)
    .bind(VisitStatus::Completed)
    .bind(&notes)
    .bind(visit.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "mark visit completed"))?;

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit visit end"))?;

    activity_log::record(
        &pool,
        ActivityEntry {
            employee_id: employee.id,
            company_id: employee.company_id,
            activity_type: "visit_ended",
            title: "Visit Completed",
            description: format!("Visit completed: {}", visit.purpose),
            activity_time: now,
            latitude: Some(payload.latitude),
            longitude: Some(payload.longitude),
            location_address: Some(payload.location_address.clone()),
            metadata: serde_json::json!({
                "visit_id": visit.id,
                "attendance_id": attendance.id,
                "work_duration": format_minutes(durations.work_minutes),
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": "Visit ended successfully (Clock Out)",
        "action": "visit_end",
        "data": {
            "visit_id": visit.id,
            "attendance_id": attendance.id,
            "end_time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "work_duration": format_minutes(durations.work_minutes),
            "overtime_duration": format_minutes(durations.overtime_minutes),
            "location": payload.location_address,
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_lower_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        assert_eq!(period_start(Some("today"), today), today);
        assert_eq!(
            period_start(Some("week"), today),
            NaiveDate::from_ymd_opt(2025, 8, 19).unwrap()
        );
        assert_eq!(
            period_start(Some("month"), today),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
        assert_eq!(
            period_start(None, today),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
        assert_eq!(
            period_start(Some("garbage"), today),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
    }
}
