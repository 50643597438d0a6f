use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::{format_minutes, storage_error};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::overtime::{OvertimeSubmission, validate_submission};
use crate::model::Approvable;
use crate::model::employee::Employee;
use crate::model::overtime::{OvertimeRequest, OvertimeStatus};
use crate::model::schedule::WorkSchedule;
use crate::utils::activity_log::{self, ActivityEntry};

#[derive(Deserialize, ToSchema)]
pub struct SubmitOvertime {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Time of day; an end at or before the start means the window runs
    /// into the next day.
    #[schema(example = "17:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "19:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = "Quarter-end closing")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct OvertimeFilter {
    /// pending, approved or rejected
    #[schema(example = "pending")]
    pub status: Option<OvertimeStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectOvertime {
    #[schema(example = "Production freeze that week")]
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

async fn employee_for(
    pool: &MySqlPool,
    user_id: u64,
) -> actix_web::Result<Result<Employee, HttpResponse>> {
    Ok(
        match Employee::find_for_user(pool, user_id)
            .await
            .map_err(|e| storage_error(e, "load employee"))?
        {
            Some(e) => Ok(e),
            None => Err(not_found("Employee data not found")),
        },
    )
}

/// List the calling employee's own overtime requests.
#[utoipa::path(
    get,
    path = "/api/overtime",
    params(OvertimeFilter),
    responses(
        (status = 200, description = "Overtime requests", body = [OvertimeRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn list_my_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<OvertimeFilter>,
) -> actix_web::Result<impl Responder> {
    let employee = match employee_for(&pool, auth.user_id).await? {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let mut sql = String::from(
        "SELECT id, employee_id, date, start_time, end_time, duration, reason, \
                status, approved_by, approved_at, rejection_reason, created_at \
         FROM overtime_requests WHERE employee_id = ?",
    );
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY date DESC, created_at DESC");

    let mut q = sqlx::query_as::<_, OvertimeRequest>(&sql).bind(employee.id);
    if let Some(status) = query.status {
        q = q.bind(status);
    }

    let requests = q
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| storage_error(e, "fetch overtime list"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": requests
    })))
}

/// Submit an overtime request for pre-approval.
#[utoipa::path(
    post,
    path = "/api/overtime",
    request_body = SubmitOvertime,
    responses(
        (status = 200, description = "Request submitted", body = Object, example = json!({
            "status": true,
            "message": "Overtime request submitted successfully"
        })),
        (status = 400, description = "Business rule violated (duration bounds, advance window, open request, no approver)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Inactive employee"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn submit_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<SubmitOvertime>,
) -> actix_web::Result<impl Responder> {
    if payload.reason.trim().is_empty() || payload.reason.len() > 1000 {
        return Ok(reject_msg("reason must be 1-1000 characters".to_string()));
    }

    let now = Local::now().naive_local();
    let today = now.date();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin overtime transaction"))?;

    let employee = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    if !employee.is_active {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "status": false,
            "message": "Employee account is inactive"
        })));
    }

    let schedule = match employee.work_schedule_id {
        Some(id) => WorkSchedule::find_by_id(&mut *tx, id)
            .await
            .map_err(|e| storage_error(e, "load schedule"))?,
        None => None,
    };

    let submission = OvertimeSubmission {
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
    };
    let duration = match validate_submission(&submission, schedule.as_ref(), today, &config.policy)
    {
        Ok(minutes) => minutes,
        Err(e) => return Ok(reject_msg(e.to_string())),
    };

    // One open request per employee per day.
    if OvertimeRequest::has_open_request(&mut *tx, employee.id, payload.date)
        .await
        .map_err(|e| storage_error(e, "open request check"))?
    {
        return Ok(reject_msg(
            "You already have an overtime request for this date".to_string(),
        ));
    }

    let Some(approver_id) = employee.approver_id else {
        return Ok(reject_msg(
            "No approver assigned for your account. Please contact HR.".to_string(),
        ));
    };
    let approver = match Employee::find_active(&mut *tx, approver_id)
        .await
        .map_err(|e| storage_error(e, "load approver"))?
    {
        Some(a) => a,
        None => {
            return Ok(reject_msg(
                "Assigned approver is not available. Please contact HR.".to_string(),
            ));
        }
    };

    let inserted = sqlx::query(
        "INSERT INTO overtime_requests \
            (employee_id, date, start_time, end_time, duration, reason, status, approved_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(employee.id)
    .bind(payload.date)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(duration)
    .bind(&payload.reason)
    .bind(OvertimeStatus::Pending)
    .bind(approver.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "insert overtime request"))?;
    let request_id = inserted.last_insert_id();

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit overtime submission"))?;

    activity_log::record(
        &pool,
        ActivityEntry {
            employee_id: employee.id,
            company_id: employee.company_id,
            activity_type: "overtime_request",
            title: "Overtime Requested",
            description: format!(
                "Submitted overtime request for {} ({})",
                payload.date,
                format_minutes(duration)
            ),
            activity_time: now,
            latitude: None,
            longitude: None,
            location_address: None,
            metadata: serde_json::json!({
                "overtime_request_id": request_id,
                "date": payload.date,
                "duration": duration,
                "approver_name": approver.name,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": "Overtime request submitted successfully",
        "data": {
            "id": request_id,
            "date": payload.date,
            "start_time": payload.start_time.format("%H:%M").to_string(),
            "end_time": payload.end_time.format("%H:%M").to_string(),
            "duration_minutes": duration,
            "status": OvertimeStatus::Pending,
            "approver": {
                "name": approver.name,
                "position": approver.position,
            }
        }
    })))
}

/// Fetch one of the calling employee's overtime requests.
#[utoipa::path(
    get,
    path = "/api/overtime/{id}",
    params(("id" = u64, Path, description = "Overtime request id")),
    responses(
        (status = 200, description = "Overtime request", body = OvertimeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn get_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee = match employee_for(&pool, auth.user_id).await? {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let request = OvertimeRequest::find_by_id(pool.get_ref(), path.into_inner())
        .await
        .map_err(|e| storage_error(e, "fetch overtime request"))?
        .filter(|r| r.employee_id == employee.id);

    match request {
        Some(r) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": true,
            "data": r
        }))),
        None => Ok(not_found("Overtime request not found")),
    }
}

/// Cancel a pending request. Modeled as a rejection with a fixed reason,
/// legal only while pending and only for the owner.
#[utoipa::path(
    put,
    path = "/api/overtime/{id}/cancel",
    params(("id" = u64, Path, description = "Overtime request id")),
    responses(
        (status = 200, description = "Request cancelled"),
        (status = 400, description = "Request is not pending"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn cancel_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin cancel transaction"))?;

    let employee = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let request = OvertimeRequest::find_by_id(&mut *tx, path.into_inner())
        .await
        .map_err(|e| storage_error(e, "fetch overtime request"))?
        .filter(|r| r.employee_id == employee.id);
    let Some(mut request) = request else {
        return Ok(not_found("Overtime request not found"));
    };

    if !request.is_pending() {
        return Ok(reject_msg(
            "Only pending requests can be cancelled".to_string(),
        ));
    }

    // Self-cancel keeps the assigned approver on the row.
    let approver_id = request.assigned_approver().unwrap_or(employee.id);
    request.reject(approver_id, "Cancelled by employee".to_string(), now);

    sqlx::query(
        "UPDATE overtime_requests SET status = ?, rejection_reason = ?, approved_at = ? \
         WHERE id = ?",
    )
    .bind(request.status)
    .bind(&request.rejection_reason)
    .bind(request.approved_at)
    .bind(request.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "persist cancellation"))?;

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit cancellation"))?;

    activity_log::record(
        &pool,
        ActivityEntry {
            employee_id: employee.id,
            company_id: employee.company_id,
            activity_type: "overtime_cancel",
            title: "Overtime Cancelled",
            description: format!("Cancelled overtime request for {}", request.date),
            activity_time: now,
            latitude: None,
            longitude: None,
            location_address: None,
            metadata: serde_json::json!({
                "overtime_request_id": request.id,
                "date": request.date,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": "Overtime request cancelled successfully"
    })))
}

/// Pending overtime requests addressed to the calling approver.
#[utoipa::path(
    get,
    path = "/api/overtime/approvals/pending",
    responses(
        (status = 200, description = "Pending requests for this approver", body = [OvertimeRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a reviewing role"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn pending_approvals(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let approver = match employee_for(&pool, auth.user_id).await? {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let requests = sqlx::query_as::<_, OvertimeRequest>(
        "SELECT id, employee_id, date, start_time, end_time, duration, reason, \
                status, approved_by, approved_at, rejection_reason, created_at \
         FROM overtime_requests \
         WHERE status = ? AND approved_by = ? \
         ORDER BY created_at ASC",
    )
    .bind(OvertimeStatus::Pending)
    .bind(approver.id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| storage_error(e, "fetch pending approvals"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": requests,
        "total": requests.len()
    })))
}

async fn decide_overtime(
    auth: AuthUser,
    pool: &MySqlPool,
    request_id: u64,
    rejection_reason: Option<String>,
) -> actix_web::Result<HttpResponse> {
    auth.require_reviewer()?;

    let now = Local::now().naive_local();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin decision transaction"))?;

    let approver = match Employee::find_for_user(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load approver"))?
    {
        Some(e) => e,
        None => return Ok(not_found("Employee data not found")),
    };

    let Some(mut request) = OvertimeRequest::find_by_id(&mut *tx, request_id)
        .await
        .map_err(|e| storage_error(e, "fetch overtime request"))?
    else {
        return Ok(not_found("Overtime request not found"));
    };

    if !request.is_pending() {
        return Ok(reject_msg(
            "This request has already been processed".to_string(),
        ));
    }
    if !request.can_be_decided_by(approver.id) {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "status": false,
            "message": "You are not authorized to decide this request"
        })));
    }

    let (activity_type, title, verdict) = match &rejection_reason {
        None => {
            request.approve(approver.id, now);
            ("overtime_approved", "Overtime Approved", "approved")
        }
        Some(reason) => {
            request.reject(approver.id, reason.clone(), now);
            ("overtime_rejected", "Overtime Rejected", "rejected")
        }
    };

    sqlx::query(
        "UPDATE overtime_requests SET status = ?, approved_at = ?, rejection_reason = ? \
         WHERE id = ?",
    )
    .bind(request.status)
    .bind(request.approved_at)
    .bind(&request.rejection_reason)
    .bind(request.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| storage_error(e, "persist decision"))?;

    tx.commit()
        .await
        .map_err(|e| storage_error(e, "commit decision"))?;

    activity_log::record(
        pool,
        ActivityEntry {
            employee_id: request.employee_id,
            company_id: approver.company_id,
            activity_type,
            title,
            description: format!(
                "Overtime request for {} {} by {}",
                request.date, verdict, approver.name
            ),
            activity_time: now,
            latitude: None,
            longitude: None,
            location_address: None,
            metadata: serde_json::json!({
                "overtime_request_id": request.id,
                "duration": request.duration,
                "rejection_reason": request.rejection_reason,
            }),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "message": format!("Overtime request {verdict} successfully"),
        "data": {
            "id": request.id,
            "status": request.status,
            "approved_by": approver.name,
            "decided_at": request.approved_at,
        }
    })))
}

/// Approve a pending request; only its assigned approver may do this.
#[utoipa::path(
    put,
    path = "/api/overtime/{id}/approve",
    params(("id" = u64, Path, description = "Overtime request id")),
    responses(
        (status = 200, description = "Request approved"),
        (status = 400, description = "Request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the assigned approver"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide_overtime(auth, pool.get_ref(), path.into_inner(), None).await
}

/// Reject a pending request with a reason.
#[utoipa::path(
    put,
    path = "/api/overtime/{id}/reject",
    params(("id" = u64, Path, description = "Overtime request id")),
    request_body = RejectOvertime,
    responses(
        (status = 200, description = "Request rejected"),
        (status = 400, description = "Request already processed or missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the assigned approver"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RejectOvertime>,
) -> actix_web::Result<impl Responder> {
    if payload.reason.trim().is_empty() {
        return Ok(reject_msg("A rejection reason is required".to_string()));
    }
    decide_overtime(
        auth,
        pool.get_ref(),
        path.into_inner(),
        Some(payload.reason.clone()),
    )
    .await
}
