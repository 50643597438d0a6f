use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::{format_minutes, storage_error, validate_location};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::{calendar, duration};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::holiday;
use crate::model::office::Office;
use crate::model::overtime::OvertimeRequest;
use crate::model::schedule::WorkSchedule;
use crate::utils::activity_log::{self, ActivityEntry};

#[derive(Deserialize, ToSchema)]
pub struct ClockRequest {
    #[schema(example = -6.2001)]
    pub latitude: f64,
    #[schema(example = 106.8166)]
    pub longitude: f64,
    #[schema(example = "Jl. Jend. Sudirman Kav. 52-53, Jakarta")]
    pub location_address: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryFilter {
    /// Month to list, formatted `YYYY-MM`. Defaults to the current month.
    #[schema(example = "2026-01")]
    pub month: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub data: Vec<Attendance>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ActivityFilter {
    /// today, week or month (defaults to today)
    #[schema(example = "today")]
    pub period: Option<String>,
    /// Filter by activity type, e.g. clock_in
    pub activity_type: Option<String>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ActivityLogRow {
    pub id: u64,
    #[schema(example = "clock_in")]
    pub activity_type: String,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub activity_time: NaiveDateTime,
    pub location_address: Option<String>,
}

fn reject(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "status": false,
        "message": message
    }))
}

/// Load the employee for the authenticated user, or produce the 404 body.
async fn load_employee<'e, E>(exec: E, user_id: u64) -> Result<Result<Employee, HttpResponse>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::MySql>,
{
    Ok(match Employee::find_for_user(exec, user_id).await? {
        Some(e) => Ok(e),
        None => Err(HttpResponse::NotFound().json(serde_json::json!({
            "status": false,
            "message": "Employee data not found"
        }))),
    })
}

/// Clock preconditions checked in a fixed order so each failure maps to one
/// reason: holiday, schedule, work day, office. The status projection walks
/// the same chain read-only.
enum Gate {
    Ready(WorkSchedule, Office),
    Blocked(&'static str),
}

async fn clock_gate<'c>(
    tx: &mut sqlx::Transaction<'c, sqlx::MySql>,
    employee: &Employee,
    today: NaiveDate,
) -> Result<Gate, sqlx::Error> {
    if holiday::is_holiday(&mut **tx, today, employee.company_id).await? {
        return Ok(Gate::Blocked("Cannot clock in/out on holiday"));
    }

    let schedule = match employee.work_schedule_id {
        Some(id) => WorkSchedule::find_by_id(&mut **tx, id).await?,
        None => None,
    };
    let schedule = match schedule.filter(|s| s.is_active) {
        Some(s) => s,
        None => return Ok(Gate::Blocked("Work schedule not found or inactive")),
    };

    if !calendar::is_scheduled_work_day(&schedule, today) {
        return Ok(Gate::Blocked("Cannot clock in/out on non-working day"));
    }

    let office = match employee.office_id {
        Some(id) => Office::find_by_id(&mut **tx, id).await?,
        None => None,
    };
    let office = match office.filter(|o| o.is_active) {
        Some(o) => o,
        None => return Ok(Gate::Blocked("Office not found or inactive")),
    };

    Ok(Gate::Ready(schedule, office))
}

/// Clock in/out endpoint: first call of the day clocks in, the next clocks
/// out. Everything up to the commit runs in one transaction.
#[utoipa::path(
    post,
    path = "/api/attendance/clock",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Clocked in or out", body = Object, example = json!({
            "status": true,
            "message": "Clock in successful",
            "action": "clock_in"
        })),
        (status = 400, description = "Precondition failed (holiday, non-working day, outside radius, already clocked out)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Inactive employee"),
        (status = 404, description = "Employee data not found"),
        (status = 409, description = "Concurrent clock-in conflict"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_in_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ClockRequest>,
) -> actix_web::Result<impl Responder> {
    if let Err(msg) = validate_location(payload.latitude, payload.longitude, &payload.location_address)
    {
        return Ok(reject(msg.to_string()));
    }

    let now = Local::now().naive_local();
    let today = now.date();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| storage_error(e, "begin clock transaction"))?;

    let employee = match load_employee(&mut *tx, auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    if !employee.is_active {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "status": false,
            "message": "Employee account is inactive"
        })));
    }

    let (schedule, office) = match clock_gate(&mut tx, &employee, today)
        .await
        .map_err(|e| storage_error(e, "clock preconditions"))?
    {
        Gate::Ready(schedule, office) => (schedule, office),
        Gate::Blocked(reason) => return Ok(reject(reason.to_string())),
    };

    if !office.is_within_radius(payload.latitude, payload.longitude) {
        return Ok(reject(format!(
            "You are outside office radius ({}m). Please move closer to the office.",
            office.radius
        )));
    }

    let attendance = Attendance::find_for_day(&mut *tx, employee.id, today)
        .await
        .map_err(|e| storage_error(e, "load today's attendance"))?;

    match attendance {
        None => {
            // Clock in: the unique (employee_id, date) index arbitrates
            // concurrent attempts; the loser gets a conflict.
            let inserted = sqlx::query(
                "INSERT INTO attendances \
                    (employee_id, office_id, date, clock_in, clock_in_lat, \
                     clock_in_lng, clock_in_address, status) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(employee.id)
            .bind(office.id)
            .bind(today)
            .bind(now.time())
            .bind(payload.latitude)
            .bind(payload.longitude)
            .bind(&payload.location_address)
            .bind(AttendanceStatus::Present)
            .execute(&mut *tx)
            .await;

            let inserted = match inserted {
                Ok(r) => r,
                Err(e) => {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some("23000") {
                            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                                "status": false,
                                "message": "You have already clocked in today"
                            })));
                        }
                    }
                    return Err(storage_error(e, "insert attendance"));
                }
            };
            let attendance_id = inserted.last_insert_id();

            // Lateness compares times of day only; comparing full timestamps
            // would flag false lateness across dates.
            let is_late = now.time() > schedule.start_time;
            if is_late {
                sqlx::query("UPDATE attendances SET status = ? WHERE id = ?")
                    .bind(AttendanceStatus::Late)
                    .bind(attendance_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| storage_error(e, "mark attendance late"))?;
            }

            tx.commit()
                .await
                .map_err(|e| storage_error(e, "commit clock-in"))?;

            activity_log::record(
                &pool,
                ActivityEntry {
                    employee_id: employee.id,
                    company_id: employee.company_id,
                    activity_type: "clock_in",
                    title: "Clock In",
                    description: format!("{} clocked in at {}", employee.name, office.name),
                    activity_time: now,
                    latitude: Some(payload.latitude),
                    longitude: Some(payload.longitude),
                    location_address: Some(payload.location_address.clone()),
                    metadata: serde_json::json!({
                        "attendance_id": attendance_id,
                        "is_late": is_late
                    }),
                },
            )
            .await;

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "status": true,
                "message": "Clock in successful",
                "action": "clock_in",
                "data": {
                    "attendance_id": attendance_id,
                    "clock_in_time": now.time().format("%H:%M:%S").to_string(),
                    "is_late": is_late,
                    "status": if is_late { AttendanceStatus::Late } else { AttendanceStatus::Present },
                    "location": payload.location_address,
                }
            })))
        }
        Some(attendance) => {
            if attendance.clock_out.is_some() {
                return Ok(reject("You have already clocked out today".to_string()));
            }

            sqlx::query(
                "UPDATE attendances SET clock_out = ?, clock_out_lat = ?, \
                 clock_out_lng = ?, clock_out_address = ? WHERE id = ?",
            )
            .bind(now.time())
            .bind(payload.latitude)
            .bind(payload.longitude)
            .bind(&payload.location_address)
            .bind(attendance.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "update attendance clock-out"))?;

            let approved = OvertimeRequest::find_approved(&mut *tx, employee.id, today)
                .await
                .map_err(|e| storage_error(e, "load approved overtime"))?;

            let durations = duration::compute(
                attendance.date,
                attendance.clock_in,
                Some(now.time()),
                Some(&schedule),
                approved.as_ref(),
                &config.policy,
            );

            // Durations are always written, zeros included, so the record
            // never ends up half-updated.
            sqlx::query(
                "UPDATE attendances SET work_duration = ?, overtime_duration = ? WHERE id = ?",
            )
            .bind(durations.work_minutes)
            .bind(durations.overtime_minutes)
            .bind(attendance.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "persist durations"))?;

            tx.commit()
                .await
                .map_err(|e| storage_error(e, "commit clock-out"))?;

            activity_log::record(
                &pool,
                ActivityEntry {
                    employee_id: employee.id,
                    company_id: employee.company_id,
                    activity_type: "clock_out",
                    title: "Clock Out",
                    description: format!("{} clocked out", employee.name),
                    activity_time: now,
                    latitude: Some(payload.latitude),
                    longitude: Some(payload.longitude),
                    location_address: Some(payload.location_address.clone()),
                    metadata: serde_json::json!({
                        "attendance_id": attendance.id,
                        "work_minutes": durations.work_minutes,
                        "overtime_minutes": durations.overtime_minutes,
                        "excess_minutes": durations.excess_minutes
                    }),
                },
            )
            .await;

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "status": true,
                "message": "Clock out successful",
                "action": "clock_out",
                "data": {
                    "attendance_id": attendance.id,
                    "clock_out_time": now.time().format("%H:%M:%S").to_string(),
                    "work_duration": format_minutes(durations.work_minutes),
                    "overtime_duration": format_minutes(durations.overtime_minutes),
                    "uncredited_overtime": format_minutes(durations.excess_minutes),
                    "location": payload.location_address,
                }
            })))
        }
    }
}

/// Attendance status for today: whether clock-in/out is currently permitted
/// and why, plus today's record and overtime info. Read-only.
#[utoipa::path(
    get,
    path = "/api/attendance/status",
    responses(
        (status = 200, description = "Current attendance status", body = Object, example = json!({
            "status": true,
            "data": {
                "can_clock_in": true,
                "can_clock_out": false,
                "message": "Ready to clock in"
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();
    let today = now.date();

    let employee = match load_employee(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let blocked = |message: &str| {
        HttpResponse::Ok().json(serde_json::json!({
            "status": true,
            "data": {
                "can_clock_in": false,
                "can_clock_out": false,
                "message": message
            }
        }))
    };

    if !employee.is_active {
        return Ok(blocked("Employee account is inactive"));
    }

    if holiday::is_holiday(pool.get_ref(), today, employee.company_id)
        .await
        .map_err(|e| storage_error(e, "holiday check"))?
    {
        return Ok(blocked("Today is holiday"));
    }

    let schedule = match employee.work_schedule_id {
        Some(id) => WorkSchedule::find_by_id(pool.get_ref(), id)
            .await
            .map_err(|e| storage_error(e, "load schedule"))?,
        None => None,
    };
    let schedule = match schedule.filter(|s| s.is_active) {
        Some(s) => s,
        None => return Ok(blocked("Work schedule not found or inactive")),
    };

    let is_work_day = calendar::is_scheduled_work_day(&schedule, today);
    if !is_work_day {
        return Ok(blocked("Today is not a working day"));
    }

    let office = match employee.office_id {
        Some(id) => Office::find_by_id(pool.get_ref(), id)
            .await
            .map_err(|e| storage_error(e, "load office"))?,
        None => None,
    };
    let office = match office.filter(|o| o.is_active) {
        Some(o) => o,
        None => return Ok(blocked("Office not found or inactive")),
    };

    let attendance = Attendance::find_for_day(pool.get_ref(), employee.id, today)
        .await
        .map_err(|e| storage_error(e, "load today's attendance"))?;

    let (can_clock_in, can_clock_out, message) = match &attendance {
        None => (true, false, "Ready to clock in"),
        Some(a) if a.clock_out.is_some() => (false, false, "Attendance completed for today"),
        Some(_) => (false, true, "Ready to clock out"),
    };

    let approved = OvertimeRequest::find_approved(pool.get_ref(), employee.id, today)
        .await
        .map_err(|e| storage_error(e, "load approved overtime"))?;
    let pending = OvertimeRequest::find_pending(pool.get_ref(), employee.id, today)
        .await
        .map_err(|e| storage_error(e, "load pending overtime"))?;
    let has_open = approved.is_some() || pending.is_some();
    let can_request_overtime = !has_open && is_work_day;

    let grant_summary = |r: &OvertimeRequest| {
        serde_json::json!({
            "id": r.id,
            "start_time": r.start_time.format("%H:%M").to_string(),
            "end_time": r.end_time.format("%H:%M").to_string(),
            "duration": format_minutes(i64::from(r.duration)),
            "reason": r.reason,
        })
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": {
            "can_clock_in": can_clock_in,
            "can_clock_out": can_clock_out,
            "message": message,
            "employee_name": employee.name,
            "office_name": office.name,
            "today_attendance": attendance.as_ref().map(|a| serde_json::json!({
                "clock_in": a.clock_in,
                "clock_out": a.clock_out,
                "status": a.status,
            })),
            "overtime_info": {
                "has_approved_overtime": approved.is_some(),
                "approved_overtime": approved.as_ref().map(grant_summary),
                "has_pending_overtime": pending.is_some(),
                "pending_overtime": pending.as_ref().map(grant_summary),
                "can_request_overtime": can_request_overtime,
            }
        }
    })))
}

/// Paginated attendance history for the calling employee.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Paginated attendance history", body = HistoryResponse),
        (status = 400, description = "Invalid month filter"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    let employee = match load_employee(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let month = match &query.month {
        Some(m) => m.clone(),
        None => Local::now().format("%Y-%m").to_string(),
    };
    if NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_err() {
        return Ok(reject("month must be formatted YYYY-MM".to_string()));
    }

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendances \
         WHERE employee_id = ? AND DATE_FORMAT(date, '%Y-%m') = ?",
    )
    .bind(employee.id)
    .bind(&month)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| storage_error(e, "count attendance history"))?;

    let data = sqlx::query_as::<_, Attendance>(
        "SELECT id, employee_id, office_id, date, clock_in, clock_out, \
                clock_in_lat, clock_in_lng, clock_out_lat, clock_out_lng, \
                clock_in_address, clock_out_address, work_duration, \
                overtime_duration, status, notes \
         FROM attendances \
         WHERE employee_id = ? AND DATE_FORMAT(date, '%Y-%m') = ? \
         ORDER BY date DESC LIMIT ? OFFSET ?",
    )
    .bind(employee.id)
    .bind(&month)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| storage_error(e, "fetch attendance history"))?;

    Ok(HttpResponse::Ok().json(HistoryResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Recent activity-log entries for the calling employee.
#[utoipa::path(
    get,
    path = "/api/attendance/activity",
    params(ActivityFilter),
    responses(
        (status = 200, description = "Activity log entries", body = [ActivityLogRow]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee data not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn activity_logs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ActivityFilter>,
) -> actix_web::Result<impl Responder> {
    let employee = match load_employee(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| storage_error(e, "load employee"))?
    {
        Ok(e) => e,
        Err(resp) => return Ok(resp),
    };

    let now = Local::now().naive_local();
    let since = match query.period.as_deref().unwrap_or("today") {
        "week" => now - chrono::Duration::days(7),
        "month" => now - chrono::Duration::days(30),
        _ => now.date().and_hms_opt(0, 0, 0).unwrap_or(now),
    };

    let mut sql = String::from(
        "SELECT id, activity_type, title, description, activity_time, location_address \
         FROM activity_logs WHERE employee_id = ? AND activity_time >= ?",
    );
    if query.activity_type.is_some() {
        sql.push_str(" AND activity_type = ?");
    }
    sql.push_str(" ORDER BY activity_time DESC LIMIT 50");

    let mut q = sqlx::query_as::<_, ActivityLogRow>(&sql)
        .bind(employee.id)
        .bind(since);
    if let Some(activity_type) = &query.activity_type {
        q = q.bind(activity_type);
    }

    let rows = q
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| storage_error(e, "fetch activity logs"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": true,
        "data": rows
    })))
}
