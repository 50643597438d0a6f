use chrono::NaiveDateTime;
use sqlx::MySqlPool;

/// One audit-trail entry. Written after the owning transaction commits.
pub struct ActivityEntry {
    pub employee_id: u64,
    pub company_id: u64,
    pub activity_type: &'static str,
    pub title: &'static str,
    pub description: String,
    pub activity_time: NaiveDateTime,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_address: Option<String>,
    pub metadata: serde_json::Value,
}

/// Best-effort append to the activity log. Failures are logged and swallowed:
/// a logging outage must never fail or roll back the attendance mutation the
/// caller already committed.
pub async fn record(pool: &MySqlPool, entry: ActivityEntry) {
    let employee_id = entry.employee_id;
    let activity_type = entry.activity_type;
    if let Err(e) = insert(pool, entry).await {
        tracing::warn!(
            error = %e,
            employee_id,
            activity_type,
            "failed to write activity log entry"
        );
    }
}

async fn insert(pool: &MySqlPool, entry: ActivityEntry) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO activity_logs \
            (employee_id, company_id, activity_type, title, description, \
             activity_time, latitude, longitude, location_address, metadata) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.employee_id)
    .bind(entry.company_id)
    .bind(entry.activity_type)
    .bind(entry.title)
    .bind(entry.description)
    .bind(entry.activity_time)
    .bind(entry.latitude)
    .bind(entry.longitude)
    .bind(entry.location_address)
    .bind(entry.metadata.to_string())
    .execute(pool)
    .await?;

    Ok(())
}
