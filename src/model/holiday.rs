use chrono::NaiveDate;
use sqlx::{Executor, MySql};

/// True iff an active holiday row exists for that exact date and company.
pub async fn is_holiday<'e, E>(
    exec: E,
    date: NaiveDate,
    company_id: u64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let exists: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM holidays \
         WHERE company_id = ? AND date = ? AND is_active = 1)",
    )
    .bind(company_id)
    .bind(date)
    .fetch_one(exec)
    .await?;

    Ok(exists != 0)
}
