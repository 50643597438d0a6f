use serde::{Deserialize, Serialize};
use sqlx::{Executor, MySql};
use utoipa::ToSchema;

/// Read-only employee projection consumed by the attendance engine:
/// company/office/schedule links, the assigned approver, and the active flag.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1000)]
    pub id: u64,
    pub user_id: u64,
    #[schema(example = 1)]
    pub company_id: u64,
    pub office_id: Option<u64>,
    pub work_schedule_id: Option<u64>,
    /// Employee who decides this employee's overtime and visit requests.
    pub approver_id: Option<u64>,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Field Engineer")]
    pub position: Option<String>,
    pub is_active: bool,
}

const COLUMNS: &str = "id, user_id, company_id, office_id, work_schedule_id, \
     approver_id, name, position, is_active";

impl Employee {
    /// The employee linked to an authenticated user, if any.
    pub async fn find_for_user<'e, E>(exec: E, user_id: u64) -> Result<Option<Employee>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {COLUMNS} FROM employees WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(exec)
        .await
    }

    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<Employee>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employees WHERE id = ?"))
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Like `find_by_id`, but only returns currently active employees.
    /// Used to verify an assigned approver is still available.
    pub async fn find_active<'e, E>(exec: E, id: u64) -> Result<Option<Employee>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {COLUMNS} FROM employees WHERE id = ? AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// True iff `self` is the assigned approver for `other`.
    pub fn can_approve(&self, other: &Employee) -> bool {
        other.approver_id == Some(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u64, approver_id: Option<u64>) -> Employee {
        Employee {
            id,
            user_id: id,
            company_id: 1,
            office_id: Some(1),
            work_schedule_id: Some(1),
            approver_id,
            name: format!("Employee {id}"),
            position: None,
            is_active: true,
        }
    }

    #[test]
    fn approval_requires_the_assigned_link() {
        let manager = employee(1, None);
        let report = employee(2, Some(1));
        let stranger = employee(3, Some(9));
        assert!(manager.can_approve(&report));
        assert!(!manager.can_approve(&stranger));
        assert!(!manager.can_approve(&manager));
    }
}
