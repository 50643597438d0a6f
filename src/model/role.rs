#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Manager = 3,
    Employee = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Manager),
            4 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Roles that may view and decide requests addressed to them.
    pub fn can_review_requests(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_map_to_none() {
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn plain_employees_cannot_review() {
        assert!(!Role::Employee.can_review_requests());
        assert!(Role::Manager.can_review_requests());
    }
}
