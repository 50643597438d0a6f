use chrono::NaiveDateTime;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod office;
pub mod overtime;
pub mod role;
pub mod schedule;
pub mod visit;

/// Entities that flow through the pending -> approved/rejected workflow.
///
/// Both overtime requests and visits are addressed to an approver when
/// submitted; only that approver may decide them, and only while pending.
/// The mutators update the row in memory; the handler persists the result
/// inside its transaction.
pub trait Approvable {
    fn is_pending(&self) -> bool;

    /// Approver the request is addressed to.
    fn assigned_approver(&self) -> Option<u64>;

    fn approve(&mut self, approver_id: u64, at: NaiveDateTime);

    fn reject(&mut self, approver_id: u64, reason: String, at: NaiveDateTime);

    fn can_be_decided_by(&self, employee_id: u64) -> bool {
        self.is_pending() && self.assigned_approver() == Some(employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overtime::{OvertimeRequest, OvertimeStatus};
    use crate::model::visit::{Visit, VisitStatus};
    use chrono::{NaiveDate, NaiveTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 25)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap())
    }

    #[test]
    fn only_the_assigned_approver_may_decide() {
        let req = OvertimeRequest::test_pending(now().date(), 42);
        assert!(req.can_be_decided_by(42));
        assert!(!req.can_be_decided_by(7));
    }

    #[test]
    fn decided_requests_cannot_be_reprocessed() {
        let mut req = OvertimeRequest::test_pending(now().date(), 42);
        req.approve(42, now());
        assert_eq!(req.status, OvertimeStatus::Approved);
        assert_eq!(req.approved_at, Some(now()));
        assert!(!req.can_be_decided_by(42));
    }

    #[test]
    fn rejection_records_the_reason() {
        let mut req = OvertimeRequest::test_pending(now().date(), 42);
        req.reject(42, "Cancelled by employee".to_string(), now());
        assert_eq!(req.status, OvertimeStatus::Rejected);
        assert_eq!(req.rejection_reason.as_deref(), Some("Cancelled by employee"));
    }

    #[test]
    fn visits_follow_the_same_gate() {
        let mut visit = Visit::test_pending(42);
        assert!(visit.can_be_decided_by(42));
        visit.approve(42, now());
        assert_eq!(visit.status, VisitStatus::Approved);
        assert!(!visit.can_be_decided_by(42));
    }
}
