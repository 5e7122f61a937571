//! Property tests for the pure rules: phone normalization, the warning
//! threshold, and closure readiness.

use chrono::Utc;
use cts_core::contact::normalize_phone;
use cts_core::model::assignment::ready_to_close;
use cts_core::{AssignmentStatus, Department, DepartmentAssignment, Ticket};
use proptest::prelude::*;

fn assignment(status: AssignmentStatus) -> DepartmentAssignment {
    DepartmentAssignment {
        id: "ASG-1000".into(),
        ticket_id: "TKT-1000".into(),
        department: Department::Technical,
        branch: None,
        manager_id: None,
        team_lead_id: None,
        status,
        created_at: Utc::now(),
        resolved_at: None,
    }
}

fn any_status() -> impl Strategy<Value = AssignmentStatus> {
    prop_oneof![
        Just(AssignmentStatus::NotAssigned),
        Just(AssignmentStatus::Assigned),
        Just(AssignmentStatus::InProgress),
        Just(AssignmentStatus::WaitingClient),
        Just(AssignmentStatus::Resolved),
    ]
}

proptest! {
    /// The flag is a pure function of the count with threshold at two.
    #[test]
    fn warning_flag_tracks_reopen_count(count in 0u32..100) {
        prop_assert_eq!(Ticket::warning_for(count), count > 1);
    }

    /// Normalization strips every non-digit and accepts exactly ten
    /// digits, always producing "+1" plus the digits.
    #[test]
    fn phone_normalization_is_digit_driven(raw in "[0-9 ()\\.\\-]{0,20}") {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        match normalize_phone(&raw) {
            Ok(normalized) => {
                prop_assert_eq!(digits.len(), 10);
                prop_assert_eq!(normalized, format!("+1{digits}"));
            }
            Err(_) => prop_assert_ne!(digits.len(), 10),
        }
    }

    /// Formatting noise never changes the outcome.
    #[test]
    fn phone_normalization_ignores_separators(digits in "[0-9]{10}") {
        let spaced = format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]);
        prop_assert_eq!(
            normalize_phone(&spaced).expect("ten digits"),
            format!("+1{digits}")
        );
    }

    /// Closure readiness holds exactly when the set is non-empty and
    /// fully resolved.
    #[test]
    fn closure_readiness_definition(statuses in prop::collection::vec(any_status(), 0..6)) {
        let assignments: Vec<_> = statuses.iter().map(|s| assignment(*s)).collect();
        let expected = !statuses.is_empty()
            && statuses.iter().all(|s| *s == AssignmentStatus::Resolved);
        prop_assert_eq!(ready_to_close(&assignments), expected);
    }
}
