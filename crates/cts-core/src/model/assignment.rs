//! Department assignments: a ticket's per-department units of work, plus
//! the closure-readiness resolver over the assignment set.

use crate::model::user::{Branch, Department};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle of one department's portion of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotAssigned,
    Assigned,
    InProgress,
    WaitingClient,
    Resolved,
}

impl AssignmentStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotAssigned => "not_assigned",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::WaitingClient => "waiting_client",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an assignment status from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssignmentStatusError(pub String);

impl fmt::Display for ParseAssignmentStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid assignment status '{}': expected one of not_assigned, \
             assigned, in_progress, waiting_client, resolved",
            self.0
        )
    }
}

impl std::error::Error for ParseAssignmentStatusError {}

impl FromStr for AssignmentStatus {
    type Err = ParseAssignmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_assigned" | "not-assigned" => Ok(Self::NotAssigned),
            "assigned" => Ok(Self::Assigned),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "waiting_client" | "waiting-client" => Ok(Self::WaitingClient),
            "resolved" => Ok(Self::Resolved),
            _ => Err(ParseAssignmentStatusError(s.to_string())),
        }
    }
}

/// One department's (and, for Marketing, one branch's) unit of work routed
/// from a ticket. Owned by its ticket; no independent existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAssignment {
    pub id: String,
    pub ticket_id: String,
    pub department: Department,
    /// Required iff `department` is Marketing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    /// The department manager who assigned the team lead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_lead_id: Option<String>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl DepartmentAssignment {
    /// True if `other_dept`/`other_branch` would route to the same node.
    ///
    /// A ticket holds at most one assignment per (department, branch) pair;
    /// this is the duplicate-routing predicate the engine enforces.
    #[must_use]
    pub fn routes_to(&self, other_dept: Department, other_branch: Option<Branch>) -> bool {
        self.department == other_dept && self.branch == other_branch
    }
}

/// Closure rule: a ticket is ready to close when its assignment list is
/// non-empty and every assignment is Resolved. An empty list never
/// qualifies.
#[must_use]
pub fn ready_to_close(assignments: &[DepartmentAssignment]) -> bool {
    !assignments.is_empty()
        && assignments
            .iter()
            .all(|a| a.status == AssignmentStatus::Resolved)
}

#[cfg(test)]
mod tests {
    use super::{AssignmentStatus, DepartmentAssignment, ready_to_close};
    use crate::model::user::{Branch, Department};
    use chrono::Utc;
    use std::str::FromStr;

    fn assignment(dept: Department, branch: Option<Branch>, status: AssignmentStatus) -> DepartmentAssignment {
        DepartmentAssignment {
            id: "ASG-1000".into(),
            ticket_id: "TKT-1000".into(),
            department: dept,
            branch,
            manager_id: None,
            team_lead_id: None,
            status,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn status_display_parse_roundtrips() {
        for status in [
            AssignmentStatus::NotAssigned,
            AssignmentStatus::Assigned,
            AssignmentStatus::InProgress,
            AssignmentStatus::WaitingClient,
            AssignmentStatus::Resolved,
        ] {
            let parsed = AssignmentStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(AssignmentStatus::from_str("done").is_err());
    }

    #[test]
    fn empty_list_is_never_ready() {
        assert!(!ready_to_close(&[]));
    }

    #[test]
    fn ready_only_when_all_resolved() {
        let mut list = vec![
            assignment(Department::Technical, None, AssignmentStatus::Resolved),
            assignment(Department::Sales, None, AssignmentStatus::InProgress),
        ];
        assert!(!ready_to_close(&list));

        list[1].status = AssignmentStatus::Resolved;
        assert!(ready_to_close(&list));
    }

    #[test]
    fn routes_to_distinguishes_branches() {
        let ahm = assignment(
            Department::Marketing,
            Some(Branch::Ahm),
            AssignmentStatus::NotAssigned,
        );
        assert!(ahm.routes_to(Department::Marketing, Some(Branch::Ahm)));
        assert!(!ahm.routes_to(Department::Marketing, Some(Branch::Lko)));
        assert!(!ahm.routes_to(Department::Technical, None));
    }
}
