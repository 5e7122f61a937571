//! Access policy: pure predicates gating which role may invoke which
//! transition.
//!
//! Every command handler consults this table through [`authorize`] before
//! touching state; no handler re-derives role checks ad hoc. The
//! predicates are pure over the actor, the action, and the (optional)
//! ticket and assignment being acted on.

use crate::error::EngineError;
use crate::model::assignment::{AssignmentStatus, DepartmentAssignment};
use crate::model::ticket::{Ticket, TicketStatus};
use crate::model::user::{Role, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a ticket (clients only, for themselves).
    CreateTicket,
    /// Route a department assignment onto a ticket.
    AddAssignment,
    /// Attach a team lead to an assignment.
    AssignTeamLead,
    /// Move an assignment to the given status.
    UpdateAssignmentStatus(AssignmentStatus),
    /// Change ticket priority.
    ChangePriority,
    /// Change the ticket's global status to the given target.
    ChangeStatus(TicketStatus),
    /// Overwrite the contact snapshot.
    UpdateContact,
    /// Toggle subscription membership.
    ToggleSubscription,
    /// Reopen a closed ticket into a new linked ticket.
    Reopen,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTicket => f.write_str("create ticket"),
            Self::AddAssignment => f.write_str("add department assignment"),
            Self::AssignTeamLead => f.write_str("assign team lead"),
            Self::UpdateAssignmentStatus(status) => {
                write!(f, "set assignment status to {status}")
            }
            Self::ChangePriority => f.write_str("change priority"),
            Self::ChangeStatus(status) => write!(f, "change ticket status to {status}"),
            Self::UpdateContact => f.write_str("update contact info"),
            Self::ToggleSubscription => f.write_str("toggle subscription"),
            Self::Reopen => f.write_str("reopen ticket"),
        }
    }
}

/// Whether the assignment belongs to the actor's department/branch node.
///
/// A branchless assignment matches any manager of the department; a
/// branched (Marketing) assignment requires the manager's branch to match.
fn manages_node(actor: &User, assignment: &DepartmentAssignment) -> bool {
    actor.department == Some(assignment.department)
        && (assignment.branch.is_none() || actor.branch == assignment.branch)
}

/// Whether the actor is the team lead responsible for the assignment.
fn leads_assignment(actor: &User, assignment: &DepartmentAssignment) -> bool {
    assignment.team_lead_id.as_deref() == Some(actor.id.as_str())
}

/// The policy table. Returns true iff `actor` may perform `action` against
/// the given ticket/assignment.
#[must_use]
pub fn can_perform(
    actor: &User,
    action: Action,
    ticket: Option<&Ticket>,
    assignment: Option<&DepartmentAssignment>,
) -> bool {
    match action {
        Action::CreateTicket => actor.role == Role::Client,

        Action::AddAssignment => {
            actor.role == Role::ComplianceManager
                && ticket.is_some_and(|t| t.status != TicketStatus::Closed)
        }

        Action::AssignTeamLead => {
            actor.role == Role::DeptManager && assignment.is_some_and(|a| manages_node(actor, a))
        }

        Action::UpdateAssignmentStatus(AssignmentStatus::Resolved) => {
            actor.role == Role::TeamLead
                && assignment.is_some_and(|a| {
                    leads_assignment(actor, a) && a.status != AssignmentStatus::Resolved
                })
        }

        // Non-resolve status moves: the responsible team lead, or the
        // manager of the assignment's node.
        Action::UpdateAssignmentStatus(_) => assignment.is_some_and(|a| match actor.role {
            Role::TeamLead => leads_assignment(actor, a),
            Role::DeptManager => manages_node(actor, a),
            Role::Client | Role::ComplianceManager => false,
        }),

        Action::ChangePriority => {
            matches!(actor.role, Role::ComplianceManager | Role::DeptManager)
        }

        Action::ChangeStatus(TicketStatus::Closed) => {
            actor.role == Role::ComplianceManager
                && ticket.is_some_and(|t| t.status == TicketStatus::ReadyToClose)
        }

        // Manual non-closure moves are compliance-routing decisions.
        Action::ChangeStatus(_) => actor.role == Role::ComplianceManager,

        Action::UpdateContact => {
            actor.role == Role::Client
                && ticket.is_some_and(|t| {
                    t.client_id == actor.id && t.status != TicketStatus::Closed
                })
        }

        Action::ToggleSubscription => true,

        Action::Reopen => {
            actor.role == Role::Client
                && ticket.is_some_and(|t| {
                    t.client_id == actor.id && t.status == TicketStatus::Closed
                })
        }
    }
}

/// [`can_perform`] lifted into the engine error type.
///
/// # Errors
///
/// [`EngineError::Authorization`] carrying the attempted action and the
/// actor's role when the predicate denies.
pub fn authorize(
    actor: &User,
    action: Action,
    ticket: Option<&Ticket>,
    assignment: Option<&DepartmentAssignment>,
) -> Result<(), EngineError> {
    if can_perform(actor, action, ticket, assignment) {
        Ok(())
    } else {
        tracing::warn!(actor = %actor.id, role = %actor.role, %action, "command rejected by policy");
        Err(EngineError::Authorization {
            action,
            role: actor.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, can_perform};
    use crate::model::assignment::{AssignmentStatus, DepartmentAssignment};
    use crate::model::ticket::{Priority, Ticket, TicketStatus};
    use crate::model::user::{Branch, Department, Role, User};
    use chrono::Utc;

    fn user(id: &str, role: Role, department: Option<Department>, branch: Option<Branch>) -> User {
        User {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@cts.com"),
            phone: "+10000000000".into(),
            role,
            department,
            branch,
        }
    }

    fn ticket(client_id: &str, status: TicketStatus) -> Ticket {
        Ticket {
            id: "TKT-1000".into(),
            reference_id: "REF-1000".into(),
            parent_ticket_id: None,
            client_id: client_id.into(),
            title: "t".into(),
            description: "d".into(),
            priority: Priority::Medium,
            status,
            reopen_count: 0,
            warning_flag: false,
            contact_email: "c@x.com".into(),
            contact_phone: "+15550123456".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            closed_at: None,
            assignments: vec![],
            subscribed_users: vec![],
        }
    }

    fn assignment(
        dept: Department,
        branch: Option<Branch>,
        team_lead_id: Option<&str>,
        status: AssignmentStatus,
    ) -> DepartmentAssignment {
        DepartmentAssignment {
            id: "ASG-1000".into(),
            ticket_id: "TKT-1000".into(),
            department: dept,
            branch,
            manager_id: None,
            team_lead_id: team_lead_id.map(Into::into),
            status,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn only_clients_create_tickets() {
        assert!(can_perform(
            &user("c1", Role::Client, None, None),
            Action::CreateTicket,
            None,
            None
        ));
        for role in [Role::ComplianceManager, Role::DeptManager, Role::TeamLead] {
            assert!(!can_perform(
                &user("x", role, None, None),
                Action::CreateTicket,
                None,
                None
            ));
        }
    }

    #[test]
    fn routing_requires_compliance_and_open_ticket() {
        let compliance = user("s1", Role::ComplianceManager, None, None);
        let open = ticket("c1", TicketStatus::ComplianceReview);
        let closed = ticket("c1", TicketStatus::Closed);

        assert!(can_perform(&compliance, Action::AddAssignment, Some(&open), None));
        assert!(!can_perform(&compliance, Action::AddAssignment, Some(&closed), None));
        assert!(!can_perform(
            &user("c1", Role::Client, None, None),
            Action::AddAssignment,
            Some(&open),
            None
        ));
    }

    #[test]
    fn team_lead_assignment_requires_matching_node() {
        let kevin = user("s4", Role::DeptManager, Some(Department::Technical), None);
        let amit = user(
            "s2",
            Role::DeptManager,
            Some(Department::Marketing),
            Some(Branch::Ahm),
        );
        let tech = assignment(Department::Technical, None, None, AssignmentStatus::NotAssigned);
        let mkt_ahm = assignment(
            Department::Marketing,
            Some(Branch::Ahm),
            None,
            AssignmentStatus::NotAssigned,
        );
        let mkt_lko = assignment(
            Department::Marketing,
            Some(Branch::Lko),
            None,
            AssignmentStatus::NotAssigned,
        );

        assert!(can_perform(&kevin, Action::AssignTeamLead, None, Some(&tech)));
        assert!(!can_perform(&kevin, Action::AssignTeamLead, None, Some(&mkt_ahm)));
        assert!(can_perform(&amit, Action::AssignTeamLead, None, Some(&mkt_ahm)));
        assert!(!can_perform(&amit, Action::AssignTeamLead, None, Some(&mkt_lko)));
    }

    #[test]
    fn resolve_requires_owning_team_lead_and_unresolved() {
        let raj = user("s5", Role::TeamLead, Some(Department::Technical), None);
        let sam = user("s7", Role::TeamLead, Some(Department::Resume), None);
        let resolve = Action::UpdateAssignmentStatus(AssignmentStatus::Resolved);

        let theirs = assignment(
            Department::Technical,
            None,
            Some("s5"),
            AssignmentStatus::InProgress,
        );
        let already = assignment(
            Department::Technical,
            None,
            Some("s5"),
            AssignmentStatus::Resolved,
        );

        assert!(can_perform(&raj, resolve, None, Some(&theirs)));
        assert!(!can_perform(&sam, resolve, None, Some(&theirs)));
        assert!(!can_perform(&raj, resolve, None, Some(&already)));
    }

    #[test]
    fn progress_moves_allowed_for_lead_or_node_manager() {
        let progress = Action::UpdateAssignmentStatus(AssignmentStatus::InProgress);
        let asgn = assignment(
            Department::Sales,
            None,
            Some("s9"),
            AssignmentStatus::Assigned,
        );

        let john = user("s9", Role::TeamLead, Some(Department::Sales), None);
        let victor = user("s8", Role::DeptManager, Some(Department::Sales), None);
        let kevin = user("s4", Role::DeptManager, Some(Department::Technical), None);

        assert!(can_perform(&john, progress, None, Some(&asgn)));
        assert!(can_perform(&victor, progress, None, Some(&asgn)));
        assert!(!can_perform(&kevin, progress, None, Some(&asgn)));
        assert!(!can_perform(
            &user("s1", Role::ComplianceManager, None, None),
            progress,
            None,
            Some(&asgn)
        ));
    }

    #[test]
    fn priority_changes_allowed_for_managers_even_when_closed() {
        let closed = ticket("c1", TicketStatus::Closed);
        assert!(can_perform(
            &user("s1", Role::ComplianceManager, None, None),
            Action::ChangePriority,
            Some(&closed),
            None
        ));
        assert!(can_perform(
            &user("s4", Role::DeptManager, Some(Department::Technical), None),
            Action::ChangePriority,
            Some(&closed),
            None
        ));
        assert!(!can_perform(
            &user("c1", Role::Client, None, None),
            Action::ChangePriority,
            Some(&closed),
            None
        ));
    }

    #[test]
    fn closing_requires_compliance_and_ready_status() {
        let close = Action::ChangeStatus(TicketStatus::Closed);
        let compliance = user("s1", Role::ComplianceManager, None, None);

        assert!(can_perform(
            &compliance,
            close,
            Some(&ticket("c1", TicketStatus::ReadyToClose)),
            None
        ));
        assert!(!can_perform(
            &compliance,
            close,
            Some(&ticket("c1", TicketStatus::InResolution)),
            None
        ));
        assert!(!can_perform(
            &user("s4", Role::DeptManager, Some(Department::Technical), None),
            close,
            Some(&ticket("c1", TicketStatus::ReadyToClose)),
            None
        ));
    }

    #[test]
    fn reopen_requires_owning_client_and_closed() {
        let owner = user("c1", Role::Client, None, None);
        let other = user("c2", Role::Client, None, None);

        assert!(can_perform(
            &owner,
            Action::Reopen,
            Some(&ticket("c1", TicketStatus::Closed)),
            None
        ));
        assert!(!can_perform(
            &other,
            Action::Reopen,
            Some(&ticket("c1", TicketStatus::Closed)),
            None
        ));
        assert!(!can_perform(
            &owner,
            Action::Reopen,
            Some(&ticket("c1", TicketStatus::ReadyToClose)),
            None
        ));
    }

    #[test]
    fn contact_updates_blocked_after_close() {
        let owner = user("c1", Role::Client, None, None);
        assert!(can_perform(
            &owner,
            Action::UpdateContact,
            Some(&ticket("c1", TicketStatus::InResolution)),
            None
        ));
        assert!(!can_perform(
            &owner,
            Action::UpdateContact,
            Some(&ticket("c1", TicketStatus::Closed)),
            None
        ));
    }

    #[test]
    fn anyone_toggles_subscription_anytime() {
        let closed = ticket("c1", TicketStatus::Closed);
        for role in [
            Role::Client,
            Role::ComplianceManager,
            Role::DeptManager,
            Role::TeamLead,
        ] {
            assert!(can_perform(
                &user("x", role, None, None),
                Action::ToggleSubscription,
                Some(&closed),
                None
            ));
        }
    }
}
