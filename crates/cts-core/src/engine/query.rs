//! Read-side of the engine: role-scoped listings and lookups.
//!
//! Every query returns fully committed clones, sorted newest-first for
//! display. Visibility follows the role scoping rules: clients see their
//! own tickets, department staff see their routed work, compliance sees
//! everything.

use super::Engine;
use crate::error::{EngineError, EntityKind, Result};
use crate::model::assignment::DepartmentAssignment;
use crate::model::ticket::{Ticket, TicketStatus};
use crate::model::user::{Role, User};

impl Engine {
    /// Fetch one ticket by id.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] for an unknown id.
    pub fn get_ticket(&self, ticket_id: &str) -> Result<Ticket> {
        let handle = self
            .read_map()
            .by_id
            .get(ticket_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Ticket, ticket_id))?;
        let ticket = handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(ticket.clone())
    }

    /// Every ticket, newest first.
    #[must_use]
    pub fn all_tickets(&self) -> Vec<Ticket> {
        self.collect(|_| true)
    }

    /// Tickets created by one client, newest first. Includes closed and
    /// superseded tickets in every lineage.
    #[must_use]
    pub fn client_ledger(&self, client_id: &str) -> Vec<Ticket> {
        self.collect(|t| t.client_id == client_id)
    }

    /// Tickets still awaiting routing, newest first.
    #[must_use]
    pub fn compliance_queue(&self) -> Vec<Ticket> {
        self.collect(|t| t.status == TicketStatus::ComplianceReview)
    }

    /// Tickets routed to the actor's department node, newest first.
    ///
    /// An assignment matches when its department equals the actor's and,
    /// for branch-scoped staff, either side lacks a branch or the
    /// branches agree.
    #[must_use]
    pub fn work_queue(&self, actor: &User) -> Vec<Ticket> {
        let Some(department) = actor.department else {
            return Vec::new();
        };
        self.collect(|t| {
            t.assignments
                .iter()
                .any(|a| assignment_matches(a, department, actor))
        })
    }

    /// The listing the actor is entitled to, per their role.
    #[must_use]
    pub fn tickets_for(&self, actor: &User) -> Vec<Ticket> {
        match actor.role {
            Role::Client => self.client_ledger(&actor.id),
            Role::ComplianceManager => self.all_tickets(),
            Role::DeptManager | Role::TeamLead => self.work_queue(actor),
        }
    }

    fn collect(&self, keep: impl Fn(&Ticket) -> bool) -> Vec<Ticket> {
        let map = self.read_map();
        let mut out: Vec<Ticket> = map
            .order
            .iter()
            .filter_map(|id| map.by_id.get(id))
            .map(|h| {
                h.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone()
            })
            .filter(|t| keep(t))
            .collect();
        out.reverse();
        out
    }
}

fn assignment_matches(
    assignment: &DepartmentAssignment,
    department: crate::model::user::Department,
    actor: &User,
) -> bool {
    assignment.department == department
        && (assignment.branch.is_none()
            || actor.branch.is_none()
            || assignment.branch == actor.branch)
}
