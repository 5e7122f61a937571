//! The ticket state machine and command engine.
//!
//! [`Engine`] is the single authoritative state holder: it owns every
//! ticket (with its embedded assignment list), the append-only audit log,
//! and the id generator. Commands are role-gated through the access
//! policy, applied atomically per ticket, and each successful mutation
//! records exactly one primary audit event.
//!
//! # Concurrency
//!
//! Mutations to one ticket are serialized by a per-ticket mutex; commands
//! against different tickets run in parallel. The ticket map itself is
//! behind an `RwLock` taken only to resolve ids and to insert newly
//! created tickets, never across a mutation. Readers clone fully committed
//! snapshots and never observe a ticket mid-update.

pub mod query;
pub mod state;

use crate::audit::data::{
    AssignmentUpdatedData, AuditData, ContactInfo, ContactUpdatedData, CreatedData,
    DeptAssignedData, PriorityChangedData, ReopenedData, StatusChangedData,
    SubscriptionToggledData, TeamLeadAssignedData, WarningFlagData,
};
use crate::audit::{AuditEvent, AuditLog};
use crate::contact::normalize_phone;
use crate::error::{EngineError, EntityKind, Result};
use crate::id::IdGenerator;
use crate::model::assignment::{AssignmentStatus, DepartmentAssignment, ready_to_close};
use crate::model::ticket::{Priority, Ticket, TicketStatus};
use crate::model::user::{Branch, Department, Role, User};
use crate::policy::{Action, authorize};
use crate::roster::Roster;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Input for `create_ticket`.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub contact_email: String,
    pub contact_phone: String,
}

#[derive(Debug, Default)]
struct TicketMap {
    by_id: HashMap<String, Arc<Mutex<Ticket>>>,
    /// Ticket ids in creation order.
    order: Vec<String>,
    /// reference_id -> id of the lineage's current (most recent) ticket.
    current: HashMap<String, String>,
}

/// The single authoritative state holder.
#[derive(Debug)]
pub struct Engine {
    tickets: RwLock<TicketMap>,
    audit: AuditLog,
    ids: IdGenerator,
    roster: Roster,
}

impl Engine {
    /// An empty engine backed by the given staff roster.
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        Self {
            tickets: RwLock::new(TicketMap::default()),
            audit: AuditLog::new(),
            ids: IdGenerator::default(),
            roster,
        }
    }

    /// The staff roster this engine consults.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The audit log (read-only surface: queries only).
    #[must_use]
    pub const fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Create a new ticket for the acting client.
    ///
    /// The ticket starts in `compliance_review` with no assignments, a
    /// fresh lineage reference, and the actor as sole subscriber.
    ///
    /// # Errors
    ///
    /// Validation on empty required fields or a phone that does not
    /// normalize to 10 digits; authorization unless the actor is a client.
    pub fn create_ticket(&self, actor: &User, input: NewTicket) -> Result<Ticket> {
        authorize(actor, Action::CreateTicket, None, None)?;
        require_field("title", &input.title)?;
        require_field("description", &input.description)?;
        require_field("contact email", &input.contact_email)?;
        let phone = normalize_phone(&input.contact_phone)
            .map_err(|e| EngineError::validation(e.to_string()))?;

        let now = Utc::now();
        let ticket = Ticket {
            id: self.ids.next_ticket(),
            reference_id: self.ids.next_reference(),
            parent_ticket_id: None,
            client_id: actor.id.clone(),
            title: input.title,
            description: input.description,
            priority: input.priority,
            status: TicketStatus::ComplianceReview,
            reopen_count: 0,
            warning_flag: false,
            contact_email: input.contact_email,
            contact_phone: phone,
            created_at: now,
            updated_at: now,
            closed_at: None,
            assignments: Vec::new(),
            subscribed_users: vec![actor.id.clone()],
        };

        let event = self.event(
            &ticket,
            actor,
            AuditData::Created(CreatedData {
                new: ticket.clone(),
            }),
            "Initial creation",
        );

        let mut map = self.write_map();
        map.by_id
            .insert(ticket.id.clone(), Arc::new(Mutex::new(ticket.clone())));
        map.order.push(ticket.id.clone());
        map.current
            .insert(ticket.reference_id.clone(), ticket.id.clone());
        self.audit.record(event)?;
        drop(map);

        tracing::info!(ticket = %ticket.id, client = %actor.id, "ticket created");
        Ok(ticket)
    }

    /// Route a department (and, for Marketing, a branch) onto a ticket.
    ///
    /// The first routed assignment moves the ticket from
    /// `compliance_review` to `in_resolution`.
    ///
    /// # Errors
    ///
    /// Validation for a missing reason, a Marketing assignment without a
    /// branch, a branch on a non-Marketing department, or routing to
    /// Compliance; conflict on duplicate (department, branch) routing.
    pub fn add_department_assignment(
        &self,
        actor: &User,
        ticket_id: &str,
        department: Department,
        branch: Option<Branch>,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        if !Department::ROUTABLE.contains(&department) {
            return Err(EngineError::validation(format!(
                "cannot route a ticket to {department}"
            )));
        }
        if department == Department::Marketing && branch.is_none() {
            return Err(EngineError::validation(
                "marketing assignments require a branch",
            ));
        }
        if department != Department::Marketing && branch.is_some() {
            return Err(EngineError::validation(
                "only marketing assignments carry a branch",
            ));
        }

        self.with_ticket(ticket_id, |ticket| {
            authorize(actor, Action::AddAssignment, Some(ticket), None)?;
            if ticket
                .assignments
                .iter()
                .any(|a| a.routes_to(department, branch))
            {
                return Err(EngineError::conflict(format!(
                    "ticket {ticket_id} is already routed to {department}{}",
                    branch.map(|b| format!("/{b}")).unwrap_or_default()
                )));
            }

            let old = ticket.assignments.clone();
            let now = Utc::now();
            ticket.assignments.push(DepartmentAssignment {
                id: self.ids.next_assignment(),
                ticket_id: ticket.id.clone(),
                department,
                branch,
                manager_id: None,
                team_lead_id: None,
                status: AssignmentStatus::NotAssigned,
                created_at: now,
                resolved_at: None,
            });
            if ticket.status == TicketStatus::ComplianceReview {
                ticket.status = TicketStatus::InResolution;
            }
            refresh_closure_readiness(ticket);
            ticket.updated_at = now;

            let event = self.event(
                ticket,
                actor,
                AuditData::DeptAssigned(DeptAssignedData {
                    old,
                    new: ticket.assignments.clone(),
                }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(ticket = %ticket.id, %department, "department routed");
            Ok(ticket.clone())
        })
    }

    /// Attach a team lead to an assignment and mark it `assigned`.
    ///
    /// The lead must exist in the roster, hold the team-lead role, and
    /// belong to the assignment's department. Re-assigning an
    /// already-led assignment is rejected.
    ///
    /// # Errors
    ///
    /// Not-found for unknown ticket/assignment/lead; conflict when a lead
    /// is already attached; validation when the roster entry is not an
    /// eligible team lead.
    pub fn assign_team_lead(
        &self,
        actor: &User,
        ticket_id: &str,
        assignment_id: &str,
        team_lead_id: &str,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        let lead = self
            .roster
            .find(team_lead_id)
            .ok_or_else(|| EngineError::not_found(EntityKind::User, team_lead_id))?
            .clone();

        self.with_ticket(ticket_id, |ticket| {
            let assignment = ticket
                .assignment(assignment_id)
                .ok_or_else(|| EngineError::not_found(EntityKind::Assignment, assignment_id))?;
            authorize(actor, Action::AssignTeamLead, Some(ticket), Some(assignment))?;

            if let Some(existing) = &assignment.team_lead_id {
                return Err(EngineError::conflict(format!(
                    "assignment {assignment_id} already has team lead {existing}"
                )));
            }
            if lead.role != Role::TeamLead {
                return Err(EngineError::validation(format!(
                    "{} is not a team lead",
                    lead.id
                )));
            }
            if lead.department != Some(assignment.department) {
                return Err(EngineError::validation(format!(
                    "{} does not belong to {}",
                    lead.id, assignment.department
                )));
            }

            let department = assignment.department;
            let now = Utc::now();
            // Lookups above hold an immutable borrow; re-borrow mutably.
            let Some(assignment) = ticket.assignment_mut(assignment_id) else {
                return Err(EngineError::not_found(EntityKind::Assignment, assignment_id));
            };
            assignment.team_lead_id = Some(lead.id.clone());
            assignment.manager_id = Some(actor.id.clone());
            assignment.status = AssignmentStatus::Assigned;
            refresh_closure_readiness(ticket);
            ticket.updated_at = now;

            let event = self.event(
                ticket,
                actor,
                AuditData::TeamLeadAssigned(TeamLeadAssignedData {
                    assignment_id: assignment_id.to_string(),
                    old: None,
                    new: lead.id.clone(),
                }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(ticket = %ticket.id, lead = %lead.id, %department, "team lead assigned");
            Ok(ticket.clone())
        })
    }

    /// Move an assignment to a new status and recompute closure readiness.
    ///
    /// When every assignment is resolved (and at least one exists) the
    /// ticket is promoted to `ready_to_close`.
    ///
    /// # Errors
    ///
    /// Conflict when the assignment is already in the target status;
    /// authorization per the policy table for the target status.
    pub fn update_assignment_status(
        &self,
        actor: &User,
        ticket_id: &str,
        assignment_id: &str,
        status: AssignmentStatus,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        self.with_ticket(ticket_id, |ticket| {
            let assignment = ticket
                .assignment(assignment_id)
                .ok_or_else(|| EngineError::not_found(EntityKind::Assignment, assignment_id))?;
            if assignment.status == status {
                return Err(EngineError::conflict(format!(
                    "assignment {assignment_id} is already {status}"
                )));
            }
            authorize(
                actor,
                Action::UpdateAssignmentStatus(status),
                Some(ticket),
                Some(assignment),
            )?;

            let old = ticket.assignments.clone();
            let now = Utc::now();
            let Some(assignment) = ticket.assignment_mut(assignment_id) else {
                return Err(EngineError::not_found(EntityKind::Assignment, assignment_id));
            };
            assignment.status = status;
            assignment.resolved_at = (status == AssignmentStatus::Resolved).then_some(now);
            refresh_closure_readiness(ticket);
            ticket.updated_at = now;

            let event = self.event(
                ticket,
                actor,
                AuditData::AssignmentUpdated(AssignmentUpdatedData {
                    old,
                    new: ticket.assignments.clone(),
                }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(
                ticket = %ticket.id,
                assignment = %assignment_id,
                %status,
                ticket_status = %ticket.status,
                "assignment updated"
            );
            Ok(ticket.clone())
        })
    }

    /// Change the ticket's priority.
    ///
    /// # Errors
    ///
    /// Authorization unless the actor is a compliance or department
    /// manager; validation for a missing reason.
    pub fn update_ticket_priority(
        &self,
        actor: &User,
        ticket_id: &str,
        priority: Priority,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        self.with_ticket(ticket_id, |ticket| {
            authorize(actor, Action::ChangePriority, Some(ticket), None)?;
            let old = ticket.priority;
            ticket.priority = priority;
            ticket.updated_at = Utc::now();

            let event = self.event(
                ticket,
                actor,
                AuditData::PriorityChanged(PriorityChangedData { old, new: priority }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(ticket = %ticket.id, %old, new = %priority, "priority changed");
            Ok(ticket.clone())
        })
    }

    /// Manually change the ticket's global status.
    ///
    /// This is the closure path: moving to `closed` stamps `closed_at`.
    /// The transition must be a valid lifecycle edge.
    ///
    /// # Errors
    ///
    /// Conflict on an edge the lifecycle does not define; authorization
    /// per the policy table (closing requires compliance and a
    /// `ready_to_close` ticket).
    pub fn update_ticket_status(
        &self,
        actor: &User,
        ticket_id: &str,
        status: TicketStatus,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        self.with_ticket(ticket_id, |ticket| {
            authorize(actor, Action::ChangeStatus(status), Some(ticket), None)?;
            ticket
                .status
                .can_transition_to(status)
                .map_err(|e| EngineError::conflict(e.to_string()))?;

            let old = ticket.status;
            let now = Utc::now();
            ticket.status = status;
            if status == TicketStatus::Closed {
                ticket.closed_at = Some(now);
            }
            ticket.updated_at = now;

            let event = self.event(
                ticket,
                actor,
                AuditData::StatusChanged(StatusChangedData { old, new: status }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(ticket = %ticket.id, %old, new = %status, "status changed");
            Ok(ticket.clone())
        })
    }

    /// Overwrite the ticket's contact snapshot. The User record is never
    /// touched.
    ///
    /// # Errors
    ///
    /// Validation for an empty email or a malformed phone; authorization
    /// unless the acting client owns the (still open) ticket.
    pub fn update_ticket_contact(
        &self,
        actor: &User,
        ticket_id: &str,
        email: &str,
        phone: &str,
        reason: &str,
    ) -> Result<Ticket> {
        require_reason(reason)?;
        require_field("contact email", email)?;
        let phone =
            normalize_phone(phone).map_err(|e| EngineError::validation(e.to_string()))?;

        self.with_ticket(ticket_id, |ticket| {
            authorize(actor, Action::UpdateContact, Some(ticket), None)?;
            let old = ContactInfo {
                email: ticket.contact_email.clone(),
                phone: ticket.contact_phone.clone(),
            };
            ticket.contact_email = email.to_string();
            ticket.contact_phone = phone.clone();
            ticket.updated_at = Utc::now();

            let event = self.event(
                ticket,
                actor,
                AuditData::ContactUpdated(ContactUpdatedData {
                    old,
                    new: ContactInfo {
                        email: email.to_string(),
                        phone: phone.clone(),
                    },
                }),
                reason,
            );
            self.audit.record(event)?;
            tracing::info!(ticket = %ticket.id, "contact snapshot updated");
            Ok(ticket.clone())
        })
    }

    /// Toggle the actor's membership in the ticket's subscriber set.
    ///
    /// Open to any authenticated actor at any ticket status; the audit
    /// reason is synthesized.
    ///
    /// # Errors
    ///
    /// Not-found for an unknown ticket id.
    pub fn toggle_subscription(&self, actor: &User, ticket_id: &str) -> Result<Ticket> {
        self.with_ticket(ticket_id, |ticket| {
            authorize(actor, Action::ToggleSubscription, Some(ticket), None)?;
            let was_subscribed = ticket.is_subscribed(&actor.id);
            if was_subscribed {
                ticket.subscribed_users.retain(|id| id != &actor.id);
            } else {
                ticket.subscribed_users.push(actor.id.clone());
            }
            ticket.updated_at = Utc::now();

            let reason = if was_subscribed {
                "User unsubscribed from updates"
            } else {
                "User subscribed to updates"
            };
            let event = self.event(
                ticket,
                actor,
                AuditData::SubscriptionToggled(SubscriptionToggledData {
                    user_id: actor.id.clone(),
                    old: was_subscribed,
                    new: !was_subscribed,
                }),
                reason,
            );
            self.audit.record(event)?;
            tracing::debug!(ticket = %ticket.id, user = %actor.id, subscribed = !was_subscribed, "subscription toggled");
            Ok(ticket.clone())
        })
    }

    /// Reopen a closed ticket into a new linked ticket in the same lineage.
    ///
    /// The source is left untouched as a historical record; the successor
    /// copies its descriptive fields, resets its workflow state, and bumps
    /// the reopen count. Crossing the repeat-failure threshold
    /// (`reopen_count > 1`) records an additional warning-flag event.
    ///
    /// # Errors
    ///
    /// Authorization unless the acting client owns the closed ticket;
    /// conflict when the ticket has already been superseded by an earlier
    /// reopen.
    pub fn reopen_ticket(&self, actor: &User, ticket_id: &str, reason: &str) -> Result<Ticket> {
        require_reason(reason)?;
        let source_handle = self.handle(ticket_id)?;
        let source = lock_ticket(&source_handle);
        authorize(actor, Action::Reopen, Some(&source), None)?;

        let reopen_count = source.reopen_count + 1;
        let warning = Ticket::warning_for(reopen_count);
        let now = Utc::now();
        let successor = Ticket {
            id: self.ids.next_ticket(),
            reference_id: source.reference_id.clone(),
            parent_ticket_id: Some(source.id.clone()),
            client_id: source.client_id.clone(),
            title: source.title.clone(),
            description: source.description.clone(),
            priority: source.priority,
            status: TicketStatus::ComplianceReview,
            reopen_count,
            warning_flag: warning,
            contact_email: source.contact_email.clone(),
            contact_phone: source.contact_phone.clone(),
            created_at: now,
            updated_at: now,
            closed_at: None,
            assignments: Vec::new(),
            subscribed_users: vec![actor.id.clone()],
        };

        let reopen_event = self.event(
            &successor,
            actor,
            AuditData::Reopened(ReopenedData {
                old: source.id.clone(),
                new: successor.id.clone(),
            }),
            reason,
        );

        let mut map = self.write_map();
        // A superseded ticket stays closed forever; only the lineage's
        // current ticket may spawn a successor.
        if map.current.get(&source.reference_id) != Some(&source.id) {
            return Err(EngineError::conflict(format!(
                "ticket {ticket_id} has already been reopened"
            )));
        }
        map.by_id.insert(
            successor.id.clone(),
            Arc::new(Mutex::new(successor.clone())),
        );
        map.order.push(successor.id.clone());
        map.current
            .insert(successor.reference_id.clone(), successor.id.clone());
        self.audit.record(reopen_event)?;
        if warning {
            let warning_event = self.event(
                &successor,
                actor,
                AuditData::WarningFlag(WarningFlagData {
                    old: false,
                    new: true,
                }),
                "Reopen count > 1",
            );
            self.audit.record(warning_event)?;
        }
        drop(map);
        drop(source);

        tracing::info!(
            source = %ticket_id,
            successor = %successor.id,
            reopen_count,
            warning,
            "ticket reopened"
        );
        Ok(successor)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Resolve a ticket id to its shared handle.
    fn handle(&self, ticket_id: &str) -> Result<Arc<Mutex<Ticket>>> {
        self.read_map()
            .by_id
            .get(ticket_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Ticket, ticket_id))
    }

    /// Run `f` against the ticket with the per-ticket lock held.
    ///
    /// The map lock is released before the ticket lock is taken, so
    /// holders of the ticket lock never block map writers through a
    /// reader.
    fn with_ticket<T>(&self, ticket_id: &str, f: impl FnOnce(&mut Ticket) -> Result<T>) -> Result<T> {
        let handle = self.handle(ticket_id)?;
        let mut ticket = lock_ticket(&handle);
        f(&mut ticket)
    }

    /// Build an audit event for `ticket` (not yet recorded).
    fn event(&self, ticket: &Ticket, actor: &User, data: AuditData, reason: &str) -> AuditEvent {
        AuditEvent {
            id: self.ids.next_event(),
            ticket_id: ticket.id.clone(),
            reference_id: ticket.reference_id.clone(),
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            data,
            reason: reason.to_string(),
            created_at: Utc::now(),
            seq: 0,
        }
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, TicketMap> {
        self.tickets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, TicketMap> {
        self.tickets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(crate::roster::default_roster())
    }
}

fn lock_ticket(handle: &Arc<Mutex<Ticket>>) -> MutexGuard<'_, Ticket> {
    // A poisoned ticket still holds only fully committed state: every
    // command validates before mutating.
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Closure rule, applied after every assignment mutation: promote to
/// `ready_to_close` when the full (non-empty) assignment set is resolved;
/// demote back to `in_resolution` when a ready ticket gains unresolved
/// work. Closed tickets are never touched.
fn refresh_closure_readiness(ticket: &mut Ticket) {
    if ticket.status == TicketStatus::Closed {
        return;
    }
    if ready_to_close(&ticket.assignments) {
        ticket.status = TicketStatus::ReadyToClose;
    } else if ticket.status == TicketStatus::ReadyToClose {
        ticket.status = TicketStatus::InResolution;
    }
}

fn require_reason(reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(EngineError::validation("a reason is required"));
    }
    Ok(())
}

fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Engine, NewTicket};
    use crate::error::EngineError;
    use crate::model::assignment::AssignmentStatus;
    use crate::model::ticket::{Priority, TicketStatus};
    use crate::model::user::{Branch, Department, Role, User};

    fn client(id: &str) -> User {
        User {
            id: id.into(),
            name: "Client".into(),
            email: format!("{id}@example.com"),
            phone: "+15550000000".into(),
            role: Role::Client,
            department: None,
            branch: None,
        }
    }

    fn staff(engine: &Engine, id: &str) -> User {
        engine.roster().find(id).expect("staff id in roster").clone()
    }

    fn new_ticket() -> NewTicket {
        NewTicket {
            title: "Broken campaign".into(),
            description: "Ad campaign stopped delivering".into(),
            priority: Priority::High,
            contact_email: "client@example.com".into(),
            contact_phone: "555-012-3456".into(),
        }
    }

    #[test]
    fn create_normalizes_phone_and_subscribes_client() {
        let engine = Engine::default();
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();

        assert_eq!(ticket.status, TicketStatus::ComplianceReview);
        assert_eq!(ticket.contact_phone, "+15550123456");
        assert_eq!(ticket.subscribed_users, vec!["c1".to_string()]);
        assert_eq!(ticket.reopen_count, 0);
        assert!(!ticket.warning_flag);
        assert!(ticket.assignments.is_empty());
        assert_eq!(engine.audit().by_ticket(&ticket.id).len(), 1);
    }

    #[test]
    fn create_rejects_bad_phone_before_any_state() {
        let engine = Engine::default();
        let mut input = new_ticket();
        input.contact_phone = "555-012-345".into();
        let err = engine.create_ticket(&client("c1"), input).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(engine.all_tickets().is_empty());
        assert!(engine.audit().is_empty());
    }

    #[test]
    fn first_routing_moves_ticket_to_in_resolution() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();

        let updated = engine
            .add_department_assignment(
                &compliance,
                &ticket.id,
                Department::Technical,
                None,
                "Needs engineering review",
            )
            .unwrap();

        assert_eq!(updated.status, TicketStatus::InResolution);
        assert_eq!(updated.assignments.len(), 1);
        assert_eq!(updated.assignments[0].status, AssignmentStatus::NotAssigned);
    }

    #[test]
    fn marketing_requires_branch_and_branches_are_distinct_nodes() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();

        let err = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Marketing, None, "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        engine
            .add_department_assignment(
                &compliance,
                &ticket.id,
                Department::Marketing,
                Some(Branch::Ahm),
                "AHM campaign",
            )
            .unwrap();
        engine
            .add_department_assignment(
                &compliance,
                &ticket.id,
                Department::Marketing,
                Some(Branch::Lko),
                "LKO campaign",
            )
            .unwrap();

        let err = engine
            .add_department_assignment(
                &compliance,
                &ticket.id,
                Department::Marketing,
                Some(Branch::Ahm),
                "again",
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[test]
    fn compliance_is_not_a_routing_target() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let err = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Compliance, None, "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn team_lead_assignment_is_idempotent_reject() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let kevin = staff(&engine, "s4");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let ticket = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Technical, None, "r")
            .unwrap();
        let asgn_id = ticket.assignments[0].id.clone();

        let updated = engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s5", "Raj owns infra")
            .unwrap();
        assert_eq!(updated.assignments[0].status, AssignmentStatus::Assigned);
        assert_eq!(updated.assignments[0].team_lead_id.as_deref(), Some("s5"));
        assert_eq!(updated.assignments[0].manager_id.as_deref(), Some("s4"));

        let before = engine.get_ticket(&ticket.id).unwrap();
        let err = engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s5", "again")
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        assert_eq!(engine.get_ticket(&ticket.id).unwrap(), before);
    }

    #[test]
    fn team_lead_must_match_department() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let kevin = staff(&engine, "s4");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let ticket = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Technical, None, "r")
            .unwrap();
        let asgn_id = ticket.assignments[0].id.clone();

        // s7 is the Resume team lead.
        let err = engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s7", "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn resolving_every_assignment_promotes_to_ready() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let kevin = staff(&engine, "s4");
        let raj = staff(&engine, "s5");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let ticket = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Technical, None, "r")
            .unwrap();
        let asgn_id = ticket.assignments[0].id.clone();
        engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s5", "r")
            .unwrap();

        let updated = engine
            .update_assignment_status(&raj, &ticket.id, &asgn_id, AssignmentStatus::Resolved, "Fixed")
            .unwrap();
        assert_eq!(updated.status, TicketStatus::ReadyToClose);
        assert!(updated.assignments[0].resolved_at.is_some());
    }

    #[test]
    fn routing_new_work_onto_ready_ticket_demotes_it() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let kevin = staff(&engine, "s4");
        let raj = staff(&engine, "s5");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let ticket = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Technical, None, "r")
            .unwrap();
        let asgn_id = ticket.assignments[0].id.clone();
        engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s5", "r")
            .unwrap();
        engine
            .update_assignment_status(&raj, &ticket.id, &asgn_id, AssignmentStatus::Resolved, "r")
            .unwrap();

        let updated = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Sales, None, "more work")
            .unwrap();
        assert_eq!(updated.status, TicketStatus::InResolution);
    }

    #[test]
    fn double_resolve_is_a_conflict_and_leaves_state_unchanged() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let kevin = staff(&engine, "s4");
        let raj = staff(&engine, "s5");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();
        let ticket = engine
            .add_department_assignment(&compliance, &ticket.id, Department::Technical, None, "r")
            .unwrap();
        let asgn_id = ticket.assignments[0].id.clone();
        engine
            .assign_team_lead(&kevin, &ticket.id, &asgn_id, "s5", "r")
            .unwrap();
        engine
            .update_assignment_status(&raj, &ticket.id, &asgn_id, AssignmentStatus::Resolved, "r")
            .unwrap();

        let before = engine.get_ticket(&ticket.id).unwrap();
        let events_before = engine.audit().len();
        let err = engine
            .update_assignment_status(&raj, &ticket.id, &asgn_id, AssignmentStatus::Resolved, "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        assert_eq!(engine.get_ticket(&ticket.id).unwrap(), before);
        assert_eq!(engine.audit().len(), events_before);
    }

    #[test]
    fn closing_requires_ready_and_stamps_closed_at() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();

        // Not ready yet: compliance may not close.
        let err = engine
            .update_ticket_status(&compliance, &ticket.id, TicketStatus::Closed, "done")
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization { .. }));
    }

    #[test]
    fn contact_update_touches_snapshot_only() {
        let engine = Engine::default();
        let owner = client("c1");
        let ticket = engine.create_ticket(&owner, new_ticket()).unwrap();

        let updated = engine
            .update_ticket_contact(
                &owner,
                &ticket.id,
                "new@example.com",
                "555 999 8877",
                "Moved house",
            )
            .unwrap();
        assert_eq!(updated.contact_email, "new@example.com");
        assert_eq!(updated.contact_phone, "+15559998877");

        let err = engine
            .update_ticket_contact(&client("c2"), &ticket.id, "x@example.com", "5550123456", "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization { .. }));
    }

    #[test]
    fn subscription_toggles_both_ways() {
        let engine = Engine::default();
        let owner = client("c1");
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&owner, new_ticket()).unwrap();

        let t = engine.toggle_subscription(&compliance, &ticket.id).unwrap();
        assert!(t.is_subscribed("s1"));
        let t = engine.toggle_subscription(&compliance, &ticket.id).unwrap();
        assert!(!t.is_subscribed("s1"));

        let events = engine.audit().by_ticket(&ticket.id);
        let reasons: Vec<_> = events.iter().map(|e| e.reason.as_str()).collect();
        assert!(reasons.contains(&"User subscribed to updates"));
        assert!(reasons.contains(&"User unsubscribed from updates"));
    }

    #[test]
    fn missing_reason_is_rejected_before_mutation() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let ticket = engine.create_ticket(&client("c1"), new_ticket()).unwrap();

        let err = engine
            .update_ticket_priority(&compliance, &ticket.id, Priority::Urgent, "  ")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(engine.get_ticket(&ticket.id).unwrap().priority, Priority::High);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let engine = Engine::default();
        let compliance = staff(&engine, "s1");
        let err = engine
            .update_ticket_priority(&compliance, "TKT-9999", Priority::Low, "r")
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }
}
