//! The ticket aggregate: global status lifecycle, priority, contact
//! snapshot, subscriber set, and reopen lineage.

use crate::model::assignment::DepartmentAssignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// The five global ticket states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    ComplianceReview,
    WaitingClient,
    InResolution,
    ReadyToClose,
    Closed,
}

impl TicketStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::ComplianceReview => "compliance_review",
            Self::WaitingClient => "waiting_client",
            Self::InResolution => "in_resolution",
            Self::ReadyToClose => "ready_to_close",
            Self::Closed => "closed",
        }
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `compliance_review -> in_resolution` (first department routed)
    /// - `in_resolution -> waiting_client` (external escalation)
    /// - `waiting_client -> in_resolution`
    /// - `in_resolution -> ready_to_close` (all assignments resolved)
    /// - `waiting_client -> ready_to_close`
    /// - `ready_to_close -> closed` (terminal)
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (self, target),
            (Self::ComplianceReview, Self::InResolution)
                | (Self::InResolution, Self::WaitingClient)
                | (Self::WaitingClient, Self::InResolution)
                | (Self::InResolution, Self::ReadyToClose)
                | (Self::WaitingClient, Self::ReadyToClose)
                | (Self::ReadyToClose, Self::Closed)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by lifecycle rules",
            })
        }
    }
}

/// Error returned when a global status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot transition ticket from {} to {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// The aggregate root.
///
/// Owned exclusively by the engine; assignments have no existence outside
/// their ticket. `reference_id` is shared across the ticket's whole reopen
/// lineage, while `id` is unique to this ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    /// Shared by every ticket in this reopen lineage.
    pub reference_id: String,
    /// Set on tickets created by reopening; links to the superseded ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ticket_id: Option<String>,
    pub client_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub reopen_count: u32,
    /// Always equals `reopen_count > 1`; recomputed, never set directly.
    pub warning_flag: bool,
    /// Point-in-time contact snapshot, independent of the User record.
    pub contact_email: String,
    pub contact_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignments: Vec<DepartmentAssignment>,
    /// User ids opted into updates. Insertion order is irrelevant.
    #[serde(default)]
    pub subscribed_users: Vec<String>,
}

impl Ticket {
    /// The warning flag marks repeat-failure risk: more than one reopen.
    #[must_use]
    pub const fn warning_for(reopen_count: u32) -> bool {
        reopen_count > 1
    }

    /// Look up an assignment by id.
    #[must_use]
    pub fn assignment(&self, assignment_id: &str) -> Option<&DepartmentAssignment> {
        self.assignments.iter().find(|a| a.id == assignment_id)
    }

    /// Mutable lookup, used by command handlers after policy checks pass.
    pub fn assignment_mut(&mut self, assignment_id: &str) -> Option<&mut DepartmentAssignment> {
        self.assignments.iter_mut().find(|a| a.id == assignment_id)
    }

    /// Whether `user_id` is in the subscriber set.
    #[must_use]
    pub fn is_subscribed(&self, user_id: &str) -> bool {
        self.subscribed_users.iter().any(|id| id == user_id)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a priority or ticket status from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTicketEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseTicketEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseTicketEnumError {}

impl FromStr for Priority {
    type Err = ParseTicketEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTicketEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ParseTicketEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliance_review" | "compliance-review" => Ok(Self::ComplianceReview),
            "waiting_client" | "waiting-client" => Ok(Self::WaitingClient),
            "in_resolution" | "in-resolution" => Ok(Self::InResolution),
            "ready_to_close" | "ready-to-close" => Ok(Self::ReadyToClose),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseTicketEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidTransition, Priority, Ticket, TicketStatus};
    use std::str::FromStr;

    #[test]
    fn status_transition_rules() {
        use TicketStatus::{Closed, ComplianceReview, InResolution, ReadyToClose, WaitingClient};

        assert!(ComplianceReview.can_transition_to(InResolution).is_ok());
        assert!(InResolution.can_transition_to(WaitingClient).is_ok());
        assert!(WaitingClient.can_transition_to(InResolution).is_ok());
        assert!(InResolution.can_transition_to(ReadyToClose).is_ok());
        assert!(ReadyToClose.can_transition_to(Closed).is_ok());

        // Closed is terminal.
        for target in [ComplianceReview, WaitingClient, InResolution, ReadyToClose] {
            assert!(Closed.can_transition_to(target).is_err());
        }

        // Cannot skip straight to closed.
        assert!(matches!(
            ComplianceReview.can_transition_to(Closed),
            Err(InvalidTransition {
                from: ComplianceReview,
                to: Closed,
                ..
            })
        ));

        // No-op is rejected.
        assert!(InResolution.can_transition_to(InResolution).is_err());
    }

    #[test]
    fn warning_flag_threshold() {
        assert!(!Ticket::warning_for(0));
        assert!(!Ticket::warning_for(1));
        assert!(Ticket::warning_for(2));
        assert!(Ticket::warning_for(7));
    }

    #[test]
    fn enum_display_parse_roundtrips() {
        for p in [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent] {
            assert_eq!(Priority::from_str(&p.to_string()).unwrap(), p);
        }
        for s in [
            TicketStatus::ComplianceReview,
            TicketStatus::WaitingClient,
            TicketStatus::InResolution,
            TicketStatus::ReadyToClose,
            TicketStatus::Closed,
        ] {
            assert_eq!(TicketStatus::from_str(&s.to_string()).unwrap(), s);
        }
        assert!(Priority::from_str("critical").is_err());
        assert!(TicketStatus::from_str("open").is_err());
    }

    #[test]
    fn enum_json_encoding() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        assert_eq!(
            serde_json::to_string(&TicketStatus::ReadyToClose).unwrap(),
            "\"ready_to_close\""
        );
    }
}
