//! Audit event kinds.
//!
//! One kind per logical mutation. The string representation uses the
//! `ticket.<verb>` dotted format used in serialized audit records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The ten audit event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditKind {
    /// A new ticket entered the system.
    TicketCreated,
    /// A department assignment was routed onto a ticket.
    DeptAssigned,
    /// A team lead was attached to an assignment.
    TeamLeadAssigned,
    /// An assignment's status changed.
    AssignmentUpdated,
    /// The ticket's priority changed.
    PriorityChanged,
    /// The ticket's global status changed.
    StatusChanged,
    /// The contact snapshot was overwritten.
    ContactUpdated,
    /// A user toggled their subscription membership.
    SubscriptionToggled,
    /// A closed ticket was reopened into a new linked ticket.
    Reopened,
    /// The reopen count crossed the repeat-failure threshold.
    WarningFlagTriggered,
}

/// Error returned when parsing an unknown audit kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAuditKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownAuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown audit kind '{}': expected one of ticket.created, \
             ticket.dept_assigned, ticket.team_lead_assigned, \
             ticket.assignment_updated, ticket.priority_changed, \
             ticket.status_changed, ticket.contact_updated, \
             ticket.subscription_toggled, ticket.reopened, ticket.warning_flag",
            self.raw
        )
    }
}

impl std::error::Error for UnknownAuditKind {}

impl AuditKind {
    /// All known kinds in catalog order.
    pub const ALL: [Self; 10] = [
        Self::TicketCreated,
        Self::DeptAssigned,
        Self::TeamLeadAssigned,
        Self::AssignmentUpdated,
        Self::PriorityChanged,
        Self::StatusChanged,
        Self::ContactUpdated,
        Self::SubscriptionToggled,
        Self::Reopened,
        Self::WarningFlagTriggered,
    ];

    /// Return the canonical `ticket.<verb>` string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket.created",
            Self::DeptAssigned => "ticket.dept_assigned",
            Self::TeamLeadAssigned => "ticket.team_lead_assigned",
            Self::AssignmentUpdated => "ticket.assignment_updated",
            Self::PriorityChanged => "ticket.priority_changed",
            Self::StatusChanged => "ticket.status_changed",
            Self::ContactUpdated => "ticket.contact_updated",
            Self::SubscriptionToggled => "ticket.subscription_toggled",
            Self::Reopened => "ticket.reopened",
            Self::WarningFlagTriggered => "ticket.warning_flag",
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditKind {
    type Err = UnknownAuditKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket.created" => Ok(Self::TicketCreated),
            "ticket.dept_assigned" => Ok(Self::DeptAssigned),
            "ticket.team_lead_assigned" => Ok(Self::TeamLeadAssigned),
            "ticket.assignment_updated" => Ok(Self::AssignmentUpdated),
            "ticket.priority_changed" => Ok(Self::PriorityChanged),
            "ticket.status_changed" => Ok(Self::StatusChanged),
            "ticket.contact_updated" => Ok(Self::ContactUpdated),
            "ticket.subscription_toggled" => Ok(Self::SubscriptionToggled),
            "ticket.reopened" => Ok(Self::Reopened),
            "ticket.warning_flag" => Ok(Self::WarningFlagTriggered),
            _ => Err(UnknownAuditKind { raw: s.to_string() }),
        }
    }
}

// Custom serde: serialize as the `ticket.<verb>` string.
impl Serialize for AuditKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuditKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
