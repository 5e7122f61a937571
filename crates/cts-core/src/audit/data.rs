//! Typed before/after payloads for each audit kind.
//!
//! Each kind carries a concretely typed old/new pair rather than opaque
//! snapshots, so replay and display never lose type information. The kind
//! discriminant lives on the enclosing [`AuditEvent`](super::AuditEvent),
//! not inside the payload JSON; use [`AuditData::deserialize_for`] when
//! decoding.

use crate::model::assignment::DepartmentAssignment;
use crate::model::ticket::{Priority, Ticket, TicketStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::kind::AuditKind;

/// Contact snapshot pair recorded by contact updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// Payload for `ticket.created`: the full ticket as born.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedData {
    pub new: Ticket,
}

/// Payload for `ticket.dept_assigned`: full before/after assignment lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptAssignedData {
    pub old: Vec<DepartmentAssignment>,
    pub new: Vec<DepartmentAssignment>,
}

/// Payload for `ticket.team_lead_assigned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLeadAssignedData {
    pub assignment_id: String,
    pub old: Option<String>,
    pub new: String,
}

/// Payload for `ticket.assignment_updated`: full before/after lists, since
/// an assignment update can ripple into ticket-level closure readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentUpdatedData {
    pub old: Vec<DepartmentAssignment>,
    pub new: Vec<DepartmentAssignment>,
}

/// Payload for `ticket.priority_changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityChangedData {
    pub old: Priority,
    pub new: Priority,
}

/// Payload for `ticket.status_changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedData {
    pub old: TicketStatus,
    pub new: TicketStatus,
}

/// Payload for `ticket.contact_updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdatedData {
    pub old: ContactInfo,
    pub new: ContactInfo,
}

/// Payload for `ticket.subscription_toggled`: membership before/after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionToggledData {
    pub user_id: String,
    pub old: bool,
    pub new: bool,
}

/// Payload for `ticket.reopened`: source and successor ticket ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReopenedData {
    pub old: String,
    pub new: String,
}

/// Payload for `ticket.warning_flag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFlagData {
    pub old: bool,
    pub new: bool,
}

/// Typed payload for an audit event. The discriminant comes from
/// [`AuditKind`], carried on the enclosing event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditData {
    Created(CreatedData),
    DeptAssigned(DeptAssignedData),
    TeamLeadAssigned(TeamLeadAssignedData),
    AssignmentUpdated(AssignmentUpdatedData),
    PriorityChanged(PriorityChangedData),
    StatusChanged(StatusChangedData),
    ContactUpdated(ContactUpdatedData),
    SubscriptionToggled(SubscriptionToggledData),
    Reopened(ReopenedData),
    WarningFlag(WarningFlagData),
}

impl AuditData {
    /// The kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> AuditKind {
        match self {
            Self::Created(_) => AuditKind::TicketCreated,
            Self::DeptAssigned(_) => AuditKind::DeptAssigned,
            Self::TeamLeadAssigned(_) => AuditKind::TeamLeadAssigned,
            Self::AssignmentUpdated(_) => AuditKind::AssignmentUpdated,
            Self::PriorityChanged(_) => AuditKind::PriorityChanged,
            Self::StatusChanged(_) => AuditKind::StatusChanged,
            Self::ContactUpdated(_) => AuditKind::ContactUpdated,
            Self::SubscriptionToggled(_) => AuditKind::SubscriptionToggled,
            Self::Reopened(_) => AuditKind::Reopened,
            Self::WarningFlag(_) => AuditKind::WarningFlagTriggered,
        }
    }

    /// Deserialize a JSON value into the correct variant for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`DataParseError`] if the value does not match the payload
    /// schema for the given kind.
    pub fn deserialize_for(
        kind: AuditKind,
        value: serde_json::Value,
    ) -> Result<Self, DataParseError> {
        let result = match kind {
            AuditKind::TicketCreated => serde_json::from_value(value).map(AuditData::Created),
            AuditKind::DeptAssigned => serde_json::from_value(value).map(AuditData::DeptAssigned),
            AuditKind::TeamLeadAssigned => {
                serde_json::from_value(value).map(AuditData::TeamLeadAssigned)
            }
            AuditKind::AssignmentUpdated => {
                serde_json::from_value(value).map(AuditData::AssignmentUpdated)
            }
            AuditKind::PriorityChanged => {
                serde_json::from_value(value).map(AuditData::PriorityChanged)
            }
            AuditKind::StatusChanged => serde_json::from_value(value).map(AuditData::StatusChanged),
            AuditKind::ContactUpdated => {
                serde_json::from_value(value).map(AuditData::ContactUpdated)
            }
            AuditKind::SubscriptionToggled => {
                serde_json::from_value(value).map(AuditData::SubscriptionToggled)
            }
            AuditKind::Reopened => serde_json::from_value(value).map(AuditData::Reopened),
            AuditKind::WarningFlagTriggered => {
                serde_json::from_value(value).map(AuditData::WarningFlag)
            }
        };
        result.map_err(|source| DataParseError { kind, source })
    }

    /// Serialize the payload to a [`serde_json::Value`].
    ///
    /// # Errors
    ///
    /// Returns an error if the inner struct fails to serialize (should not
    /// happen with well-formed data).
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Created(d) => serde_json::to_value(d),
            Self::DeptAssigned(d) => serde_json::to_value(d),
            Self::TeamLeadAssigned(d) => serde_json::to_value(d),
            Self::AssignmentUpdated(d) => serde_json::to_value(d),
            Self::PriorityChanged(d) => serde_json::to_value(d),
            Self::StatusChanged(d) => serde_json::to_value(d),
            Self::ContactUpdated(d) => serde_json::to_value(d),
            Self::SubscriptionToggled(d) => serde_json::to_value(d),
            Self::Reopened(d) => serde_json::to_value(d),
            Self::WarningFlag(d) => serde_json::to_value(d),
        }
    }
}

/// Error returned when decoding an event's payload fails.
#[derive(Debug)]
pub struct DataParseError {
    /// The kind that was being decoded.
    pub kind: AuditKind,
    /// The underlying JSON error.
    pub source: serde_json::Error,
}

impl fmt::Display for DataParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} data payload: {}", self.kind, self.source)
    }
}

impl std::error::Error for DataParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
