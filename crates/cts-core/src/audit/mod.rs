//! Append-only audit trail.
//!
//! Every successful mutation writes exactly one primary [`AuditEvent`]
//! (reopen additionally writes a warning-flag event when the threshold is
//! crossed). Events are never mutated or deleted; replaying them in
//! canonical order reconstructs who did what and why.

pub mod data;
pub mod kind;
pub mod log;

pub use data::{AuditData, ContactInfo};
pub use kind::AuditKind;
pub use log::AuditLog;

use crate::model::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable audit record.
///
/// `seq` is the insertion sequence assigned by the log; it breaks
/// `created_at` ties in the canonical replay order (ascending). Display
/// order is descending `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: String,
    pub ticket_id: String,
    /// Lineage key: shared by every ticket produced by reopening.
    pub reference_id: String,
    pub actor_id: String,
    pub actor_role: Role,
    /// Typed before/after payload; determines the event kind.
    pub data: AuditData,
    /// Mandatory, non-empty justification.
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, assigned by the log on record.
    pub seq: u64,
}

impl AuditEvent {
    /// The event kind, derived from the payload.
    #[must_use]
    pub const fn kind(&self) -> AuditKind {
        self.data.kind()
    }
}

// Serialized form: the kind is externalized next to the payload so decoding
// can dispatch on it (the payload JSON itself is untagged).
#[derive(Serialize, Deserialize)]
struct RawEvent {
    id: String,
    ticket_id: String,
    reference_id: String,
    kind: AuditKind,
    actor_id: String,
    actor_role: Role,
    data: serde_json::Value,
    reason: String,
    created_at: DateTime<Utc>,
    seq: u64,
}

impl Serialize for AuditEvent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = self
            .data
            .to_json_value()
            .map_err(serde::ser::Error::custom)?;
        let raw = RawEvent {
            id: self.id.clone(),
            ticket_id: self.ticket_id.clone(),
            reference_id: self.reference_id.clone(),
            kind: self.kind(),
            actor_id: self.actor_id.clone(),
            actor_role: self.actor_role,
            data,
            reason: self.reason.clone(),
            created_at: self.created_at,
            seq: self.seq,
        };
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AuditEvent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEvent::deserialize(deserializer)?;
        let data =
            AuditData::deserialize_for(raw.kind, raw.data).map_err(serde::de::Error::custom)?;
        Ok(Self {
            id: raw.id,
            ticket_id: raw.ticket_id,
            reference_id: raw.reference_id,
            actor_id: raw.actor_id,
            actor_role: raw.actor_role,
            data,
            reason: raw.reason,
            created_at: raw.created_at,
            seq: raw.seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::data::{AuditData, PriorityChangedData};
    use super::{AuditEvent, AuditKind};
    use crate::model::ticket::Priority;
    use crate::model::user::Role;
    use chrono::Utc;

    fn sample_event() -> AuditEvent {
        AuditEvent {
            id: "EVT-1000".into(),
            ticket_id: "TKT-1000".into(),
            reference_id: "REF-1000".into(),
            actor_id: "s1".into(),
            actor_role: Role::ComplianceManager,
            data: AuditData::PriorityChanged(PriorityChangedData {
                old: Priority::Medium,
                new: Priority::Urgent,
            }),
            reason: "Client escalation".into(),
            created_at: Utc::now(),
            seq: 3,
        }
    }

    #[test]
    fn kind_derived_from_payload() {
        assert_eq!(sample_event().kind(), AuditKind::PriorityChanged);
    }

    #[test]
    fn serde_roundtrip_preserves_typed_payload() {
        let event = sample_event();
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"ticket.priority_changed\""), "{json}");

        let back: AuditEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn serialized_record_externalizes_kind() {
        let value = serde_json::to_value(sample_event()).expect("serialize");
        assert_eq!(value["kind"], "ticket.priority_changed");
        assert_eq!(value["data"]["old"], "medium");
        assert_eq!(value["data"]["new"], "urgent");
    }

    #[test]
    fn mismatched_payload_fails_decode() {
        let mut value = serde_json::to_value(sample_event()).expect("serialize");
        value["kind"] = "ticket.warning_flag".into();
        assert!(serde_json::from_value::<AuditEvent>(value).is_err());
    }
}
