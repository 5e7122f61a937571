//! The append-only audit store.

use super::AuditEvent;
use crate::error::{EngineError, Result};
use std::sync::{Mutex, PoisonError};

/// Append-only, time-ordered store of audit events.
///
/// `record` is the only write path and never fails except on malformed
/// input (empty reason). There are no mutation or deletion methods.
/// Internal order is the canonical replay order: ascending `created_at`
/// with insertion-sequence tie-break.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from previously exported events.
    ///
    /// Events are re-sorted into canonical order so the import is
    /// insensitive to the order of the serialized snapshot.
    #[must_use]
    pub fn import(mut events: Vec<AuditEvent>) -> Self {
        events.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
        Self {
            events: Mutex::new(events),
        }
    }

    /// Append one event, assigning its insertion sequence.
    ///
    /// Returns the stored event (with `seq` filled in).
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] if `reason` is empty or whitespace.
    pub fn record(&self, mut event: AuditEvent) -> Result<AuditEvent> {
        if event.reason.trim().is_empty() {
            return Err(EngineError::validation(format!(
                "audit event {} requires a non-empty reason",
                event.kind()
            )));
        }
        let mut events = self.lock();
        event.seq = events.len() as u64;
        events.push(event.clone());
        Ok(event)
    }

    /// Events for one ticket, in canonical (ascending) order.
    #[must_use]
    pub fn by_ticket(&self, ticket_id: &str) -> Vec<AuditEvent> {
        self.lock()
            .iter()
            .filter(|e| e.ticket_id == ticket_id)
            .cloned()
            .collect()
    }

    /// Events for a whole reopen lineage, in canonical order.
    #[must_use]
    pub fn by_lineage(&self, reference_id: &str) -> Vec<AuditEvent> {
        self.lock()
            .iter()
            .filter(|e| e.reference_id == reference_id)
            .cloned()
            .collect()
    }

    /// Every event, in canonical order. Used for snapshot export.
    #[must_use]
    pub fn export(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AuditEvent>> {
        // A poisoned log still holds only fully appended events.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::AuditLog;
    use crate::audit::AuditEvent;
    use crate::audit::data::{AuditData, WarningFlagData};
    use crate::error::EngineError;
    use crate::model::user::Role;
    use chrono::Utc;

    fn event(ticket_id: &str, reference_id: &str, reason: &str) -> AuditEvent {
        AuditEvent {
            id: "EVT-1000".into(),
            ticket_id: ticket_id.into(),
            reference_id: reference_id.into(),
            actor_id: "u1".into(),
            actor_role: Role::Client,
            data: AuditData::WarningFlag(WarningFlagData {
                old: false,
                new: true,
            }),
            reason: reason.into(),
            created_at: Utc::now(),
            seq: 0,
        }
    }

    #[test]
    fn record_assigns_sequences_in_order() {
        let log = AuditLog::new();
        let first = log.record(event("TKT-1", "REF-1", "first")).unwrap();
        let second = log.record(event("TKT-1", "REF-1", "second")).unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn empty_reason_is_rejected_without_append() {
        let log = AuditLog::new();
        let err = log.record(event("TKT-1", "REF-1", "   ")).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(log.is_empty());
    }

    #[test]
    fn queries_filter_by_ticket_and_lineage() {
        let log = AuditLog::new();
        log.record(event("TKT-1", "REF-1", "a")).unwrap();
        log.record(event("TKT-2", "REF-1", "b")).unwrap();
        log.record(event("TKT-3", "REF-2", "c")).unwrap();

        assert_eq!(log.by_ticket("TKT-1").len(), 1);
        assert_eq!(log.by_lineage("REF-1").len(), 2);
        assert_eq!(log.by_lineage("REF-9").len(), 0);
    }

    #[test]
    fn import_restores_canonical_order() {
        let log = AuditLog::new();
        log.record(event("TKT-1", "REF-1", "a")).unwrap();
        log.record(event("TKT-1", "REF-1", "b")).unwrap();
        log.record(event("TKT-1", "REF-1", "c")).unwrap();

        let mut exported = log.export();
        exported.reverse();
        let restored = AuditLog::import(exported);
        let reasons: Vec<_> = restored
            .by_ticket("TKT-1")
            .into_iter()
            .map(|e| e.reason)
            .collect();
        assert_eq!(reasons, ["a", "b", "c"]);
    }
}
