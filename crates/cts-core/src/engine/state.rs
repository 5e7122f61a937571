//! Snapshot import/export for persistence.
//!
//! The engine itself is storage-agnostic; callers persist an
//! [`EngineState`] (tickets in creation order, the full audit log, and
//! the id counters) and rebuild the engine from it on startup.

use super::{Engine, TicketMap};
use crate::audit::{AuditEvent, AuditLog};
use crate::id::{IdCounters, IdGenerator};
use crate::model::ticket::Ticket;
use crate::roster::Roster;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, RwLock};

/// Serializable snapshot of everything the engine owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState {
    /// Tickets in creation order (the later of a lineage supersedes the
    /// earlier).
    pub tickets: Vec<Ticket>,
    /// The full audit log in canonical order.
    pub events: Vec<AuditEvent>,
    /// Id counters, so restored engines never reissue an id.
    pub counters: IdCounters,
}

impl Engine {
    /// Rebuild an engine from a snapshot.
    #[must_use]
    pub fn from_state(state: EngineState, roster: Roster) -> Self {
        let mut map = TicketMap::default();
        for ticket in state.tickets {
            map.order.push(ticket.id.clone());
            // Creation order: the last ticket seen per lineage is current.
            map.current
                .insert(ticket.reference_id.clone(), ticket.id.clone());
            map.by_id
                .insert(ticket.id.clone(), Arc::new(Mutex::new(ticket)));
        }
        Self {
            tickets: RwLock::new(map),
            audit: AuditLog::import(state.events),
            ids: IdGenerator::from_counters(state.counters),
            roster,
        }
    }

    /// Export a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EngineState {
        let map = self.read_map();
        let tickets = map
            .order
            .iter()
            .filter_map(|id| map.by_id.get(id))
            .map(|h| {
                h.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone()
            })
            .collect();
        drop(map);
        EngineState {
            tickets,
            events: self.audit.export(),
            counters: self.ids.counters(),
        }
    }
}
