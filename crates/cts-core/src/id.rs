//! Human-readable identifier generation.
//!
//! Ids are prefixed, monotonically increasing, and unique within one store:
//! `TKT-1000` (tickets), `REF-1000` (lineage references), `ASG-1000`
//! (assignments), `EVT-1000` (audit events). Counters are exported with the
//! state snapshot so ids never repeat across process restarts.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// First value each counter issues. Keeps ids a uniform width for the
/// common case and visually distinct from raw indexes.
const COUNTER_BASE: u64 = 1000;

/// Exported counter positions, persisted alongside the ticket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub ticket: u64,
    pub reference: u64,
    pub assignment: u64,
    pub event: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            ticket: COUNTER_BASE,
            reference: COUNTER_BASE,
            assignment: COUNTER_BASE,
            event: COUNTER_BASE,
        }
    }
}

/// Thread-safe generator for all four id kinds.
#[derive(Debug)]
pub struct IdGenerator {
    ticket: AtomicU64,
    reference: AtomicU64,
    assignment: AtomicU64,
    event: AtomicU64,
}

impl IdGenerator {
    /// Resume from previously persisted counters.
    #[must_use]
    pub const fn from_counters(counters: IdCounters) -> Self {
        Self {
            ticket: AtomicU64::new(counters.ticket),
            reference: AtomicU64::new(counters.reference),
            assignment: AtomicU64::new(counters.assignment),
            event: AtomicU64::new(counters.event),
        }
    }

    /// Current counter positions, for snapshot export.
    #[must_use]
    pub fn counters(&self) -> IdCounters {
        IdCounters {
            ticket: self.ticket.load(Ordering::SeqCst),
            reference: self.reference.load(Ordering::SeqCst),
            assignment: self.assignment.load(Ordering::SeqCst),
            event: self.event.load(Ordering::SeqCst),
        }
    }

    /// Next ticket id, e.g. `TKT-1000`.
    #[must_use]
    pub fn next_ticket(&self) -> String {
        format!("TKT-{}", self.ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Next lineage reference id, e.g. `REF-1000`.
    #[must_use]
    pub fn next_reference(&self) -> String {
        format!("REF-{}", self.reference.fetch_add(1, Ordering::SeqCst))
    }

    /// Next assignment id, e.g. `ASG-1000`.
    #[must_use]
    pub fn next_assignment(&self) -> String {
        format!("ASG-{}", self.assignment.fetch_add(1, Ordering::SeqCst))
    }

    /// Next audit event id, e.g. `EVT-1000`.
    #[must_use]
    pub fn next_event(&self) -> String {
        format!("EVT-{}", self.event.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_counters(IdCounters::default())
    }
}
