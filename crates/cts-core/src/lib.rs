//! Core ticket lifecycle and department routing engine.
//!
//! A client-filed ticket moves through compliance triage, departmental
//! resolution, and compliance-controlled closure, with an optional
//! client-driven reopen into a new linked ticket. Every mutation is
//! role-gated, applied atomically per ticket, and recorded in an
//! append-only audit log.
//!
//! The crate is storage- and transport-agnostic: [`engine::Engine`] holds
//! all state in memory, and callers persist [`engine::state::EngineState`]
//! snapshots however they like.

pub mod audit;
pub mod contact;
pub mod engine;
pub mod error;
pub mod id;
pub mod model;
pub mod policy;
pub mod roster;

pub use audit::{AuditEvent, AuditKind, AuditLog};
pub use engine::state::EngineState;
pub use engine::{Engine, NewTicket};
pub use error::{EngineError, EntityKind, Result};
pub use model::assignment::{AssignmentStatus, DepartmentAssignment};
pub use model::ticket::{Priority, Ticket, TicketStatus};
pub use model::user::{Branch, Department, Role, User};
pub use policy::{Action, can_perform};
pub use roster::{Roster, default_roster};
