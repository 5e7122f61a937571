//! Engine error taxonomy.
//!
//! Every command either fully commits or returns one of these errors with
//! no state mutated. All four kinds are recoverable: the caller corrects
//! the input (or switches actor) and re-issues the command explicitly.

use crate::model::user::Role;
use crate::policy::Action;
use std::fmt;

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// The kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ticket,
    Assignment,
    User,
}

impl EntityKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::Assignment => "assignment",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by engine commands and audit writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Malformed input: empty required field, bad phone format, missing
    /// reason, missing branch for a Marketing assignment.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The actor's role (or ownership, or the ticket's current status)
    /// does not permit the attempted action.
    #[error("{role} is not permitted to {action}")]
    Authorization {
        /// The action that was attempted.
        action: Action,
        /// The role of the actor who attempted it.
        role: Role,
    },

    /// The action contradicts current entity state: duplicate department
    /// routing, re-assigning an already-assigned team lead, double-resolve,
    /// or a status transition outside the lifecycle rules.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced ticket, assignment, or user id does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What kind of entity the id referred to.
        kind: EntityKind,
        /// The id that failed to resolve.
        id: String,
    },
}

impl EngineError {
    /// Stable machine-readable code (`E####`) for each error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E1001",
            Self::Authorization { .. } => "E2001",
            Self::Conflict(_) => "E3001",
            Self::NotFound { .. } => "E4001",
        }
    }

    /// Remediation hint suitable for terminal output.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Correct the input and re-issue the command.",
            Self::Authorization { .. } => {
                "Switch to an actor whose role and department permit this action."
            }
            Self::Conflict(_) => "Inspect the ticket with `cts show` and retry against its current state.",
            Self::NotFound { .. } => "Check the id with `cts list` or `cts show`.",
        }
    }

    /// Shorthand constructor for validation failures.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand constructor for conflicts.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Shorthand constructor for missing entities.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
