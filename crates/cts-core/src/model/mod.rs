//! Data model: actors, tickets, and department assignments.

pub mod assignment;
pub mod ticket;
pub mod user;
