//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its
//! output accordingly: labelled text for humans, or stable JSON for
//! scripts. Errors always go to stderr, successes to stdout.

use cts_core::{EngineError, Ticket};
use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized output (labels, sections).
    Human,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Structured error surfaced to the user.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable machine-readable error code (e.g. "E2001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Create an error with a suggestion attached.
    pub fn with_suggestion(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: None,
        }
    }
}

impl From<&EngineError> for CliError {
    fn from(err: &EngineError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.suggestion().to_string()),
            error_code: Some(err.code().to_string()),
        }
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In human mode,
/// the provided `human_fn` closure produces the text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a success message.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "ok": true,
                "message": message,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => writeln!(out, "✓ {message}")?,
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an engine error to stderr and convert it into the command's
/// failure. Commands use this with `map_err` on engine calls.
pub fn engine_fail(mode: OutputMode, err: EngineError) -> anyhow::Error {
    let _ = render_error(mode, &CliError::from(&err));
    anyhow::Error::new(err)
}

/// One-line ticket summary shared by the listing commands.
pub fn ticket_row(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    let warning = if ticket.warning_flag { " [!]" } else { "" };
    writeln!(
        w,
        "{}  {:<17} {:<8} {}{}",
        ticket.id, ticket.status, ticket.priority, ticket.title, warning
    )
}

/// Full ticket detail for `show` and post-mutation output.
pub fn ticket_detail(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    writeln!(w, "{}  {}", ticket.id, ticket.title)?;
    writeln!(w, "  reference:  {}", ticket.reference_id)?;
    if let Some(parent) = &ticket.parent_ticket_id {
        writeln!(w, "  reopened:   from {parent} (count {})", ticket.reopen_count)?;
    }
    if ticket.warning_flag {
        writeln!(w, "  warning:    repeat failure (reopened more than once)")?;
    }
    writeln!(w, "  status:     {}", ticket.status)?;
    writeln!(w, "  priority:   {}", ticket.priority)?;
    writeln!(w, "  client:     {}", ticket.client_id)?;
    writeln!(
        w,
        "  contact:    {} / {}",
        ticket.contact_email, ticket.contact_phone
    )?;
    writeln!(w, "  created:    {}", ticket.created_at.to_rfc3339())?;
    if let Some(closed) = ticket.closed_at {
        writeln!(w, "  closed:     {}", closed.to_rfc3339())?;
    }
    if !ticket.subscribed_users.is_empty() {
        writeln!(w, "  subscribers: {}", ticket.subscribed_users.join(", "))?;
    }
    if ticket.assignments.is_empty() {
        writeln!(w, "  assignments: none")?;
    } else {
        writeln!(w, "  assignments:")?;
        for a in &ticket.assignments {
            let node = a.branch.map_or_else(
                || a.department.to_string(),
                |b| format!("{}/{b}", a.department),
            );
            let lead = a.team_lead_id.as_deref().unwrap_or("-");
            writeln!(w, "    {}  {:<14} lead={lead}  {}", a.id, node, a.status)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CliError, OutputMode, ticket_detail, ticket_row};
    use cts_core::{EngineError, EntityKind, Priority, Role, Ticket, TicketStatus};
    use chrono::Utc;

    fn ticket() -> Ticket {
        Ticket {
            id: "TKT-1000".into(),
            reference_id: "REF-1000".into(),
            parent_ticket_id: None,
            client_id: "c1".into(),
            title: "Broken thing".into(),
            description: "details".into(),
            priority: Priority::High,
            status: TicketStatus::ComplianceReview,
            reopen_count: 0,
            warning_flag: false,
            contact_email: "c@example.com".into(),
            contact_phone: "+15550123456".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            closed_at: None,
            assignments: Vec::new(),
            subscribed_users: vec!["c1".into()],
        }
    }

    #[test]
    fn output_mode_is_json() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Human.is_json());
    }

    #[test]
    fn engine_errors_carry_code_and_suggestion() {
        let err = EngineError::not_found(EntityKind::Ticket, "TKT-1");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E4001"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn engine_errors_render_role_and_action() {
        let err = EngineError::Authorization {
            action: cts_core::Action::CreateTicket,
            role: Role::TeamLead,
        };
        let cli = CliError::from(&err);
        assert!(cli.message.contains("team_lead"));
    }

    #[test]
    fn row_marks_warning_tickets() {
        let mut t = ticket();
        t.warning_flag = true;
        let mut buf = Vec::new();
        ticket_row(&mut buf, &t).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("[!]"));
    }

    #[test]
    fn detail_lists_assignments_or_none() {
        let mut buf = Vec::new();
        ticket_detail(&mut buf, &ticket()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("assignments: none"));
        assert!(text.contains("REF-1000"));
    }
}
