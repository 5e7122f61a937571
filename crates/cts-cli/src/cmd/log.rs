//! `cts log` — the audit trail for a ticket or its whole lineage.

use crate::output::{OutputMode, engine_fail, render};
use crate::project::Project;
use clap::Args;
use cts_core::AuditEvent;
use std::path::Path;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Ticket id.
    pub ticket: String,

    /// Show the whole reopen lineage, not just this ticket.
    #[arg(long)]
    pub lineage: bool,
}

pub fn run_log(args: &LogArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let engine = project.load_engine()?;
    let ticket = engine
        .get_ticket(&args.ticket)
        .map_err(|e| engine_fail(output, e))?;

    let mut events = if args.lineage {
        engine.audit().by_lineage(&ticket.reference_id)
    } else {
        engine.audit().by_ticket(&ticket.id)
    };
    // Newest first for display.
    events.reverse();

    render(output, &events, |events, w| {
        for event in events {
            render_event(w, event)?;
        }
        Ok(())
    })
}

fn render_event(w: &mut dyn std::io::Write, event: &AuditEvent) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  {:<26} {} ({}) on {}",
        event.created_at.format("%Y-%m-%d %H:%M:%S"),
        event.kind(),
        event.actor_id,
        event.actor_role,
        event.ticket_id,
    )?;
    writeln!(w, "    reason: {}", event.reason)
}
