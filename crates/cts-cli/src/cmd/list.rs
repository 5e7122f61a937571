//! `cts list` / `cts queue` — role-scoped ticket listings.
//!
//! `list` shows what the actor is entitled to see: clients their own
//! ledger, department staff their routed work, compliance everything.
//! `queue` shows tickets still awaiting compliance routing.

use crate::cmd::resolve_actor;
use crate::output::{OutputMode, render, ticket_row};
use crate::project::Project;
use clap::Args;
use cts_core::Ticket;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct QueueArgs {}

pub fn run_list(
    _args: &ListArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;
    let engine = project.load_engine()?;
    render_tickets(output, &engine.tickets_for(&actor))
}

pub fn run_queue(
    _args: &QueueArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let engine = project.load_engine()?;
    render_tickets(output, &engine.compliance_queue())
}

fn render_tickets(output: OutputMode, tickets: &[Ticket]) -> anyhow::Result<()> {
    render(output, &tickets, |tickets, w| {
        if tickets.is_empty() {
            writeln!(w, "no tickets")?;
            return Ok(());
        }
        for ticket in *tickets {
            ticket_row(w, ticket)?;
        }
        Ok(())
    })
}
