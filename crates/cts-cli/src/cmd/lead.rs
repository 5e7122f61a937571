//! `cts lead` — hand an assignment to a team lead.

use crate::cmd::resolve_actor;
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct LeadArgs {
    /// Ticket id.
    pub ticket: String,

    /// Assignment id within the ticket (e.g. ASG-1000).
    #[arg(short, long)]
    pub assignment: String,

    /// Team lead's staff id (must match the assignment's department).
    #[arg(short, long)]
    pub lead: String,

    /// Why this lead is taking the work.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_lead(
    args: &LeadArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .assign_team_lead(&actor, &args.ticket, &args.assignment, &args.lead, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
