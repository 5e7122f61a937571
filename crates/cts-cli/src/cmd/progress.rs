//! `cts progress` — move an assignment through its workflow.

use crate::cmd::{parse_flag, resolve_actor};
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// Ticket id.
    pub ticket: String,

    /// Assignment id within the ticket.
    #[arg(short, long)]
    pub assignment: String,

    /// Target status: assigned, in_progress, waiting_client, or resolved.
    #[arg(short, long)]
    pub to: String,

    /// Why the status is changing.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_progress(
    args: &ProgressArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;
    let status = parse_flag(&args.to, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .update_assignment_status(&actor, &args.ticket, &args.assignment, status, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
