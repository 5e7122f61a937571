//! `cts priority` — change a ticket's priority.

use crate::cmd::{parse_flag, resolve_actor};
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// Ticket id.
    pub ticket: String,

    /// Target priority: low, medium, high, or urgent.
    #[arg(short, long)]
    pub to: String,

    /// Why the priority is changing.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_priority(
    args: &PriorityArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;
    let priority = parse_flag(&args.to, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .update_ticket_priority(&actor, &args.ticket, priority, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
