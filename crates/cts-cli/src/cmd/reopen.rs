//! `cts reopen` — spawn a successor ticket from a closed one.

use crate::cmd::resolve_actor;
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ReopenArgs {
    /// Closed ticket id to reopen.
    pub ticket: String,

    /// Why the issue is back.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_reopen(
    args: &ReopenArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;

    let engine = project.load_engine()?;
    let successor = engine
        .reopen_ticket(&actor, &args.ticket, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &successor, |t, w| ticket_detail(w, t))
}
