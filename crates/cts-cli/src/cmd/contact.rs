//! `cts contact` — update a ticket's contact snapshot.

use crate::cmd::resolve_actor;
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ContactArgs {
    /// Ticket id.
    pub ticket: String,

    /// New contact email.
    #[arg(long)]
    pub email: String,

    /// New contact phone (any format; normalized to +1 + 10 digits).
    #[arg(long)]
    pub phone: String,

    /// Why the contact details are changing.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_contact(
    args: &ContactArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .update_ticket_contact(&actor, &args.ticket, &args.email, &args.phone, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
