//! `cts create` — file a new ticket as the logged-in client.

use crate::cmd::{parse_flag, resolve_actor};
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use cts_core::NewTicket;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the new ticket.
    #[arg(short, long)]
    pub title: String,

    /// Description of the problem.
    #[arg(short, long)]
    pub description: String,

    /// Priority: low, medium, high, or urgent.
    #[arg(short, long, default_value = "medium")]
    pub priority: String,

    /// Contact email for this ticket (defaults to the actor's email).
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone for this ticket (defaults to the actor's phone).
    #[arg(long)]
    pub phone: Option<String>,
}

pub fn run_create(
    args: &CreateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;
    let priority = parse_flag(&args.priority, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .create_ticket(
            &actor,
            NewTicket {
                title: args.title.clone(),
                description: args.description.clone(),
                priority,
                contact_email: args.email.clone().unwrap_or_else(|| actor.email.clone()),
                contact_phone: args.phone.clone().unwrap_or_else(|| actor.phone.clone()),
            },
        )
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
