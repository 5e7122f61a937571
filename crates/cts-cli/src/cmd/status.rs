//! `cts status` / `cts close` — move a ticket through its lifecycle.
//!
//! `close` is sugar for `status --to closed`; both go through the same
//! transition and policy checks.

use crate::cmd::{parse_flag, resolve_actor};
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use cts_core::TicketStatus;
use std::path::Path;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Ticket id.
    pub ticket: String,

    /// Target status: in_resolution, waiting_client, ready_to_close, or closed.
    #[arg(short, long)]
    pub to: String,

    /// Why the status is changing.
    #[arg(short, long)]
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Ticket id.
    pub ticket: String,

    /// Why the ticket is being closed.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_status(
    args: &StatusArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let status = parse_flag(&args.to, output)?;
    change_status(&args.ticket, status, &args.reason, actor_flag, output, project_root)
}

pub fn run_close(
    args: &CloseArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    change_status(
        &args.ticket,
        TicketStatus::Closed,
        &args.reason,
        actor_flag,
        output,
        project_root,
    )
}

fn change_status(
    ticket_id: &str,
    status: TicketStatus,
    reason: &str,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .update_ticket_status(&actor, ticket_id, status, reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
