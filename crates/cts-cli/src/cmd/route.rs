//! `cts route` — assign a department (and branch) to a ticket.

use crate::cmd::{parse_flag, resolve_actor};
use crate::output::{OutputMode, engine_fail, render, ticket_detail};
use crate::project::Project;
use clap::Args;
use cts_core::Branch;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Ticket id (e.g. TKT-1000).
    pub ticket: String,

    /// Department: resume, marketing, technical, or sales.
    #[arg(short, long)]
    pub department: String,

    /// Branch, required for marketing: AHM, LKO, or GGR.
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Why this department is being pulled in.
    #[arg(short, long)]
    pub reason: String,
}

pub fn run_route(
    args: &RouteArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;
    let department = parse_flag(&args.department, output)?;
    let branch: Option<Branch> = match &args.branch {
        Some(raw) => Some(parse_flag(raw, output)?),
        None => None,
    };

    let engine = project.load_engine()?;
    let ticket = engine
        .add_department_assignment(&actor, &args.ticket, department, branch, &args.reason)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    render(output, &ticket, |t, w| ticket_detail(w, t))
}
